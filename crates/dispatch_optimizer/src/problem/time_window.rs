use serde::Serialize;

/// Inclusive window `[start, end]`, in minutes.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }

    /// Arriving early means waiting until the window opens. Returns `None`
    /// when the (possibly delayed) arrival is past the end of the window.
    pub fn clamp_arrival(&self, arrival: i64) -> Option<i64> {
        let arrival = arrival.max(self.start);
        if arrival > self.end {
            None
        } else {
            Some(arrival)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_arrival_waits_for_start() {
        let window = TimeWindow::new(100, 200);
        assert_eq!(window.clamp_arrival(20), Some(100));
    }

    #[test]
    fn test_clamp_arrival_inside_window() {
        let window = TimeWindow::new(100, 200);
        assert_eq!(window.clamp_arrival(150), Some(150));
        assert_eq!(window.clamp_arrival(200), Some(200));
    }

    #[test]
    fn test_clamp_arrival_too_late() {
        let window = TimeWindow::new(100, 200);
        assert_eq!(window.clamp_arrival(201), None);
    }

    #[test]
    fn test_zero_width_window() {
        let window = TimeWindow::new(40, 40);
        assert_eq!(window.clamp_arrival(10), Some(40));
        assert_eq!(window.clamp_arrival(41), None);
        assert!(window.contains(40));
    }
}
