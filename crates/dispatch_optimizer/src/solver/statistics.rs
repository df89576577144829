use jiff::SignedDuration;
use serde::Serialize;

use crate::solver::construction::Phase;

#[derive(Serialize, Debug, Clone)]
pub struct PassStatistics {
    pub phase: Phase,
    pub pass: usize,
    pub total_money: f64,
    pub assigned_orders: usize,
    pub improved: bool,
    pub duration: SignedDuration,
}

#[derive(Default, Serialize, Debug, Clone)]
pub struct SearchStatistics {
    passes: Vec<PassStatistics>,
}

impl SearchStatistics {
    pub fn add_pass(&mut self, pass: PassStatistics) {
        self.passes.push(pass);
    }

    pub fn passes(&self) -> &[PassStatistics] {
        &self.passes
    }

    pub fn passes_in(&self, phase: Phase) -> impl Iterator<Item = &PassStatistics> {
        self.passes.iter().filter(move |pass| pass.phase == phase)
    }

    pub fn total_duration(&self) -> SignedDuration {
        self.passes
            .iter()
            .fold(SignedDuration::ZERO, |total, pass| total + pass.duration)
    }
}
