use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ProblemError {
    #[error("order {order_id} is missing its {field}")]
    MissingOrderField { order_id: u64, field: &'static str },

    #[error("order builder requires an external id")]
    MissingOrderId,

    #[error("order {order_id} has a non-finite payment ({payment})")]
    NonFinitePayment { order_id: u64, payment: f64 },

    #[error("courier id {0} appears more than once")]
    DuplicateCourier(u64),

    #[error("order id {0} appears more than once")]
    DuplicateOrder(u64),

    #[error("setup cost must not be negative, got {0}")]
    NegativeSetupCost(i64),
}
