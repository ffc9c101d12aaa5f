use serde::{Deserialize, Serialize};

/// One entry of the scenario grid: a cash-down variant paired with a term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentCell {
    pub term_months: i32,
    pub cash_down_variant: f64,
    pub monthly_payment: f64,
    /// `true` only when the payment is strictly below the monthly budget.
    pub is_within_budget: bool,
}
