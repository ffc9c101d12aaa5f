//! Monthly payment estimation.
//!
//! A payment is a flat-rate estimate, not an amortized loan payment. Sales
//! tax and the finance rate are folded into a single multiplier applied
//! once to the amount financed, and the result is spread evenly over the
//! term:
//!
//! ```text
//! adjusted_total        = base_total - cash_down - trade_in
//! combined_rate_percent = finance_rate_percent + state_tax_rate_percent
//! monthly_payment       = adjusted_total * (1 + combined_rate_percent / 100) / term_months
//! ```
//!
//! The operations run in exactly this order in `f64`, so a payment shown in
//! the grid and the same payment shown in a breakdown are bit-identical.

use thiserror::Error;
use tracing::debug;

use crate::models::TermRateTable;

/// Errors that can occur while computing a payment.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The loan term must be a positive number of months.
    #[error("loan term must be a positive number of months, got {0}")]
    InvalidTerm(i32),
}

/// Estimates the monthly payment for one scenario.
///
/// `adjusted_total` is allowed to go negative when cash down and trade-in
/// exceed the base total; the formula still applies and yields a negative
/// payment.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidTerm`] if `term_months` is zero or
/// negative. The term is checked before any division happens.
///
/// # Examples
///
/// ```
/// use payment_core::calculations::compute_monthly_payment;
///
/// let monthly = compute_monthly_payment(35000.0, 2000.0, 0.0, 6.875, 4.5, 60).unwrap();
///
/// assert!((monthly - 612.5625).abs() < 1e-9);
/// ```
pub fn compute_monthly_payment(
    base_total: f64,
    cash_down_variant: f64,
    trade_in_value: f64,
    state_tax_rate_percent: f64,
    finance_rate_percent: f64,
    term_months: i32,
) -> Result<f64, PaymentError> {
    if term_months <= 0 {
        return Err(PaymentError::InvalidTerm(term_months));
    }

    let adjusted_total = base_total - cash_down_variant - trade_in_value;
    let combined_rate_percent = finance_rate_percent + state_tax_rate_percent;

    Ok(adjusted_total * (1.0 + combined_rate_percent / 100.0) / f64::from(term_months))
}

/// Looks up the finance rate for a term, treating an absent entry as 0%.
pub fn finance_rate_for(
    rates: &TermRateTable,
    term_months: i32,
) -> f64 {
    match rates.explicit_rate(term_months) {
        Some(rate) => rate,
        None => {
            debug!(term_months, "no finance rate configured for term; using 0%");
            0.0
        }
    }
}
