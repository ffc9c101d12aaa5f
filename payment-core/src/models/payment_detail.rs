use serde::{Deserialize, Serialize};

/// Snapshot of every value that went into one cell's payment.
///
/// A breakdown view renders entirely from this record, so later edits to
/// the live configuration do not change an open breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetail {
    pub term_months: i32,
    pub base_total: f64,
    pub cash_down: f64,
    pub trade_in_value: f64,
    pub state_tax_rate_percent: f64,
    pub finance_rate_percent: f64,
    pub monthly_payment: f64,
}

impl PaymentDetail {
    /// Base total less cash down and trade-in. May be negative.
    pub fn amount_financed(&self) -> f64 {
        self.base_total - self.cash_down - self.trade_in_value
    }

    /// Finance rate and state tax rate as the single percent the payment uses.
    pub fn combined_rate_percent(&self) -> f64 {
        self.finance_rate_percent + self.state_tax_rate_percent
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn detail() -> PaymentDetail {
        PaymentDetail {
            term_months: 60,
            base_total: 35_000.0,
            cash_down: 2_000.0,
            trade_in_value: 1_500.0,
            state_tax_rate_percent: 6.875,
            finance_rate_percent: 4.5,
            monthly_payment: 584.71875,
        }
    }

    #[test]
    fn amount_financed_subtracts_cash_down_and_trade_in() {
        assert_eq!(detail().amount_financed(), 31_500.0);
    }

    #[test]
    fn amount_financed_can_go_negative() {
        let detail = PaymentDetail {
            cash_down: 40_000.0,
            ..detail()
        };

        assert_eq!(detail.amount_financed(), -6_500.0);
    }

    #[test]
    fn combined_rate_adds_finance_and_tax() {
        assert_eq!(detail().combined_rate_percent(), 11.375);
    }
}
