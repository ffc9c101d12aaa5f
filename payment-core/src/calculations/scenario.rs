//! Cash-down bracketing.
//!
//! The scenario grid compares the buyer's chosen cash down against one lower
//! and one higher amount. How far apart the brackets sit is decided by a
//! [`CashDownPolicy`]:
//!
//! | Policy | Cash down | Offset |
//! |--------|-----------|--------|
//! | Fixed  | any | $1,000 |
//! | Tiered | up to $10,000 | $1,000 |
//! | Tiered | up to $20,000 | $2,000 |
//! | Tiered | above $20,000 | $5,000 |
//!
//! The lower bracket never drops below zero.

use std::fmt;

use serde::{Deserialize, Serialize};

const FIXED_OFFSET: f64 = 1_000.0;

/// Upper bound (inclusive) and offset for each tier, checked in order.
const TIERS: [(f64, f64); 2] = [(10_000.0, 1_000.0), (20_000.0, 2_000.0)];
const TOP_TIER_OFFSET: f64 = 5_000.0;

/// Strategy for spacing the cash-down variants around the chosen amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashDownPolicy {
    /// A flat $1,000 either side.
    Fixed,
    /// Wider brackets for larger down payments.
    #[default]
    Tiered,
}

impl CashDownPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Tiered => "tiered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "tiered" => Some(Self::Tiered),
            _ => None,
        }
    }

    /// Distance between the chosen cash down and its neighbours.
    pub fn offset_for(
        &self,
        cash_down: f64,
    ) -> f64 {
        match self {
            Self::Fixed => FIXED_OFFSET,
            Self::Tiered => TIERS
                .iter()
                .find(|(upper, _)| cash_down <= *upper)
                .map_or(TOP_TIER_OFFSET, |(_, offset)| *offset),
        }
    }

    /// Returns `[lower, cash_down, upper]` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use payment_core::calculations::CashDownPolicy;
    ///
    /// let tiered = CashDownPolicy::Tiered;
    /// assert_eq!(tiered.generate_cash_down_variants(15000.0), [13000.0, 15000.0, 17000.0]);
    /// assert_eq!(tiered.generate_cash_down_variants(500.0), [0.0, 500.0, 1500.0]);
    ///
    /// let fixed = CashDownPolicy::Fixed;
    /// assert_eq!(fixed.generate_cash_down_variants(25000.0), [24000.0, 25000.0, 26000.0]);
    /// ```
    pub fn generate_cash_down_variants(
        &self,
        cash_down: f64,
    ) -> [f64; 3] {
        let offset = self.offset_for(cash_down);
        let lower = (cash_down - offset).max(0.0);
        let upper = cash_down + offset;

        [lower, cash_down, upper]
    }
}

impl fmt::Display for CashDownPolicy {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Brackets `cash_down` with the default (tiered) policy.
pub fn generate_cash_down_variants(cash_down: f64) -> [f64; 3] {
    CashDownPolicy::default().generate_cash_down_variants(cash_down)
}
