//! Payment calculations for the vehicle deal grid.
//!
//! The pipeline runs in three steps: [`cost`] sums the deal into a base
//! total, [`scenario`] brackets the chosen cash down, and [`payment`] /
//! [`matrix`] turn each bracket and term into a monthly estimate.

pub mod cost;
pub mod matrix;
pub mod payment;
pub mod scenario;

pub use cost::compute_base_total;
pub use matrix::{
    CellResult, MatrixRow, ScenarioEngine, ScenarioMatrix, build_scenario_matrix, expand_detail,
};
pub use payment::{PaymentError, compute_monthly_payment, finance_rate_for};
pub use scenario::{CashDownPolicy, generate_cash_down_variants};
