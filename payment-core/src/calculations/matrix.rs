//! Scenario grid construction and per-cell breakdowns.
//!
//! Rows are the three cash-down variants in ascending order. Columns are the
//! offered terms in the order the caller supplied them; they are never
//! sorted. A cell whose term is invalid carries its own error and does not
//! affect its neighbours.

use tracing::warn;

use crate::calculations::cost::compute_base_total;
use crate::calculations::payment::{PaymentError, compute_monthly_payment, finance_rate_for};
use crate::calculations::scenario::CashDownPolicy;
use crate::models::{PaymentCell, PaymentDetail, TermRateTable, VehicleConfiguration};

/// Outcome of a single grid cell.
pub type CellResult = Result<PaymentCell, PaymentError>;

/// One cash-down variant and its payment for every offered term.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub cash_down_variant: f64,
    pub cells: Vec<CellResult>,
}

/// Monthly payments for every (cash-down variant, term) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioMatrix {
    /// Base total the grid was computed from.
    pub base_total: f64,
    /// Column order, as supplied.
    pub terms: Vec<i32>,
    /// Rows in ascending cash-down order.
    pub rows: Vec<MatrixRow>,
}

impl ScenarioMatrix {
    pub fn cash_down_variants(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.cash_down_variant).collect()
    }

    pub fn cell(
        &self,
        row: usize,
        column: usize,
    ) -> Option<&CellResult> {
        self.rows.get(row)?.cells.get(column)
    }

    /// Finds the cell for `term_months` in the given row.
    ///
    /// If the term is offered more than once the first column wins.
    pub fn cell_for_term(
        &self,
        row: usize,
        term_months: i32,
    ) -> Option<&CellResult> {
        let column = self.terms.iter().position(|&term| term == term_months)?;
        self.cell(row, column)
    }

    /// Total number of cells, including failed ones.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }

    /// Successfully computed cells in row-major order.
    pub fn payment_cells(&self) -> impl Iterator<Item = &PaymentCell> + '_ {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter_map(|cell| cell.as_ref().ok())
    }

    pub fn within_budget_count(&self) -> usize {
        self.payment_cells()
            .filter(|cell| cell.is_within_budget)
            .count()
    }
}

/// Builds scenario grids for a fixed set of offered terms.
///
/// # Example
///
/// ```
/// use payment_core::calculations::{CashDownPolicy, ScenarioEngine};
/// use payment_core::{TermRateTable, VehicleConfiguration};
///
/// let engine = ScenarioEngine::new(vec![36, 48, 60, 72, 84], CashDownPolicy::Tiered);
/// let matrix = engine.build_scenario_matrix(
///     &VehicleConfiguration::default(),
///     &TermRateTable::standard(),
/// );
///
/// assert_eq!(matrix.cell_count(), 15);
/// assert_eq!(matrix.cash_down_variants(), vec![1000.0, 2000.0, 3000.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioEngine {
    offered_terms: Vec<i32>,
    policy: CashDownPolicy,
}

impl ScenarioEngine {
    pub fn new(
        offered_terms: Vec<i32>,
        policy: CashDownPolicy,
    ) -> Self {
        Self {
            offered_terms,
            policy,
        }
    }

    pub fn offered_terms(&self) -> &[i32] {
        &self.offered_terms
    }

    pub fn policy(&self) -> CashDownPolicy {
        self.policy
    }

    /// Computes the full grid for one deal.
    ///
    /// The grid always has `3 × offered_terms.len()` cells.
    pub fn build_scenario_matrix(
        &self,
        config: &VehicleConfiguration,
        rates: &TermRateTable,
    ) -> ScenarioMatrix {
        let base_total = compute_base_total(config);

        let rows = self
            .policy
            .generate_cash_down_variants(config.cash_down)
            .into_iter()
            .map(|cash_down_variant| MatrixRow {
                cash_down_variant,
                cells: self
                    .offered_terms
                    .iter()
                    .map(|&term_months| {
                        payment_cell(base_total, cash_down_variant, term_months, config, rates)
                    })
                    .collect(),
            })
            .collect();

        ScenarioMatrix {
            base_total,
            terms: self.offered_terms.clone(),
            rows,
        }
    }
}

fn payment_cell(
    base_total: f64,
    cash_down_variant: f64,
    term_months: i32,
    config: &VehicleConfiguration,
    rates: &TermRateTable,
) -> CellResult {
    let monthly_payment = compute_monthly_payment(
        base_total,
        cash_down_variant,
        config.trade_in_value,
        config.state_tax_rate_percent,
        finance_rate_for(rates, term_months),
        term_months,
    )
    .inspect_err(|error| {
        warn!(
            term_months,
            cash_down_variant,
            %error,
            "skipping scenario cell with invalid term"
        );
    })?;

    Ok(PaymentCell {
        term_months,
        cash_down_variant,
        monthly_payment,
        is_within_budget: monthly_payment < config.monthly_budget,
    })
}

/// Builds the grid with the default (tiered) cash-down policy.
pub fn build_scenario_matrix(
    config: &VehicleConfiguration,
    rates: &TermRateTable,
    offered_terms: &[i32],
) -> ScenarioMatrix {
    ScenarioEngine::new(offered_terms.to_vec(), CashDownPolicy::default())
        .build_scenario_matrix(config, rates)
}

/// Captures everything behind `cell` for a breakdown view.
///
/// The payment is recomputed through the same function the grid uses, so
/// for unchanged inputs it is bit-identical to `cell.monthly_payment`.
///
/// # Errors
///
/// Returns [`PaymentError::InvalidTerm`] if the cell's term is not positive.
pub fn expand_detail(
    cell: &PaymentCell,
    config: &VehicleConfiguration,
    rates: &TermRateTable,
) -> Result<PaymentDetail, PaymentError> {
    let base_total = compute_base_total(config);
    let finance_rate_percent = finance_rate_for(rates, cell.term_months);
    let monthly_payment = compute_monthly_payment(
        base_total,
        cell.cash_down_variant,
        config.trade_in_value,
        config.state_tax_rate_percent,
        finance_rate_percent,
        cell.term_months,
    )?;

    Ok(PaymentDetail {
        term_months: cell.term_months,
        base_total,
        cash_down: cell.cash_down_variant,
        trade_in_value: config.trade_in_value,
        state_tax_rate_percent: config.state_tax_rate_percent,
        finance_rate_percent,
        monthly_payment,
    })
}
