//! Application state for a payment calculator session.
//!
//! The session is the single owner of the mutable inputs: the deal being
//! priced and the rate table. Everything shown to the user is derived from
//! them on request; nothing derived is cached. The only other state is
//! which term's rate is being edited and which breakdown (if any) is open.

use thiserror::Error;
use tracing::debug;

use crate::calculations::{
    CashDownPolicy, PaymentError, ScenarioEngine, ScenarioMatrix, expand_detail,
};
use crate::config::EngineConfig;
use crate::models::{PaymentDetail, TermRateTable, VehicleConfiguration};

/// Parses text typed into a rate field.
///
/// Surrounding whitespace, thousands separators and a trailing `%` are
/// ignored. Returns `None` when the text is not a finite number.
pub fn parse_rate_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let without_percent = trimmed.strip_suffix('%').unwrap_or(trimmed);
    let normalized = without_percent.trim().replace(',', "");

    match normalized.parse::<f64>() {
        Ok(rate) if rate.is_finite() => Some(rate),
        _ => None,
    }
}

/// Result of feeding text to the rate editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateEditOutcome {
    /// The rate for `term_months` now holds `rate_percent`.
    Committed { term_months: i32, rate_percent: f64 },
    /// The text did not parse; the rate kept its previous value.
    Rejected { term_months: i32 },
    /// No term is being edited.
    NotEditing,
}

/// Tracks which term's rate, if any, is open for editing.
///
/// At most one term is edited at a time. Starting an edit on another term
/// ends the current one; there is no separate commit step because every
/// accepted input is written straight to the rate table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateEditor {
    editing_term: Option<i32>,
}

impl RateEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editing_term(&self) -> Option<i32> {
        self.editing_term
    }

    pub fn is_editing(
        &self,
        term_months: i32,
    ) -> bool {
        self.editing_term == Some(term_months)
    }

    /// Starts editing `term_months`.
    ///
    /// Returns the term whose edit was implicitly ended, if it differs.
    pub fn begin_edit(
        &mut self,
        term_months: i32,
    ) -> Option<i32> {
        let previous = self.editing_term.replace(term_months);
        let ended = previous.filter(|&term| term != term_months);
        debug!(term_months, ended = ?ended, "began rate edit");
        ended
    }

    /// Stops editing. Returns the term that was being edited.
    pub fn end_edit(&mut self) -> Option<i32> {
        let ended = self.editing_term.take();
        if let Some(term_months) = ended {
            debug!(term_months, "ended rate edit");
        }
        ended
    }

    /// Writes a typed rate into `rates` for the term being edited.
    ///
    /// Unparseable text leaves the table unchanged.
    pub fn apply_input(
        &self,
        rates: &mut TermRateTable,
        text: &str,
    ) -> RateEditOutcome {
        let Some(term_months) = self.editing_term else {
            return RateEditOutcome::NotEditing;
        };

        match parse_rate_text(text) {
            Some(rate_percent) => {
                rates.set_rate(term_months, rate_percent);
                RateEditOutcome::Committed {
                    term_months,
                    rate_percent,
                }
            }
            None => {
                debug!(term_months, input = %text, "ignoring unparseable rate input");
                RateEditOutcome::Rejected { term_months }
            }
        }
    }
}

/// Why a cell could not be opened as a breakdown.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no scenario cell at row {row}, column {column}")]
    CellNotFound { row: usize, column: usize },

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// The live inputs of one calculator session plus its UI-facing state.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSession {
    vehicle: VehicleConfiguration,
    rates: TermRateTable,
    engine: ScenarioEngine,
    editor: RateEditor,
    open_detail: Option<PaymentDetail>,
}

impl CalculatorSession {
    pub fn new(
        vehicle: VehicleConfiguration,
        rates: TermRateTable,
        engine: ScenarioEngine,
    ) -> Self {
        Self {
            vehicle,
            rates,
            engine,
            editor: RateEditor::new(),
            open_detail: None,
        }
    }

    /// Starts a session from configured defaults.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.vehicle, config.rate_table(), config.engine())
    }

    pub fn vehicle(&self) -> &VehicleConfiguration {
        &self.vehicle
    }

    /// Replaces the deal inputs. An open breakdown keeps its snapshot.
    pub fn set_vehicle(
        &mut self,
        vehicle: VehicleConfiguration,
    ) {
        self.vehicle = vehicle;
    }

    /// Applies `change` to the deal inputs in place.
    pub fn update_vehicle(
        &mut self,
        change: impl FnOnce(&mut VehicleConfiguration),
    ) {
        change(&mut self.vehicle);
    }

    pub fn rates(&self) -> &TermRateTable {
        &self.rates
    }

    pub fn offered_terms(&self) -> &[i32] {
        self.engine.offered_terms()
    }

    pub fn policy(&self) -> CashDownPolicy {
        self.engine.policy()
    }

    pub fn set_policy(
        &mut self,
        policy: CashDownPolicy,
    ) {
        self.engine = ScenarioEngine::new(self.engine.offered_terms().to_vec(), policy);
    }

    /// Recomputes the scenario grid from the current inputs.
    pub fn matrix(&self) -> ScenarioMatrix {
        self.engine.build_scenario_matrix(&self.vehicle, &self.rates)
    }

    /// Opens the breakdown for one grid cell, replacing any that was open.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::CellNotFound`] if the position is outside
    /// the grid, or [`SelectionError::Payment`] if that cell failed.
    pub fn select_cell(
        &mut self,
        row: usize,
        column: usize,
    ) -> Result<&PaymentDetail, SelectionError> {
        let matrix = self.matrix();
        let cell = match matrix.cell(row, column) {
            Some(Ok(cell)) => *cell,
            Some(Err(error)) => return Err((*error).into()),
            None => return Err(SelectionError::CellNotFound { row, column }),
        };

        let detail = expand_detail(&cell, &self.vehicle, &self.rates)?;
        Ok(self.open_detail.insert(detail))
    }

    pub fn open_detail(&self) -> Option<&PaymentDetail> {
        self.open_detail.as_ref()
    }

    pub fn close_detail(&mut self) -> Option<PaymentDetail> {
        self.open_detail.take()
    }

    pub fn editing_term(&self) -> Option<i32> {
        self.editor.editing_term()
    }

    pub fn begin_rate_edit(
        &mut self,
        term_months: i32,
    ) -> Option<i32> {
        self.editor.begin_edit(term_months)
    }

    pub fn end_rate_edit(&mut self) -> Option<i32> {
        self.editor.end_edit()
    }

    /// Feeds typed text to the rate being edited.
    pub fn input_rate_text(
        &mut self,
        text: &str,
    ) -> RateEditOutcome {
        self.editor.apply_input(&mut self.rates, text)
    }
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // parse_rate_text tests
    // =========================================================================

    #[test]
    fn parse_rate_text_accepts_plain_numbers() {
        assert_eq!(parse_rate_text("4.5"), Some(4.5));
        assert_eq!(parse_rate_text("  3 "), Some(3.0));
    }

    #[test]
    fn parse_rate_text_ignores_percent_sign_and_commas() {
        assert_eq!(parse_rate_text("4.25%"), Some(4.25));
        assert_eq!(parse_rate_text("1,000"), Some(1_000.0));
    }

    #[test]
    fn parse_rate_text_rejects_garbage() {
        assert_eq!(parse_rate_text(""), None);
        assert_eq!(parse_rate_text("abc"), None);
        assert_eq!(parse_rate_text("4.5.1"), None);
    }

    #[test]
    fn parse_rate_text_rejects_non_finite() {
        assert_eq!(parse_rate_text("inf"), None);
        assert_eq!(parse_rate_text("NaN"), None);
    }

    // =========================================================================
    // RateEditor tests
    // =========================================================================

    #[test]
    fn editor_starts_idle() {
        let editor = RateEditor::new();

        assert_eq!(editor.editing_term(), None);
    }

    #[test]
    fn begin_edit_from_idle_ends_nothing() {
        let mut editor = RateEditor::new();

        let ended = editor.begin_edit(36);

        assert_eq!(ended, None);
        assert!(editor.is_editing(36));
    }

    #[test]
    fn begin_edit_on_other_term_ends_current_edit() {
        let mut editor = RateEditor::new();
        editor.begin_edit(36);

        let ended = editor.begin_edit(60);

        assert_eq!(ended, Some(36));
        assert!(editor.is_editing(60));
        assert!(!editor.is_editing(36));
    }

    #[test]
    fn begin_edit_on_same_term_keeps_editing() {
        let mut editor = RateEditor::new();
        editor.begin_edit(48);

        let ended = editor.begin_edit(48);

        assert_eq!(ended, None);
        assert_eq!(editor.editing_term(), Some(48));
    }

    #[test]
    fn end_edit_returns_to_idle() {
        let mut editor = RateEditor::new();
        editor.begin_edit(72);

        assert_eq!(editor.end_edit(), Some(72));
        assert_eq!(editor.editing_term(), None);
        assert_eq!(editor.end_edit(), None);
    }

    #[test]
    fn apply_input_commits_each_change() {
        let mut editor = RateEditor::new();
        let mut rates = TermRateTable::standard();
        editor.begin_edit(60);

        editor.apply_input(&mut rates, "4");
        let outcome = editor.apply_input(&mut rates, "4.9");

        assert_eq!(
            outcome,
            RateEditOutcome::Committed {
                term_months: 60,
                rate_percent: 4.9
            }
        );
        assert_eq!(rates.rate_for(60), 4.9);
        assert_eq!(rates.rate_for(36), 3.5);
    }

    #[test]
    fn apply_input_keeps_prior_rate_on_bad_text() {
        let mut editor = RateEditor::new();
        let mut rates = TermRateTable::standard();
        editor.begin_edit(60);

        let outcome = editor.apply_input(&mut rates, "4.x");

        assert_eq!(outcome, RateEditOutcome::Rejected { term_months: 60 });
        assert_eq!(rates.rate_for(60), 4.5);
    }

    #[test]
    fn apply_input_without_edit_does_nothing() {
        let editor = RateEditor::new();
        let mut rates = TermRateTable::standard();

        let outcome = editor.apply_input(&mut rates, "9.9");

        assert_eq!(outcome, RateEditOutcome::NotEditing);
        assert_eq!(rates, TermRateTable::standard());
    }

    #[test]
    fn apply_input_can_add_rate_for_unrated_term() {
        let mut editor = RateEditor::new();
        let mut rates = TermRateTable::new();
        editor.begin_edit(24);

        editor.apply_input(&mut rates, "2.9");

        assert_eq!(rates.explicit_rate(24), Some(2.9));
    }

    // =========================================================================
    // CalculatorSession tests
    // =========================================================================

    #[test]
    fn default_session_uses_shipped_defaults() {
        let session = CalculatorSession::default();

        assert_eq!(session.offered_terms(), &[36, 48, 60, 72, 84]);
        assert_eq!(session.policy(), CashDownPolicy::Tiered);
        assert_eq!(session.vehicle(), &VehicleConfiguration::default());
        assert_eq!(session.open_detail(), None);
    }

    #[test]
    fn select_cell_opens_matching_detail() {
        let mut session = CalculatorSession::default();
        let matrix = session.matrix();
        let expected = *matrix.cell(1, 2).unwrap().as_ref().unwrap();

        let detail = *session.select_cell(1, 2).unwrap();

        assert_eq!(detail.term_months, 60);
        assert_eq!(detail.cash_down, 2_000.0);
        assert_eq!(
            detail.monthly_payment.to_bits(),
            expected.monthly_payment.to_bits()
        );
        assert_eq!(session.open_detail(), Some(&detail));
    }

    #[test]
    fn select_cell_replaces_open_detail() {
        let mut session = CalculatorSession::default();
        session.select_cell(0, 0).unwrap();

        session.select_cell(2, 4).unwrap();

        let open = session.open_detail().unwrap();
        assert_eq!(open.term_months, 84);
        assert_eq!(open.cash_down, 3_000.0);
    }

    #[test]
    fn select_cell_outside_grid_fails() {
        let mut session = CalculatorSession::default();

        let result = session.select_cell(3, 0).map(|detail| *detail);

        assert_eq!(
            result,
            Err(SelectionError::CellNotFound { row: 3, column: 0 })
        );
        assert_eq!(session.open_detail(), None);
    }

    #[test]
    fn select_cell_with_invalid_term_reports_payment_error() {
        let engine = ScenarioEngine::new(vec![36, 0], CashDownPolicy::Tiered);
        let mut session = CalculatorSession::new(
            VehicleConfiguration::default(),
            TermRateTable::standard(),
            engine,
        );

        let result = session.select_cell(0, 1).map(|detail| *detail);

        assert_eq!(
            result,
            Err(SelectionError::Payment(PaymentError::InvalidTerm(0)))
        );
    }

    #[test]
    fn open_detail_is_a_snapshot() {
        let mut session = CalculatorSession::default();
        let before = *session.select_cell(1, 0).unwrap();

        session.update_vehicle(|vehicle| vehicle.vehicle_price = 50_000.0);
        session.begin_rate_edit(36);
        session.input_rate_text("9.0");

        assert_eq!(session.open_detail(), Some(&before));
        assert_ne!(
            session.matrix().cell(1, 0).unwrap().as_ref().unwrap().monthly_payment,
            before.monthly_payment
        );
    }

    #[test]
    fn close_detail_discards_snapshot() {
        let mut session = CalculatorSession::default();
        session.select_cell(0, 0).unwrap();

        assert!(session.close_detail().is_some());
        assert_eq!(session.open_detail(), None);
        assert_eq!(session.close_detail(), None);
    }

    #[test]
    fn rate_edits_flow_into_matrix() {
        let mut session = CalculatorSession::default();
        let before = session.matrix();

        session.begin_rate_edit(36);
        let ended = session.begin_rate_edit(60);
        session.input_rate_text("6.5");
        session.end_rate_edit();

        assert_eq!(ended, Some(36));
        assert_eq!(session.editing_term(), None);
        assert_eq!(session.rates().rate_for(60), 6.5);
        let after = session.matrix();
        assert_eq!(after.cell(1, 0), before.cell(1, 0));
        assert_ne!(after.cell(1, 2), before.cell(1, 2));
    }

    #[test]
    fn set_policy_keeps_offered_terms() {
        let mut session = CalculatorSession::default();
        session.set_vehicle(VehicleConfiguration {
            cash_down: 15_000.0,
            ..VehicleConfiguration::default()
        });

        session.set_policy(CashDownPolicy::Fixed);

        assert_eq!(session.offered_terms(), &[36, 48, 60, 72, 84]);
        assert_eq!(
            session.matrix().cash_down_variants(),
            vec![14_000.0, 15_000.0, 16_000.0]
        );
    }
}
