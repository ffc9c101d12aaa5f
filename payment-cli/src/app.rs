//! Glue between command-line input and a [`CalculatorSession`].

use std::str::FromStr;

use payment_core::calculations::CashDownPolicy;
use payment_core::{
    CalculatorSession, EngineConfig, PaymentDetail, RateEditOutcome, SelectionError,
    VehicleConfiguration,
};
use thiserror::Error;
use tracing::debug;

use crate::csv_loader::Deal;

/// Problems with deal or rate input given on the command line.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InputError {
    #[error("rate edit '{0}' must look like TERM=PERCENT, e.g. 60=4.9")]
    MalformedRateEdit(String),

    #[error("rate edit '{0}' has a term that is not a whole number of months")]
    InvalidRateTerm(String),

    #[error("rate '{text}' for term {term_months} is not a number")]
    RateRejected { term_months: i32, text: String },

    #[error("unknown cash-down policy '{0}', expected 'fixed' or 'tiered'")]
    UnknownPolicy(String),
}

/// Why a breakdown could not be opened for a row and term.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DetailError {
    #[error("term {term_months} is not offered (offered: {offered:?})")]
    TermNotOffered { term_months: i32, offered: Vec<i32> },

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// One `--rate TERM=PERCENT` argument.
///
/// The percent is kept as typed; the session's rate editor decides whether
/// it is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateEdit {
    pub term_months: i32,
    pub text: String,
}

impl FromStr for RateEdit {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (term, text) = s
            .split_once('=')
            .ok_or_else(|| InputError::MalformedRateEdit(s.to_string()))?;
        let term_months = term
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidRateTerm(s.to_string()))?;
        Ok(Self {
            term_months,
            text: text.to_string(),
        })
    }
}

/// Parses `fixed` or `tiered`, case-insensitively.
pub fn parse_policy(s: &str) -> Result<CashDownPolicy, InputError> {
    CashDownPolicy::parse(s).ok_or_else(|| InputError::UnknownPolicy(s.to_string()))
}

/// Deal values given as flags. Each one that is set replaces the
/// configured value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DealOverrides {
    pub vehicle_price: Option<f64>,
    pub accessories_cost: Option<f64>,
    pub service_contract_enabled: Option<bool>,
    pub service_contract_cost: Option<f64>,
    pub gap_enabled: Option<bool>,
    pub gap_cost: Option<f64>,
    pub title_and_license_cost: Option<f64>,
    pub trade_in_value: Option<f64>,
    pub cash_down: Option<f64>,
    pub monthly_budget: Option<f64>,
    pub state_tax_rate_percent: Option<f64>,
}

impl DealOverrides {
    pub fn apply(
        &self,
        vehicle: &mut VehicleConfiguration,
    ) {
        fn set<T: Copy>(
            target: &mut T,
            value: Option<T>,
        ) {
            if let Some(value) = value {
                *target = value;
            }
        }

        set(&mut vehicle.vehicle_price, self.vehicle_price);
        set(&mut vehicle.accessories_cost, self.accessories_cost);
        set(&mut vehicle.service_contract_enabled, self.service_contract_enabled);
        set(&mut vehicle.service_contract_cost, self.service_contract_cost);
        set(&mut vehicle.gap_enabled, self.gap_enabled);
        set(&mut vehicle.gap_cost, self.gap_cost);
        set(&mut vehicle.title_and_license_cost, self.title_and_license_cost);
        set(&mut vehicle.trade_in_value, self.trade_in_value);
        set(&mut vehicle.cash_down, self.cash_down);
        set(&mut vehicle.monthly_budget, self.monthly_budget);
        set(&mut vehicle.state_tax_rate_percent, self.state_tax_rate_percent);
    }
}

/// Feeds each edit through the session's rate editor in order, the way a
/// user would tap a rate field, type, and move on.
///
/// # Errors
///
/// Stops at the first edit whose text the editor rejects. Edits before it
/// stay applied.
pub fn apply_rate_edits(
    session: &mut CalculatorSession,
    edits: &[RateEdit],
) -> Result<(), InputError> {
    for edit in edits {
        session.begin_rate_edit(edit.term_months);
        let outcome = session.input_rate_text(&edit.text);
        session.end_rate_edit();

        match outcome {
            RateEditOutcome::Committed {
                term_months,
                rate_percent,
            } => debug!(term_months, rate_percent, "rate override applied"),
            RateEditOutcome::Rejected { term_months } => {
                return Err(InputError::RateRejected {
                    term_months,
                    text: edit.text.clone(),
                });
            }
            RateEditOutcome::NotEditing => {}
        }
    }
    Ok(())
}

/// Builds the session every subcommand works from: configured defaults,
/// then the policy override, deal overrides, and rate edits.
pub fn build_session(
    config: &EngineConfig,
    policy: Option<CashDownPolicy>,
    overrides: &DealOverrides,
    rate_edits: &[RateEdit],
) -> Result<CalculatorSession, InputError> {
    let mut session = CalculatorSession::from_config(config);
    if let Some(policy) = policy {
        session.set_policy(policy);
    }
    session.update_vehicle(|vehicle| overrides.apply(vehicle));
    apply_rate_edits(&mut session, rate_edits)?;
    Ok(session)
}

/// Re-runs `session` once per deal, keeping its rates, terms and policy.
pub fn sessions_for_deals<'a>(
    session: &'a CalculatorSession,
    deals: &'a [Deal],
) -> impl Iterator<Item = (&'a Deal, CalculatorSession)> + 'a {
    deals.iter().map(move |deal| {
        let mut deal_session = session.clone();
        deal_session.set_vehicle(deal.vehicle);
        (deal, deal_session)
    })
}

/// Opens the breakdown for `row` in the first column offering `term_months`.
pub fn open_detail_for_term(
    session: &mut CalculatorSession,
    row: usize,
    term_months: i32,
) -> Result<&PaymentDetail, DetailError> {
    let column = session
        .offered_terms()
        .iter()
        .position(|&term| term == term_months)
        .ok_or_else(|| DetailError::TermNotOffered {
            term_months,
            offered: session.offered_terms().to_vec(),
        })?;
    Ok(session.select_cell(row, column)?)
}

/// The configuration a session is currently running with, rate edits and
/// deal overrides included.
pub fn effective_config(session: &CalculatorSession) -> EngineConfig {
    EngineConfig {
        offered_terms: session.offered_terms().to_vec(),
        cash_down_policy: session.policy(),
        rates: session.rates().iter().collect(),
        vehicle: *session.vehicle(),
    }
}
