//! End-to-end checks that drive the engine the way an application shell
//! does: load configuration, start a session, edit inputs, read the grid.

use payment_core::calculations::{CashDownPolicy, build_scenario_matrix, compute_base_total};
use payment_core::format::{format_compact, format_currency, format_whole};
use payment_core::{
    CalculatorSession, EngineConfig, RateEditOutcome, TermRateTable, VehicleConfiguration,
};
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
offered_terms = [36, 48, 60, 72, 84]
cash_down_policy = "tiered"

[[rates]]
term_months = 36
rate_percent = 3.5

[[rates]]
term_months = 48
rate_percent = 4.0

[[rates]]
term_months = 60
rate_percent = 4.5

[[rates]]
term_months = 72
rate_percent = 5.0

[vehicle]
vehicle_price = 30000.0
accessories_cost = 5000.0
title_and_license_cost = 0.0
cash_down = 2000.0
trade_in_value = 0.0
monthly_budget = 500.0
state_tax_rate_percent = 6.875
"#;

fn session() -> CalculatorSession {
    let config = EngineConfig::from_toml_str(CONFIG).expect("fixture config should parse");
    CalculatorSession::from_config(&config)
}

#[test]
fn reference_deal_produces_expected_grid() {
    let session = session();

    let matrix = session.matrix();

    assert_eq!(matrix.base_total, 35_000.0);
    assert_eq!(matrix.cash_down_variants(), vec![1_000.0, 2_000.0, 3_000.0]);
    assert_eq!(matrix.cell_count(), 15);

    let sixty = matrix.cell_for_term(1, 60).unwrap().as_ref().unwrap();
    assert!((sixty.monthly_payment - 612.5625).abs() < 1e-9);
    assert_eq!(format_whole(sixty.monthly_payment), "613");
}

#[test]
fn unrated_term_is_priced_with_tax_only() {
    let session = session();

    let matrix = session.matrix();

    // 84 has no rate entry in the fixture.
    let cell = matrix.cell_for_term(1, 84).unwrap().as_ref().unwrap();
    let expected = 33_000.0_f64 * (1.0 + (0.0 + 6.875) / 100.0) / 84.0;
    assert_eq!(cell.monthly_payment.to_bits(), expected.to_bits());
}

#[test]
fn longer_terms_are_cheaper_in_every_row() {
    let matrix = session().matrix();

    for row in &matrix.rows {
        let payments: Vec<f64> = row
            .cells
            .iter()
            .map(|cell| cell.as_ref().unwrap().monthly_payment)
            .collect();
        assert!(payments.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}

#[test]
fn higher_cash_down_rows_are_cheaper() {
    let matrix = session().matrix();

    for column in 0..matrix.terms.len() {
        let low = matrix.cell(0, column).unwrap().as_ref().unwrap();
        let high = matrix.cell(2, column).unwrap().as_ref().unwrap();
        assert!(high.monthly_payment < low.monthly_payment);
    }
}

#[test]
fn editing_a_rate_then_opening_breakdown_agrees_with_grid() {
    let mut session = session();

    session.begin_rate_edit(60);
    assert_eq!(
        session.input_rate_text("5.25"),
        RateEditOutcome::Committed {
            term_months: 60,
            rate_percent: 5.25
        }
    );
    assert_eq!(
        session.input_rate_text("five"),
        RateEditOutcome::Rejected { term_months: 60 }
    );
    session.end_rate_edit();

    let matrix = session.matrix();
    let shown = matrix.cell_for_term(2, 60).unwrap().as_ref().unwrap().monthly_payment;
    let detail = *session.select_cell(2, 2).unwrap();

    assert_eq!(detail.finance_rate_percent, 5.25);
    assert_eq!(detail.monthly_payment.to_bits(), shown.to_bits());
    assert_eq!(detail.amount_financed(), 32_000.0);
    assert_eq!(format_currency(detail.base_total), "$35,000");
}

#[test]
fn budget_slider_changes_affordability_only() {
    let mut session = session();
    let before = session.matrix();

    session.update_vehicle(|vehicle| vehicle.monthly_budget = 2_000.0);
    let after = session.matrix();

    assert_eq!(after.within_budget_count(), 15);
    for (old, new) in before.payment_cells().zip(after.payment_cells()) {
        assert_eq!(old.monthly_payment.to_bits(), new.monthly_payment.to_bits());
    }
}

#[test]
fn both_policies_are_selectable() {
    let vehicle = VehicleConfiguration {
        cash_down: 18_000.0,
        ..VehicleConfiguration::default()
    };
    let mut session = CalculatorSession::default();
    session.set_vehicle(vehicle);

    let tiered = session.matrix();
    session.set_policy(CashDownPolicy::Fixed);
    let fixed = session.matrix();

    let labels: Vec<String> = tiered
        .cash_down_variants()
        .into_iter()
        .map(format_compact)
        .collect();
    assert_eq!(labels, vec!["16k", "18k", "20k"]);
    assert_eq!(fixed.cash_down_variants(), vec![17_000.0, 18_000.0, 19_000.0]);
}

#[test]
fn free_function_matrix_matches_session_matrix() {
    let session = session();

    let direct = build_scenario_matrix(session.vehicle(), session.rates(), session.offered_terms());

    assert_eq!(direct, session.matrix());
}

#[test]
fn base_total_is_stable_across_repeated_calls() {
    let vehicle = VehicleConfiguration {
        service_contract_enabled: true,
        gap_enabled: true,
        ..VehicleConfiguration::default()
    };

    let totals: Vec<u64> = (0..5)
        .map(|_| compute_base_total(&vehicle).to_bits())
        .collect();

    assert!(totals.iter().all(|&bits| bits == totals[0]));
    assert_eq!(compute_base_total(&vehicle), 39_500.0);
}

#[test]
fn empty_rate_table_prices_every_term_at_tax_only() {
    let vehicle = VehicleConfiguration::default();

    let matrix = build_scenario_matrix(&vehicle, &TermRateTable::new(), &[36]);

    let cell = matrix.cell(1, 0).unwrap().as_ref().unwrap();
    let expected = (35_500.0_f64 - 2_000.0 - 0.0) * (1.0 + 6.875 / 100.0) / 36.0;
    assert_eq!(cell.monthly_payment.to_bits(), expected.to_bits());
}
