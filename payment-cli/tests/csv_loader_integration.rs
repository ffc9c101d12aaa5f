//! Integration tests that load the on-disk deal fixture and price it.
//!
//! These complement the unit tests inside csv_loader.rs (which all use
//! inline string literals) by going through the read-from-disk path and on
//! into the engine.

use std::path::PathBuf;

use payment_cli::app::sessions_for_deals;
use payment_cli::csv_loader;
use payment_cli::render::{BatchEntry, render_batch};
use payment_core::{CalculatorSession, VehicleConfiguration};
use pretty_assertions::assert_eq;

/// Path to the sample CSV shipped with the test fixtures.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("sample_deals.csv")
}

#[test]
fn test_load_fixture_file_succeeds() {
    let deals = csv_loader::load_from_file(&fixture_path(), &VehicleConfiguration::default())
        .expect("fixture file should load without error");

    let labels: Vec<&str> = deals.iter().map(|deal| deal.label.as_str()).collect();
    assert_eq!(labels, vec!["commuter", "family suv", "truck"]);
}

#[test]
fn test_load_fixture_trims_and_fills_defaults() {
    let defaults = VehicleConfiguration::default();
    let deals = csv_loader::load_from_file(&fixture_path(), &defaults).unwrap();

    let suv = &deals[1].vehicle;
    assert_eq!(suv.vehicle_price, 38_500.0);
    assert!(suv.service_contract_enabled);
    assert_eq!(suv.service_contract_cost, defaults.service_contract_cost);

    let truck = &deals[2].vehicle;
    assert_eq!(truck.accessories_cost, defaults.accessories_cost);
    assert_eq!(truck.service_contract_enabled, defaults.service_contract_enabled);
    assert_eq!(truck.monthly_budget, defaults.monthly_budget);
    assert_eq!(truck.state_tax_rate_percent, defaults.state_tax_rate_percent);
}

#[test]
fn test_fixture_base_totals() {
    let deals =
        csv_loader::load_from_file(&fixture_path(), &VehicleConfiguration::default()).unwrap();

    let totals: Vec<f64> = deals.iter().map(|deal| deal.vehicle.base_total()).collect();

    // 24000 + 1500 + 500; 38500 + 4000 + 3000 + 1000 + 500; 52000 + 5000 + 1000 + 500
    assert_eq!(totals, vec![26_000.0, 47_000.0, 58_500.0]);
}

#[test]
fn test_fixture_prices_through_batch_summary() {
    let session = CalculatorSession::default();
    let deals = csv_loader::load_from_file(&fixture_path(), session.vehicle()).unwrap();

    let entries: Vec<BatchEntry> = sessions_for_deals(&session, &deals)
        .map(|(deal, deal_session)| BatchEntry {
            label: deal.label.clone(),
            matrix: deal_session.matrix(),
        })
        .collect();
    let summary = render_batch(&entries);

    assert_eq!(summary.lines().count(), 4);
    assert!(summary.lines().nth(1).unwrap().starts_with("commuter"));
    for entry in &entries {
        assert_eq!(entry.matrix.cell_count(), 15);
    }
}
