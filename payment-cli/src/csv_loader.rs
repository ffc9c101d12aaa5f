//! CSV loader for batches of vehicle deals.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter. Every
//! column is optional: a missing column or an empty cell takes the value
//! from the configured default deal.
//!
//! | Column | Type | Notes |
//! |----------------------------|---------|-------------------------------------|
//! | `label` | string | Shown in batch output; defaults to `deal N` |
//! | `vehicle_price` | decimal | e.g. `30000` |
//! | `accessories_cost` | decimal | |
//! | `service_contract_enabled` | bool | `true` / `false` |
//! | `service_contract_cost` | decimal | |
//! | `gap_enabled` | bool | `true` / `false` |
//! | `gap_cost` | decimal | |
//! | `title_and_license_cost` | decimal | |
//! | `trade_in_value` | decimal | |
//! | `cash_down` | decimal | |
//! | `monthly_budget` | decimal | |
//! | `state_tax_rate_percent` | decimal | Percent, below 100 |
//!
//! Amounts must be finite and non-negative. This is the input boundary; the
//! calculations themselves accept whatever they are given.
//!
//! ### Example
//!
//! ```csv
//! label,vehicle_price,cash_down,trade_in_value,gap_enabled
//! commuter,24000,3000,,false
//! truck,52000,8000,12000,true
//! ```

use std::path::Path;

use payment_core::VehicleConfiguration;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct CsvRow {
    label: Option<String>,
    vehicle_price: Option<f64>,
    accessories_cost: Option<f64>,
    service_contract_enabled: Option<bool>,
    service_contract_cost: Option<f64>,
    gap_enabled: Option<bool>,
    gap_cost: Option<f64>,
    title_and_license_cost: Option<f64>,
    trade_in_value: Option<f64>,
    cash_down: Option<f64>,
    monthly_budget: Option<f64>,
    state_tax_rate_percent: Option<f64>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A named deal read from one CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub label: String,
    pub vehicle: VehicleConfiguration,
}

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, type
    /// mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A numeric cell was negative, not finite, or out of range for its
    /// column. `row` is 1-based (header = row 0).
    #[error("invalid {column} '{value}' on row {row}")]
    InvalidValue {
        column: &'static str,
        value: f64,
        row: usize,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn amount(
    value: Option<f64>,
    fallback: f64,
    column: &'static str,
    row: usize,
) -> Result<f64, CsvLoadError> {
    match value {
        None => Ok(fallback),
        Some(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Some(value) => Err(CsvLoadError::InvalidValue { column, value, row }),
    }
}

/// Convert a single CSV row into a Deal, filling gaps from `defaults`.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
    defaults: &VehicleConfiguration,
) -> Result<Deal, CsvLoadError> {
    let state_tax_rate_percent = amount(
        row.state_tax_rate_percent,
        defaults.state_tax_rate_percent,
        "state_tax_rate_percent",
        row_number,
    )?;
    if state_tax_rate_percent >= 100.0 {
        return Err(CsvLoadError::InvalidValue {
            column: "state_tax_rate_percent",
            value: state_tax_rate_percent,
            row: row_number,
        });
    }

    let vehicle = VehicleConfiguration {
        vehicle_price: amount(
            row.vehicle_price,
            defaults.vehicle_price,
            "vehicle_price",
            row_number,
        )?,
        accessories_cost: amount(
            row.accessories_cost,
            defaults.accessories_cost,
            "accessories_cost",
            row_number,
        )?,
        service_contract_enabled: row
            .service_contract_enabled
            .unwrap_or(defaults.service_contract_enabled),
        service_contract_cost: amount(
            row.service_contract_cost,
            defaults.service_contract_cost,
            "service_contract_cost",
            row_number,
        )?,
        gap_enabled: row.gap_enabled.unwrap_or(defaults.gap_enabled),
        gap_cost: amount(row.gap_cost, defaults.gap_cost, "gap_cost", row_number)?,
        title_and_license_cost: amount(
            row.title_and_license_cost,
            defaults.title_and_license_cost,
            "title_and_license_cost",
            row_number,
        )?,
        trade_in_value: amount(
            row.trade_in_value,
            defaults.trade_in_value,
            "trade_in_value",
            row_number,
        )?,
        cash_down: amount(row.cash_down, defaults.cash_down, "cash_down", row_number)?,
        monthly_budget: amount(
            row.monthly_budget,
            defaults.monthly_budget,
            "monthly_budget",
            row_number,
        )?,
        state_tax_rate_percent,
    };

    let label = row
        .label
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| format!("deal {row_number}"));

    Ok(Deal { label, vehicle })
}

/// Parse CSV text (the full file contents as a &str) and return the deals
/// in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a cell
///   cannot be deserialised.
/// * [CsvLoadError::InvalidValue] – if any amount is negative or not finite,
///   or a tax rate is 100% or more.
pub fn load_from_str(
    input: &str,
    defaults: &VehicleConfiguration,
) -> Result<Vec<Deal>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number, defaults)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(
    path: &Path,
    defaults: &VehicleConfiguration,
) -> Result<Vec<Deal>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents, defaults)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
