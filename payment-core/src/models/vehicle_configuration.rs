use serde::{Deserialize, Serialize};

/// The inputs describing a single vehicle deal.
///
/// Values are accepted as given. Range enforcement belongs to whatever
/// produces them (sliders, CSV rows, CLI flags); the calculations never
/// clamp or reject a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfiguration {
    pub vehicle_price: f64,
    pub accessories_cost: f64,

    pub service_contract_enabled: bool,
    pub service_contract_cost: f64,

    pub gap_enabled: bool,
    pub gap_cost: f64,

    pub title_and_license_cost: f64,
    pub trade_in_value: f64,
    pub cash_down: f64,

    /// Affordability threshold for a single monthly payment.
    pub monthly_budget: f64,

    /// Sales tax percent, e.g. `6.875` for 6.875%.
    pub state_tax_rate_percent: f64,
}

impl Default for VehicleConfiguration {
    fn default() -> Self {
        Self {
            vehicle_price: 30_000.0,
            accessories_cost: 5_000.0,
            service_contract_enabled: false,
            service_contract_cost: 3_000.0,
            gap_enabled: false,
            gap_cost: 1_000.0,
            title_and_license_cost: 500.0,
            trade_in_value: 0.0,
            cash_down: 2_000.0,
            monthly_budget: 500.0,
            state_tax_rate_percent: 6.875,
        }
    }
}
