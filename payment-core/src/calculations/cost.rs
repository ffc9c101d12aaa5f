//! Cost aggregation for a vehicle deal.
//!
//! The base total is everything the buyer is charged for before cash down
//! and trade-in are taken off:
//!
//! | Component | Included |
//! |-----------|----------|
//! | Vehicle price | always |
//! | Accessories | always |
//! | Service contract | when enabled |
//! | GAP coverage | when enabled |
//! | Title & license | always |

use crate::models::VehicleConfiguration;

/// Sums the deal's charges into its base total.
///
/// Disabled add-ons contribute nothing regardless of their configured cost.
/// The sum is taken as given; negative inputs are not rejected.
///
/// # Examples
///
/// ```
/// use payment_core::VehicleConfiguration;
/// use payment_core::calculations::compute_base_total;
///
/// let config = VehicleConfiguration {
///     vehicle_price: 30000.0,
///     accessories_cost: 5000.0,
///     service_contract_enabled: true,
///     service_contract_cost: 3000.0,
///     gap_enabled: false,
///     gap_cost: 1000.0,
///     title_and_license_cost: 500.0,
///     ..VehicleConfiguration::default()
/// };
///
/// assert_eq!(compute_base_total(&config), 38500.0);
/// ```
pub fn compute_base_total(config: &VehicleConfiguration) -> f64 {
    let service_contract = if config.service_contract_enabled {
        config.service_contract_cost
    } else {
        0.0
    };
    let gap = if config.gap_enabled {
        config.gap_cost
    } else {
        0.0
    };

    config.vehicle_price
        + config.accessories_cost
        + service_contract
        + gap
        + config.title_and_license_cost
}

impl VehicleConfiguration {
    /// Shorthand for [`compute_base_total`].
    pub fn base_total(&self) -> f64 {
        compute_base_total(self)
    }
}
