mod payment_cell;
mod payment_detail;
mod term_rate_table;
mod vehicle_configuration;

pub use payment_cell::PaymentCell;
pub use payment_detail::PaymentDetail;
pub use term_rate_table::{TermRate, TermRateTable};
pub use vehicle_configuration::VehicleConfiguration;
