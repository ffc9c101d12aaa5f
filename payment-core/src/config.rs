//! Engine configuration.
//!
//! Configuration is read from TOML. Every key is optional; anything left out
//! takes the value the calculator ships with.
//!
//! ```toml
//! offered_terms = [36, 48, 60, 72, 84]
//! cash_down_policy = "tiered"
//!
//! [[rates]]
//! term_months = 36
//! rate_percent = 3.5
//!
//! [[rates]]
//! term_months = 60
//! rate_percent = 4.5
//!
//! [vehicle]
//! vehicle_price = 30000.0
//! cash_down = 2000.0
//! monthly_budget = 500.0
//! state_tax_rate_percent = 6.875
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::{CashDownPolicy, ScenarioEngine};
use crate::models::{TermRate, TermRateTable, VehicleConfiguration};

/// Loan terms offered when no configuration says otherwise.
pub const DEFAULT_OFFERED_TERMS: [i32; 5] = [36, 48, 60, 72, 84];

/// Configuration values that are structurally invalid.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("at least one loan term must be offered")]
    NoOfferedTerms,

    #[error("offered loan terms must be positive, got {0}")]
    InvalidOfferedTerm(i32),

    #[error("loan term {0} is offered more than once")]
    DuplicateOfferedTerm(i32),

    #[error("finance rates must be keyed by a positive term, got {0}")]
    InvalidRateTerm(i32),

    #[error("finance rate for term {0} is configured more than once")]
    DuplicateRateTerm(i32),

    #[error("finance rate for term {term} must be a non-negative number, got {rate}")]
    InvalidRate { term: i32, rate: f64 },
}

/// Failures while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Everything the engine needs besides the live deal inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid columns, in display order.
    pub offered_terms: Vec<i32>,

    pub cash_down_policy: CashDownPolicy,

    /// Initial finance rate for each term.
    pub rates: Vec<TermRate>,

    /// Starting values for the deal.
    pub vehicle: VehicleConfiguration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            offered_terms: DEFAULT_OFFERED_TERMS.to_vec(),
            cash_down_policy: CashDownPolicy::default(),
            rates: TermRateTable::standard().iter().collect(),
            vehicle: VehicleConfiguration::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Checks the offered terms and rate entries.
    ///
    /// Deal values in `vehicle` are not range-checked.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - no terms are offered
    /// - an offered term is zero, negative, or repeated
    /// - a rate entry has a non-positive or repeated term
    /// - a rate is negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.offered_terms.is_empty() {
            return Err(ConfigError::NoOfferedTerms);
        }

        let mut seen = HashSet::new();
        for &term in &self.offered_terms {
            if term <= 0 {
                return Err(ConfigError::InvalidOfferedTerm(term));
            }
            if !seen.insert(term) {
                return Err(ConfigError::DuplicateOfferedTerm(term));
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.rates {
            if entry.term_months <= 0 {
                return Err(ConfigError::InvalidRateTerm(entry.term_months));
            }
            if !seen.insert(entry.term_months) {
                return Err(ConfigError::DuplicateRateTerm(entry.term_months));
            }
            if !entry.rate_percent.is_finite() || entry.rate_percent < 0.0 {
                return Err(ConfigError::InvalidRate {
                    term: entry.term_months,
                    rate: entry.rate_percent,
                });
            }
        }

        Ok(())
    }

    pub fn rate_table(&self) -> TermRateTable {
        self.rates.clone().into()
    }

    pub fn engine(&self) -> ScenarioEngine {
        ScenarioEngine::new(self.offered_terms.clone(), self.cash_down_policy)
    }
}
