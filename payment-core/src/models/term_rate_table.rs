use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A finance rate offered for one loan term.
///
/// This is the serialized shape of a [`TermRateTable`] entry; TOML tables
/// cannot carry integer keys, so the table travels as a list of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermRate {
    pub term_months: i32,
    pub rate_percent: f64,
}

/// Finance rate percent keyed by loan term in months.
///
/// The set of offered terms lives in configuration, not here: the table may
/// hold rates for terms that are not offered, and an offered term may have
/// no entry at all. Lookups for a missing term resolve to a 0% rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TermRate>", into = "Vec<TermRate>")]
pub struct TermRateTable {
    rates: BTreeMap<i32, f64>,
}

impl TermRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The rate table the application starts with.
    pub fn standard() -> Self {
        [(36, 3.5), (48, 4.0), (60, 4.5), (72, 5.0), (84, 5.5)]
            .into_iter()
            .collect()
    }

    /// Finance rate for `term_months`, or 0 when the term has no entry.
    pub fn rate_for(
        &self,
        term_months: i32,
    ) -> f64 {
        self.explicit_rate(term_months).unwrap_or(0.0)
    }

    /// Finance rate for `term_months` only if the table holds one.
    pub fn explicit_rate(
        &self,
        term_months: i32,
    ) -> Option<f64> {
        self.rates.get(&term_months).copied()
    }

    /// Replaces the rate for a single term, returning the previous value.
    ///
    /// Every other entry is left as it was.
    pub fn set_rate(
        &mut self,
        term_months: i32,
        rate_percent: f64,
    ) -> Option<f64> {
        self.rates.insert(term_months, rate_percent)
    }

    pub fn remove_rate(
        &mut self,
        term_months: i32,
    ) -> Option<f64> {
        self.rates.remove(&term_months)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries in ascending term order.
    pub fn iter(&self) -> impl Iterator<Item = TermRate> + '_ {
        self.rates.iter().map(|(&term_months, &rate_percent)| TermRate {
            term_months,
            rate_percent,
        })
    }
}

impl FromIterator<(i32, f64)> for TermRateTable {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<TermRate>> for TermRateTable {
    fn from(entries: Vec<TermRate>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.term_months, entry.rate_percent))
            .collect()
    }
}

impl From<TermRateTable> for Vec<TermRate> {
    fn from(table: TermRateTable) -> Self {
        table.iter().collect()
    }
}
