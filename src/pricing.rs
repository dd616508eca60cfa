//! Custom cake pricing.
//!
//! `price = round(base_price * size_multiplier + flavor + frosting + filling + decorations)`
//!
//! [`PricingTable::quote`] is lenient: an unset or unknown option contributes nothing
//! (multiplier 1 for size) and a warning is logged. [`PricingTable::quote_strict`]
//! rejects such selections and is what order submission uses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::domain::CakeSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CakeOption {
    Size,
    Flavor,
    Frosting,
    Filling,
    Decorations,
}

impl fmt::Display for CakeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CakeOption::Size => "size",
            CakeOption::Flavor => "flavor",
            CakeOption::Frosting => "frosting",
            CakeOption::Filling => "filling",
            CakeOption::Decorations => "decorations",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("No {0} selected")]
    Unset(CakeOption),
    #[error("Unknown {option}: {value:?}")]
    UnknownOption { option: CakeOption, value: String },
}

/// One line of an itemised quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLine {
    pub option: CakeOption,
    pub value: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub total: i64,
}

/// Static surcharge table. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTable {
    pub base_price: i64,
    pub size_multipliers: BTreeMap<String, f64>,
    pub flavors: BTreeMap<String, i64>,
    pub frostings: BTreeMap<String, i64>,
    pub fillings: BTreeMap<String, i64>,
    pub decorations: BTreeMap<String, i64>,
}

fn table<V: Copy>(entries: &[(&str, V)]) -> BTreeMap<String, V> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            base_price: 8000,
            size_multipliers: table(&[("6-inch", 1.0), ("8-inch", 1.5), ("10-inch", 2.0), ("12-inch", 2.5)]),
            flavors: table(&[
                ("vanilla", 0),
                ("chocolate", 500),
                ("red-velvet", 700),
                ("lemon", 500),
                ("carrot", 600),
            ]),
            frostings: table(&[("buttercream", 0), ("cream-cheese", 500), ("ganache", 800), ("fondant", 1200)]),
            fillings: table(&[("none", 0), ("fruit", 600), ("custard", 500), ("chocolate-mousse", 800)]),
            decorations: table(&[
                ("basic", 0),
                ("message", 500),
                ("flowers", 1500),
                ("custom-topper", 2000),
                ("premium", 3000),
            ]),
        }
    }
}

impl PricingTable {
    /// Known values for one option, sorted by key.
    pub fn choices(&self, option: CakeOption) -> Vec<&str> {
        match option {
            CakeOption::Size => self.size_multipliers.keys().map(String::as_str).collect(),
            other => self
                .surcharges(other)
                .map(|t| t.keys().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }

    pub fn knows(&self, option: CakeOption, value: &str) -> bool {
        match option {
            CakeOption::Size => self.size_multipliers.contains_key(value),
            other => self.surcharges(other).is_some_and(|t| t.contains_key(value)),
        }
    }

    fn surcharges(&self, option: CakeOption) -> Option<&BTreeMap<String, i64>> {
        match option {
            CakeOption::Size => None,
            CakeOption::Flavor => Some(&self.flavors),
            CakeOption::Frosting => Some(&self.frostings),
            CakeOption::Filling => Some(&self.fillings),
            CakeOption::Decorations => Some(&self.decorations),
        }
    }

    fn lookup(&self, option: CakeOption, value: Option<&str>) -> Result<f64, PricingError> {
        let value = value.ok_or(PricingError::Unset(option))?;
        let found = match option {
            CakeOption::Size => self.size_multipliers.get(value).copied(),
            other => self
                .surcharges(other)
                .and_then(|t| t.get(value))
                .map(|v| *v as f64),
        };
        found.ok_or_else(|| PricingError::UnknownOption {
            option,
            value: value.to_string(),
        })
    }

    fn fields(selection: &CakeSelection) -> [(CakeOption, Option<&str>); 5] {
        [
            (CakeOption::Size, selection.size.as_deref()),
            (CakeOption::Flavor, selection.flavor.as_deref()),
            (CakeOption::Frosting, selection.frosting.as_deref()),
            (CakeOption::Filling, selection.filling.as_deref()),
            (CakeOption::Decorations, selection.decorations.as_deref()),
        ]
    }

    fn line(&self, option: CakeOption, value: Option<&str>, factor: f64) -> QuoteLine {
        let amount = match option {
            CakeOption::Size => self.base_price as f64 * factor,
            _ => factor,
        };
        QuoteLine {
            option,
            value: value.map(str::to_string),
            amount,
        }
    }

    fn total(lines: &[QuoteLine]) -> i64 {
        lines.iter().map(|l| l.amount).sum::<f64>().round() as i64
    }

    /// Lenient price: unknown or unset keys count as zero.
    pub fn quote(&self, selection: &CakeSelection) -> i64 {
        let lines: Vec<QuoteLine> = Self::fields(selection)
            .into_iter()
            .map(|(option, value)| {
                let factor = self.lookup(option, value).unwrap_or_else(|e| {
                    if value.is_some() {
                        warn!(error = %e, "Unpriced cake option, contributing nothing");
                    }
                    if option == CakeOption::Size { 1.0 } else { 0.0 }
                });
                self.line(option, value, factor)
            })
            .collect();
        Self::total(&lines)
    }

    pub fn quote_strict(&self, selection: &CakeSelection) -> Result<i64, PricingError> {
        self.quote_breakdown(selection).map(|q| q.total)
    }

    /// Itemised strict quote for the review step.
    pub fn quote_breakdown(&self, selection: &CakeSelection) -> Result<Quote, PricingError> {
        let lines = Self::fields(selection)
            .into_iter()
            .map(|(option, value)| Ok(self.line(option, value, self.lookup(option, value)?)))
            .collect::<Result<Vec<_>, PricingError>>()?;
        let total = Self::total(&lines);
        Ok(Quote { lines, total })
    }
}
