use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub type Rate = f64;

/// One `Valute` entry exactly as published, before any normalization.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct RawQuote {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Nominal")]
    pub nominal: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Daily document (`ValCurs`) as returned by the data source.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Valute", default)]
    pub quotes: Vec<RawQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    pub name: String,
    pub nominal: u32,
    pub raw_value: Rate,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "{} {} on {}", value, currency, date)]
pub struct ExtremumRecord {
    pub value: Rate,
    pub currency: String,
    pub date: String,
}

impl ExtremumRecord {
    /// Running maximum seed, beaten by any real rate.
    pub fn lowest() -> Self {
        Self {
            value: Rate::NEG_INFINITY,
            currency: String::new(),
            date: String::new(),
        }
    }

    /// Running minimum seed, beaten by any real rate.
    pub fn highest() -> Self {
        Self {
            value: Rate::INFINITY,
            currency: String::new(),
            date: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub days: u32,
    pub max: ExtremumRecord,
    pub min: ExtremumRecord,
    pub averages: BTreeMap<String, Rate>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Maximum rate: {}", self.max)?;
        writeln!(f, "Minimum rate: {}", self.min)?;
        writeln!(f, "Average rate per currency over {} days:", self.days)?;
        for (currency, value) in &self.averages {
            writeln!(f, "{currency}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{ExtremumRecord, Report};

    #[test]
    fn unittest_report_lists_every_currency() {
        let report = Report {
            days: 5,
            max: ExtremumRecord {
                value: 92.5,
                currency: "Euro".into(),
                date: "14.02.2024".into(),
            },
            min: ExtremumRecord {
                value: 0.0123,
                currency: "Vietnam Dong".into(),
                date: "13.02.2024".into(),
            },
            averages: BTreeMap::from([("Euro".into(), 91.0), ("US Dollar".into(), 43.2)]),
        };

        let text = report.to_string();

        assert!(text.contains("Maximum rate: 92.5 Euro on 14.02.2024"));
        assert!(text.contains("Minimum rate: 0.0123 Vietnam Dong on 13.02.2024"));
        assert!(text.contains("over 5 days"));
        assert!(text.contains("US Dollar: 43.2"));
    }

    #[test]
    fn unittest_sentinels_lose_to_any_rate() {
        assert!(1e-12 > ExtremumRecord::lowest().value);
        assert!(1e12 < ExtremumRecord::highest().value);
    }
}
