use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::Rate;

const REQUEST_DATE_FORMAT: &str = "%d/%m/%Y";
const PUBLICATION_DATE_FORMAT: &str = "%d.%m.%Y";

/// yyyy-mm-dd -> dd/mm/yyyy
pub fn to_request_date(date: NaiveDate) -> String {
    date.format(REQUEST_DATE_FORMAT).to_string()
}

pub fn parse_publication_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), PUBLICATION_DATE_FORMAT).ok()
}

pub fn format_publication_date(date: NaiveDate) -> String {
    date.format(PUBLICATION_DATE_FORMAT).to_string()
}

/// Published values use a comma as the decimal separator.
pub fn parse_decimal(text: &str) -> Option<Rate> {
    text.trim().replace(',', ".").parse().ok()
}

pub fn normalized_rate(value: Rate, nominal: u32) -> Rate {
    value / nominal as Rate
}

/// Per-currency sums of normalized rates.
#[derive(Default, Debug)]
pub struct RunningTotals {
    sums: BTreeMap<String, Rate>,
}

impl RunningTotals {
    pub fn feed(&mut self, currency: &str, value: Rate) {
        *self.sums.entry(currency.to_owned()).or_default() += value;
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Divides every sum by the whole window length, not by how often the
    /// currency was seen.
    pub fn into_averages(self, days: u32) -> BTreeMap<String, Rate> {
        self.sums
            .into_iter()
            .map(|(currency, sum)| (currency, sum / days as Rate))
            .collect()
    }
}
