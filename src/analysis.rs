use std::fmt;

use chrono::{Days, Local, NaiveDate};
use itertools::Itertools;

use crate::{
    error::RatesError,
    loader::SnapshotFetcher,
    model::{CurrencyQuote, ExtremumRecord, Rate, RawQuote, Report, Snapshot},
    prompt::parse_day_count,
    utils::{format_publication_date, normalized_rate, parse_decimal, parse_publication_date, RunningTotals},
};

pub const DEFAULT_DAY_COUNT: u32 = 90;

/// `days` calendar dates walking back from `today`, today first. Fails when
/// the window is empty or reaches past the earliest representable date.
pub fn date_window(
    today: NaiveDate,
    days: u32,
) -> Result<impl Iterator<Item = NaiveDate>, RatesError> {
    days.checked_sub(1)
        .and_then(|back| today.checked_sub_days(Days::new(back.into())))
        .ok_or_else(|| RatesError::MalformedInput(days.to_string()))?;

    Ok((0..days).filter_map(move |offset| today.checked_sub_days(Days::new(offset.into()))))
}

/// Validates one published entry and converts it to numbers.
pub fn normalize_quote(raw: &RawQuote, date: NaiveDate) -> Result<CurrencyQuote, RatesError> {
    let published = format_publication_date(date);

    if raw.name.trim().is_empty() {
        return Err(RatesError::malformed_snapshot(published, "currency without a name"));
    }

    let nominal = raw.nominal.trim().parse::<i64>().map_err(|_| {
        RatesError::malformed_snapshot(
            &published,
            format!("nominal {:?} of {} is not an integer", raw.nominal, raw.name),
        )
    })?;
    if nominal <= 0 {
        return Err(RatesError::malformed_snapshot(
            published,
            format!("nominal {nominal} of {} is not positive", raw.name),
        ));
    }
    let nominal = u32::try_from(nominal).map_err(|_| {
        RatesError::malformed_snapshot(&published, format!("nominal {nominal} of {} is too large", raw.name))
    })?;

    let raw_value = parse_decimal(&raw.value).ok_or_else(|| {
        RatesError::malformed_snapshot(
            &published,
            format!("value {:?} of {} is not a decimal", raw.value, raw.name),
        )
    })?;

    Ok(CurrencyQuote {
        name: raw.name.clone(),
        nominal,
        raw_value,
        date,
    })
}

/// Running extrema and per-currency sums over the days folded so far.
#[derive(Debug)]
pub struct WindowAccumulator {
    max: ExtremumRecord,
    min: ExtremumRecord,
    totals: RunningTotals,
}

impl Default for WindowAccumulator {
    fn default() -> Self {
        Self {
            max: ExtremumRecord::lowest(),
            min: ExtremumRecord::highest(),
            totals: RunningTotals::default(),
        }
    }
}

impl WindowAccumulator {
    pub fn fold_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), RatesError> {
        let date = parse_publication_date(&snapshot.date).ok_or_else(|| {
            RatesError::malformed_snapshot(&snapshot.date, "publication date is not dd.mm.yyyy")
        })?;

        // Validate the whole day before touching the running state.
        let quotes: Vec<CurrencyQuote> =
            Itertools::try_collect(snapshot.quotes.iter().map(|raw| normalize_quote(raw, date)))?;

        for quote in &quotes {
            self.fold_quote(quote);
        }

        Ok(())
    }

    pub fn fold_quote(&mut self, quote: &CurrencyQuote) {
        let rate = normalized_rate(quote.raw_value, quote.nominal);

        // Strict comparisons keep the first record on ties.
        if rate > self.max.value {
            tracing::trace!(currency = %quote.name, rate, "new maximum");
            self.max = record(rate, quote);
        }
        if rate < self.min.value {
            tracing::trace!(currency = %quote.name, rate, "new minimum");
            self.min = record(rate, quote);
        }

        self.totals.feed(&quote.name, rate);
    }

    /// Averages divide by the full window even for currencies missing on some days.
    pub fn finish(self, days: u32) -> Report {
        Report {
            days,
            max: self.max,
            min: self.min,
            averages: self.totals.into_averages(days),
        }
    }
}

fn record(value: Rate, quote: &CurrencyQuote) -> ExtremumRecord {
    ExtremumRecord {
        value,
        currency: quote.name.clone(),
        date: format_publication_date(quote.date),
    }
}

pub struct WindowAggregator<F: SnapshotFetcher> {
    fetcher: F,
    today: NaiveDate,
    days: u32,
}

impl<F: SnapshotFetcher> WindowAggregator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            today: Local::now().date_naive(),
            days: DEFAULT_DAY_COUNT,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Fetches every day of the window in turn and aggregates them. The first
    /// failure aborts the run.
    pub fn analyze(&mut self, days: u32) -> Result<Report, RatesError> {
        let window = date_window(self.today, days)?;
        self.days = days;

        tracing::info!(window = %self, "starting analysis");

        let mut accumulator = WindowAccumulator::default();
        for date in window {
            let snapshot = self.fetcher.fetch(date)?;
            accumulator.fold_snapshot(&snapshot)?;
        }

        tracing::debug!(currencies = accumulator.totals.len(), "window folded");

        let report = accumulator.finish(days);
        tracing::info!("analysis finished");

        Ok(report)
    }

    /// Parses a day count as typed at the prompt, then analyzes. Bad input
    /// fails before anything is fetched.
    pub fn analyze_input(&mut self, input: &str) -> Result<Report, RatesError> {
        let days = parse_day_count(input)?;
        self.analyze(days)
    }
}

impl<F: SnapshotFetcher> fmt::Display for WindowAggregator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exchange rates into the base currency over {} days up to {}",
            self.days, self.today
        )
    }
}
