use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatesError {
    /// The data source answered with anything other than `200 OK`.
    #[error("{url} is not responding (status {status})")]
    RemoteUnavailable { url: String, status: u16 },

    /// The URL could not be built or the transport failed before a response arrived.
    #[error("failed to connect to {url}: {reason}")]
    ConnectionError { url: String, reason: String },

    /// The day count typed at the prompt or passed on the command line is unusable.
    #[error("not a positive whole number of days: {0:?}")]
    MalformedInput(String),

    /// A fetched document is missing fields or carries values that cannot be normalized.
    #[error("malformed snapshot for {date}: {reason}")]
    MalformedSnapshot { date: String, reason: String },
}

impl RatesError {
    /// Validation failures a caller may re-prompt on. Everything else is fatal.
    pub fn is_validation(&self) -> bool {
        matches!(self, RatesError::MalformedInput(_))
    }

    pub(crate) fn malformed_snapshot(date: impl Into<String>, reason: impl Into<String>) -> Self {
        RatesError::MalformedSnapshot {
            date: date.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RatesError;

    #[test]
    fn unittest_only_input_errors_are_validation() {
        assert!(RatesError::MalformedInput("abc".into()).is_validation());
        assert!(!RatesError::RemoteUnavailable {
            url: "http://localhost".into(),
            status: 503,
        }
        .is_validation());
        assert!(!RatesError::malformed_snapshot("01.02.2024", "nominal is 0").is_validation());
    }

    #[test]
    fn unittest_messages_name_the_url() {
        let err = RatesError::RemoteUnavailable {
            url: "http://www.cbr.ru/scripts/XML_daily_eng.asp?date_req=01/02/2024".into(),
            status: 500,
        };

        assert!(err.to_string().contains("date_req=01/02/2024"));
    }
}
