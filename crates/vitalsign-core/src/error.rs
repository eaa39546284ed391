use thiserror::Error;

/// Errors from constructing or configuring the monitoring core.
///
/// Runtime conditions (too few samples, zero variance, unknown metric) are
/// never errors; they come back as sentinel results from the components.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("invalid configuration: {field} -- {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("failed to load configuration: {0}")]
    ConfigLoad(String),
}

impl InsightError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        InsightError::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<config::ConfigError> for InsightError {
    fn from(e: config::ConfigError) -> Self {
        InsightError::ConfigLoad(e.to_string())
    }
}

/// Convenience type alias for core results.
pub type InsightResult<T> = Result<T, InsightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = InsightError::invalid("detector.window_size", "must be at least 1");
        let msg = e.to_string();
        assert!(msg.contains("detector.window_size"));
        assert!(msg.contains("must be at least 1"));

        let e = InsightError::ConfigLoad("missing field".into());
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn config_error_conversion() {
        let cfg_err = config::ConfigError::Message("bad value".into());
        let err: InsightError = cfg_err.into();
        assert!(matches!(err, InsightError::ConfigLoad(_)));
        assert!(err.to_string().contains("bad value"));
    }

    #[test]
    fn result_type_works() {
        let ok: InsightResult<u32> = Ok(7);
        assert_eq!(ok.unwrap(), 7);

        let err: InsightResult<u32> = Err(InsightError::ConfigLoad("x".into()));
        assert!(err.is_err());
    }
}
