//! Error types for loopview.

/// Errors produced by the loopview engine.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error("config error: {0}")]
    Config(String),

    #[error("index {index} out of range for {count} pages")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("unsupported page count: {0}")]
    UnsupportedPageCount(usize),

    #[error("two pages configured but no adapter set")]
    MissingAdapter,

    #[error("adapter error: {0}")]
    Adapter(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, LoopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let e = LoopError::Config("resistance must be greater than 0".into());
        assert_eq!(
            format!("{e}"),
            "config error: resistance must be greater than 0"
        );
    }

    #[test]
    fn index_out_of_range_display() {
        let e = LoopError::IndexOutOfRange { index: 7, count: 5 };
        assert_eq!(format!("{e}"), "index 7 out of range for 5 pages");
    }

    #[test]
    fn unsupported_page_count_display() {
        let e = LoopError::UnsupportedPageCount(1);
        assert_eq!(format!("{e}"), "unsupported page count: 1");
    }

    #[test]
    fn missing_adapter_display() {
        let e = LoopError::MissingAdapter;
        assert_eq!(format!("{e}"), "two pages configured but no adapter set");
    }

    #[test]
    fn adapter_error_display() {
        let e = LoopError::Adapter("clone has same id as source".into());
        assert_eq!(format!("{e}"), "adapter error: clone has same id as source");
    }

    #[test]
    fn toml_error_from_conversion() {
        let bad_toml = "this is [[[not valid toml";
        let toml_err = toml::from_str::<toml::Value>(bad_toml).unwrap_err();
        let e: LoopError = toml_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("TOML parse error"));
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let e: LoopError = json_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("JSON error"));
    }

    #[test]
    fn error_is_debug() {
        let e = LoopError::MissingAdapter;
        let dbg = format!("{e:?}");
        assert!(dbg.contains("MissingAdapter"));
    }

    #[test]
    fn result_alias_ok() {
        let r: Result<i32> = Ok(42);
        assert_eq!(r.unwrap(), 42);
    }

    #[test]
    fn result_alias_err() {
        let r: Result<i32> = Err(LoopError::UnsupportedPageCount(0));
        assert!(r.is_err());
    }
}
