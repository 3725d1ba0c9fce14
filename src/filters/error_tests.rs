//! Unit tests for filter error types

#[cfg(test)]
mod tests {
    use crate::filters::error::FilterError;
    use std::error::Error;

    #[test]
    fn test_invalid_band_display() {
        let error = FilterError::InvalidBand { min: 2000, max: 1000 };
        assert_eq!(
            error.to_string(),
            "Invalid price band: min 2000 must be below max 1000"
        );
    }

    #[test]
    fn test_band_syntax_display() {
        let error = FilterError::BandSyntax("abc".to_string());
        let display = format!("{error}");
        assert!(display.contains("'abc'"));
        assert!(display.contains("MIN-MAX"));
    }

    #[test]
    fn test_error_debug() {
        let error = FilterError::BandSyntax("x".to_string());
        let debug = format!("{error:?}");
        assert!(debug.contains("BandSyntax"));
    }

    #[test]
    fn test_error_source() {
        let error = FilterError::InvalidBand { min: 1, max: 1 };
        assert!(error.source().is_none());
    }

    #[test]
    fn test_into_crate_error() {
        let error: crate::LotsiftError = FilterError::BandSyntax("-".to_string()).into();
        assert!(error.to_string().starts_with("Filter error:"));
    }
}
