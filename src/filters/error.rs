//! Error types for filter mutations
//!
//! Filter evaluation itself never fails. Malformed input is rejected where
//! it enters the filter state, so band deduplication stays unambiguous.

use thiserror::Error;

/// Errors that can occur when building filter values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Price band lower bound is not below its upper bound
    #[error("Invalid price band: min {min} must be below max {max}")]
    InvalidBand { min: u64, max: u64 },

    /// Price band text could not be parsed
    #[error("Invalid price band '{0}': expected MIN-MAX or MIN-")]
    BandSyntax(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
