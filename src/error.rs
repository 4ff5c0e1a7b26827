//! Error type for the order book.
//!
//! The book distinguishes caller-contract violations (rejected cleanly with
//! [`BookError::InvalidOrder`]) from internal invariant breaches, which are
//! bugs and abort via `expect`/`assert` at the point of detection.

use thiserror::Error;

/// Errors returned by fallible order book operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookError {
    /// The submitted order violates the submission contract
    /// (zero quantity, partially consumed remaining, wrong instrument,
    /// or an id that is already resting in the book).
    ///
    /// Rejection leaves the book untouched.
    #[error("invalid order: {0}")]
    InvalidOrder(&'static str),
}
