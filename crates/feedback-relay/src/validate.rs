//! Submission validation for feedback-relay.
//!
//! Validation runs before any I/O: a rejected submission never reaches a
//! storage sink and creates no record anywhere.

use tracing::warn;

use crate::error::{Error, Result};

/// Validate the fields of a feedback submission.
///
/// `name` and `message` must be non-empty after trimming whitespace, and
/// `email` must be non-empty. The email format check is deliberately loose: a
/// value without an `@` is logged as a warning but accepted, preserving the
/// best-effort behavior the contact form has always had.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the first offending field.
pub fn validate_submission(name: &str, email: &str, message: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name", "must not be empty"));
    }

    if email.trim().is_empty() {
        return Err(Error::validation("email", "must not be empty"));
    }

    if message.trim().is_empty() {
        return Err(Error::validation("message", "must not be empty"));
    }

    if !email.contains('@') {
        warn!(email = %email, "Email address has no '@', accepting anyway");
    }

    Ok(())
}
