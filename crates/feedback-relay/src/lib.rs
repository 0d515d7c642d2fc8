//! `feedback-relay` - Durable recording of user feedback submissions
//!
//! This library provides the core functionality for persisting feedback
//! messages to a remote spreadsheet-backed sink, degrading gracefully to a
//! local append-only CSV file when the remote sink is unreachable or
//! misconfigured.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod store;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{FeedbackRecord, FeedbackStatus};
pub use store::{FeedbackStore, SinkKind, SubmitReceipt};
