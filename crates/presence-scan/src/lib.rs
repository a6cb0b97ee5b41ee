//! Digital presence maturity scans: score a questionnaire, render the action-plan
//! report, and record the submission.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use workflows::assessment;
