//! Constraint validation for resume documents.

pub mod emphasis;
pub mod report;
pub mod validator;

pub use report::ValidationReport;
pub use validator::validate;
