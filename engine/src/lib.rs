//! HSI validation engine
//!
//! Decides whether a candidate HSI payload is well-formed, internally
//! consistent and policy-compliant at one of two compliance levels:
//!
//! - **BASIC**: structural/range validation against the schema of the
//!   declared major, plus the privacy gate.
//! - **STRICT**: BASIC plus reference integrity, temporal ordering and axis
//!   domain semantics.
//!
//! ```text
//! payload -> VersionGate -> structural -> [references -> temporal -> axis_domain] -> privacy
//!                |                                                                  |
//!          SchemaRegistry                                              ComplianceReporter
//! ```
//!
//! Fatal contract-claim problems (unsupported major, no schema, unusable
//! `hsi_version`) are returned as [`EngineError`]. Everything else is a
//! [`Violation`] inside the returned [`ValidationResult`].
//!
//! # Example
//!
//! ```no_run
//! use hsi_engine::{HsiValidator, ValidationOptions};
//!
//! let validator = HsiValidator::with_builtin_schemas()?;
//! let payload = serde_json::json!({ "hsi_version": "1.0" });
//! let result = validator.validate(&payload, &ValidationOptions::strict())?;
//! for violation in &result.violations {
//!     eprintln!("{violation}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod axis_domain;
pub mod config;
pub mod error;
pub mod options;
pub mod path;
pub mod privacy;
pub mod references;
pub mod report;
pub mod schema;
pub mod structural;
pub mod temporal;
pub mod validator;
pub mod version_gate;

mod walk;

pub use error::{EngineError, Result};
pub use options::{ComplianceLevel, ExecutionMode, ValidationOptions};
pub use path::FieldPath;
pub use report::{
    ComplianceReporter, Diagnostics, Stage, ValidationResult, Violation, ViolationCode,
};
pub use schema::{RegisteredSchema, SchemaLoadError, SchemaRegistry, SchemaRegistryBuilder};
pub use validator::HsiValidator;
pub use version_gate::{GateDecision, VersionGate};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
