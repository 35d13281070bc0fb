//! Diagnostics and compliance reporting.
//!
//! Stages never signal failure through control flow. Each stage pushes
//! [`Violation`]s into a per-call [`Diagnostics`] accumulator, and the
//! [`ComplianceReporter`] turns the accumulator into a [`ValidationResult`].

use std::fmt;

use hsi_contract::HsiVersion;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::options::{ComplianceLevel, ExecutionMode};
use crate::path::FieldPath;

/// Validation stage that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Structural,
    Reference,
    Temporal,
    AxisDomain,
    Privacy,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Reference => "reference",
            Self::Temporal => "temporal",
            Self::AxisDomain => "axis_domain",
            Self::Privacy => "privacy",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Violation taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Schema-level type, presence, enum or range failure. Fails BASIC.
    StructuralViolation,
    /// A root field the schema does not declare. Rejected at every level.
    UnknownTopLevelFieldViolation,
    /// Dangling identifier or inconsistent index. Fails STRICT.
    ReferenceIntegrityViolation,
    /// Out-of-order timestamps. Fails STRICT.
    TemporalOrderViolation,
    /// Domain membership, direction or null-score semantics. Fails STRICT.
    AxisDomainViolation,
    /// Missing or false-negative non-PII assertion. Fails every level.
    PrivacyViolation,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuralViolation => "structural_violation",
            Self::UnknownTopLevelFieldViolation => "unknown_top_level_field_violation",
            Self::ReferenceIntegrityViolation => "reference_integrity_violation",
            Self::TemporalOrderViolation => "temporal_order_violation",
            Self::AxisDomainViolation => "axis_domain_violation",
            Self::PrivacyViolation => "privacy_violation",
        }
    }

    /// Whether the code is a structural failure (including its unknown-field
    /// subtype).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::StructuralViolation | Self::UnknownTopLevelFieldViolation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub stage: Stage,
    pub path: String,
    pub code: ViolationCode,
    pub message: String,
}

impl Violation {
    pub fn new(
        stage: Stage,
        code: ViolationCode,
        path: &FieldPath,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            path: path.to_string(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at '{}': {}",
            self.stage,
            self.code.as_str(),
            self.path,
            self.message
        )
    }
}

/// Per-call violation accumulator.
///
/// In fail-fast mode the accumulator saturates after the first violation;
/// further pushes are dropped and stages poll [`Diagnostics::is_saturated`]
/// to stop early.
#[derive(Debug)]
pub struct Diagnostics {
    mode: ExecutionMode,
    violations: Vec<Violation>,
}

impl Diagnostics {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, violation: Violation) {
        if !self.is_saturated() {
            self.violations.push(violation);
        }
    }

    pub fn is_saturated(&self) -> bool {
        self.mode == ExecutionMode::FailFast && !self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` iff there are no violations at `level`.
    pub valid: bool,
    pub level: ComplianceLevel,
    /// Version the payload claimed.
    pub hsi_version: HsiVersion,
    /// `false` when the claimed minor is newer than the selected schema.
    pub minor_recognized: bool,
    /// Ordered by stage, then by the order each stage found them.
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn violations_for(&self, stage: Stage) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.stage == stage)
    }

    pub fn has_code(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    pub fn count_code(&self, code: ViolationCode) -> usize {
        self.violations.iter().filter(|v| v.code == code).count()
    }

    /// One-line summary for logs and exit-status reporting.
    pub fn summary(&self) -> String {
        if self.valid {
            format!(
                "HSI {} payload is valid at {}",
                self.hsi_version,
                self.level.as_str()
            )
        } else {
            format!(
                "HSI {} payload is invalid at {} ({} violation{})",
                self.hsi_version,
                self.level.as_str(),
                self.violations.len(),
                if self.violations.len() == 1 { "" } else { "s" }
            )
        }
    }
}

/// Aggregates stage diagnostics into a single verdict for one level.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceReporter {
    level: ComplianceLevel,
}

impl ComplianceReporter {
    pub fn new(level: ComplianceLevel) -> Self {
        Self { level }
    }

    pub fn finish(
        &self,
        hsi_version: HsiVersion,
        minor_recognized: bool,
        diagnostics: Diagnostics,
    ) -> ValidationResult {
        let mut violations: Vec<Violation> = diagnostics
            .into_violations()
            .into_iter()
            .filter(|v| self.level.includes(v.stage))
            .collect();
        // Stable: keeps each stage's own emission order.
        violations.sort_by_key(|v| v.stage);

        let result = ValidationResult {
            valid: violations.is_empty(),
            level: self.level,
            hsi_version,
            minor_recognized,
            violations,
        };
        debug!("{}", result.summary());
        result
    }
}
