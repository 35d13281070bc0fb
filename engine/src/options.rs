//! Per-call validation options.

use std::collections::BTreeSet;

use hsi_contract::CURRENT_VERSION;
use serde::{Deserialize, Serialize};

use crate::report::Stage;

/// Compliance level requested by the consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    /// Structural/range validation and the privacy gate.
    Basic,
    /// BASIC plus reference, temporal and axis-domain integrity.
    #[default]
    Strict,
}

impl ComplianceLevel {
    /// Stages run at this level, in pipeline order.
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            Self::Basic => &[Stage::Structural, Stage::Privacy],
            Self::Strict => &[
                Stage::Structural,
                Stage::Reference,
                Stage::Temporal,
                Stage::AxisDomain,
                Stage::Privacy,
            ],
        }
    }

    pub fn includes(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Strict => "strict",
        }
    }
}

/// Whether a call stops at the first violation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run every applicable stage and report every violation.
    #[default]
    CollectAll,
    /// Stop at the first violation.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    pub level: ComplianceLevel,
    /// Majors this consumer accepts. A payload claiming any other major is
    /// rejected before validation starts.
    pub supported_majors: BTreeSet<u64>,
    pub mode: ExecutionMode,
}

impl ValidationOptions {
    pub fn basic() -> Self {
        Self {
            level: ComplianceLevel::Basic,
            ..Self::default()
        }
    }

    pub fn strict() -> Self {
        Self {
            level: ComplianceLevel::Strict,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: ComplianceLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn fail_fast(self) -> Self {
        self.with_mode(ExecutionMode::FailFast)
    }

    pub fn with_supported_majors(mut self, majors: impl IntoIterator<Item = u64>) -> Self {
        self.supported_majors = majors.into_iter().collect();
        self
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            level: ComplianceLevel::default(),
            supported_majors: BTreeSet::from([CURRENT_VERSION.major]),
            mode: ExecutionMode::default(),
        }
    }
}
