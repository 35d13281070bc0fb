//! Payload wire model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tags::{Consent, Direction, Domain, Encoding, SourceType};
use crate::version::HsiVersion;

/// Root HSI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub hsi_version: HsiVersion,
    /// RFC 3339 instant the underlying signals were observed.
    pub observed_at_utc: String,
    /// RFC 3339 instant the payload was computed. Never before `observed_at_utc`.
    pub computed_at_utc: String,
    pub producer: Producer,
    /// Declared window ids, in producer order. Must match the keys of `windows`.
    pub window_ids: Vec<String>,
    pub windows: BTreeMap<String, Window>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axes: Option<Axes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<BTreeMap<String, Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Embedding>>,
    pub privacy: PrivacyAssertion,
    /// Open extension point. Also the place to explain a null score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Producer identity. Never carries personal data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

/// Named time interval, half-open `[start, end)` by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: String,
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Axis groups keyed by domain. An omitted domain is simply not reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affect: Option<AxisGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<AxisGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<AxisGroup>,
}

impl Axes {
    pub fn group_mut(&mut self, domain: Domain) -> &mut Option<AxisGroup> {
        match domain {
            Domain::Affect => &mut self.affect,
            Domain::Behavior => &mut self.behavior,
            Domain::Engagement => &mut self.engagement,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisGroup {
    pub readings: Vec<AxisReading>,
    /// Domain-level extension point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Normalized score and confidence for one named axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisReading {
    pub axis: String,
    /// `None` serializes as an explicit `null`; the field is never omitted.
    pub score: Option<f64>,
    pub confidence: f64,
    pub window_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_source_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Free-form unit label of the underlying measure, e.g. `"bpm"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AxisReading {
    pub fn new(
        axis: impl Into<String>,
        score: Option<f64>,
        confidence: f64,
        window_id: impl Into<String>,
    ) -> Self {
        Self {
            axis: axis.into(),
            score,
            confidence,
            window_id: window_id.into(),
            evidence_source_ids: None,
            direction: None,
            unit: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub quality: f64,
    pub degraded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Latent-state vector scoped to a window. Treated as sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    pub window_id: String,
    pub dimension: u64,
    pub confidence: f64,
    pub encoding: Encoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyAssertion {
    /// Must be `false` for a valid payload.
    pub contains_pii: bool,
    pub raw_biosignals_allowed: bool,
    pub derived_metrics_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_allowed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent: Option<Consent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purposes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PrivacyAssertion {
    /// The common producer stance: no PII, derived metrics only.
    pub fn derived_only() -> Self {
        Self {
            contains_pii: false,
            raw_biosignals_allowed: false,
            derived_metrics_allowed: true,
            embedding_allowed: None,
            consent: None,
            purposes: None,
            notes: None,
        }
    }
}

impl Payload {
    /// Empty payload asserting [`PrivacyAssertion::derived_only`]. Windows
    /// and readings are added afterwards.
    pub fn new(
        hsi_version: HsiVersion,
        observed_at_utc: impl Into<String>,
        computed_at_utc: impl Into<String>,
        producer: Producer,
    ) -> Self {
        Self {
            hsi_version,
            observed_at_utc: observed_at_utc.into(),
            computed_at_utc: computed_at_utc.into(),
            producer,
            window_ids: Vec::new(),
            windows: BTreeMap::new(),
            axes: None,
            source_ids: None,
            sources: None,
            embeddings: None,
            privacy: PrivacyAssertion::derived_only(),
            meta: None,
        }
    }

    /// Declare a window, keeping `window_ids` and `windows` in step.
    pub fn add_window(&mut self, id: impl Into<String>, window: Window) {
        let id = id.into();
        if !self.windows.contains_key(&id) {
            self.window_ids.push(id.clone());
        }
        self.windows.insert(id, window);
    }

    /// Declare a source, keeping `source_ids` and `sources` in step.
    pub fn add_source(&mut self, id: impl Into<String>, source: Source) {
        let id = id.into();
        let sources = self.sources.get_or_insert_with(BTreeMap::new);
        if !sources.contains_key(&id) {
            self.source_ids.get_or_insert_with(Vec::new).push(id.clone());
        }
        sources.insert(id, source);
    }

    pub fn add_reading(&mut self, domain: Domain, reading: AxisReading) {
        self.axes
            .get_or_insert_with(Axes::default)
            .group_mut(domain)
            .get_or_insert_with(AxisGroup::default)
            .readings
            .push(reading);
    }
}
