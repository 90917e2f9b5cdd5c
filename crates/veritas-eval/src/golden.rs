use serde::{Deserialize, Serialize};

use veritas_core::error::{GoldenError, Result, VeritasError};

/// A single hand-labeled reference: a prompt/response pair and the score a
/// correct feedback function is expected to produce for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenRecord {
    pub query: String,
    pub response: String,
    pub expected_score: f64,
}

impl GoldenRecord {
    pub fn new(
        query: impl Into<String>,
        response: impl Into<String>,
        expected_score: f64,
    ) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            expected_score,
        }
    }
}

/// An ordered, immutable-after-load collection of golden records.
///
/// Construction rejects empty keys, non-finite scores, and duplicate
/// `(query, response)` keys, so lookups are never ambiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGoldenSet")]
pub struct GoldenSet {
    /// Golden set name.
    pub name: String,
    /// Description of what this set covers.
    pub description: String,
    records: Vec<GoldenRecord>,
}

/// Unvalidated wire form. Every deserialization path funnels through
/// `TryFrom`, so a `GoldenSet` in hand always satisfies the load-time
/// invariants, whatever the JSON said.
#[derive(Deserialize)]
struct RawGoldenSet {
    name: String,
    #[serde(default)]
    description: String,
    records: Vec<GoldenRecord>,
}

impl TryFrom<RawGoldenSet> for GoldenSet {
    type Error = VeritasError;

    fn try_from(raw: RawGoldenSet) -> Result<Self> {
        let mut set = GoldenSet::new(raw.name).with_description(raw.description);
        for record in raw.records {
            set.add_record(record)?;
        }
        Ok(set)
    }
}

impl GoldenSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            records: Vec::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Append a record, enforcing the load-time invariants.
    pub fn add_record(&mut self, record: GoldenRecord) -> Result<&mut Self> {
        if record.query.is_empty() || record.response.is_empty() {
            return Err(GoldenError::EmptyKey.into());
        }
        if !record.expected_score.is_finite() {
            return Err(GoldenError::NonFiniteScore {
                value: record.expected_score,
            }
            .into());
        }
        if self
            .records
            .iter()
            .any(|r| r.query == record.query && r.response == record.response)
        {
            return Err(GoldenError::DuplicateKey {
                query: record.query,
                response: record.response,
            }
            .into());
        }
        self.records.push(record);
        Ok(self)
    }

    pub fn from_records(
        name: impl Into<String>,
        records: impl IntoIterator<Item = GoldenRecord>,
    ) -> Result<Self> {
        let mut set = Self::new(name);
        for record in records {
            set.add_record(record)?;
        }
        Ok(set)
    }

    /// Load from JSON string, enforcing the load-time invariants.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawGoldenSet = serde_json::from_str(json)?;
        raw.try_into()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GoldenRecord> {
        self.records.iter()
    }

    fn find(&self, query: &str, response: &str) -> Result<&GoldenRecord> {
        if query.is_empty() || response.is_empty() {
            return Err(GoldenError::EmptyKey.into());
        }
        // Exact byte equality, no normalization. Keys are unique by
        // construction, so first match is the only match.
        self.records
            .iter()
            .find(|r| r.query == query && r.response == response)
            .ok_or_else(|| {
                GoldenError::NoMatch {
                    query: query.to_string(),
                    response: response.to_string(),
                }
                .into()
            })
    }

    /// Expected score for an exactly matching `(query, response)` pair.
    pub fn expected_score(&self, query: &str, response: &str) -> Result<f64> {
        Ok(self.find(query, response)?.expected_score)
    }

    /// Absolute difference between an externally computed score and the
    /// expected score of the matching golden record.
    ///
    /// A missing reference is an error, never a default: a substituted zero
    /// would silently distort the aggregate statistics downstream.
    pub fn score_difference(&self, query: &str, response: &str, actual_score: f64) -> Result<f64> {
        if !actual_score.is_finite() {
            return Err(GoldenError::NonFiniteScore {
                value: actual_score,
            }
            .into());
        }
        let expected = self.expected_score(query, response)?;
        Ok((actual_score - expected).abs())
    }
}
