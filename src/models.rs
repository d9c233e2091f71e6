use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Suffix of the per-candidate percentage field in tile properties (`nawrocki_proc`).
pub const PERCENT_SUFFIX: &str = "_proc";

/// Property holding the id of the candidate who won a district.
pub const WINNER_FIELD: &str = "winner";

/// Property promoted to the feature id by the tile source.
pub const PROMOTED_ID_FIELD: &str = "district";

/// Name of the percentage field for a candidate (or for `winner`).
pub fn percent_key(candidate: &str) -> String {
    format!("{candidate}{PERCENT_SUFFIX}")
}

/// A candidate as configured in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// Base color used for the results table indicator.
    #[serde(default)]
    pub color: Option<String>,
    /// Stepped scale colors, lightest first.
    #[serde(default)]
    pub gradient: Option<Vec<String>>,
    /// Percentage at which the single-candidate scale saturates (default 100).
    #[serde(default)]
    pub max_gradient: Option<f64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Candidate {
    /// Last word of the display name, used for compact legend labels.
    pub fn last_name(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or(&self.name)
    }

    pub fn has_gradient(&self) -> bool {
        self.gradient.as_ref().is_some_and(|g| !g.is_empty())
    }
}

/// An election and the vector-tile layer carrying its district results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Election {
    pub id: String,
    pub name: String,
    /// Candidate ids in ballot order.
    pub candidates: Vec<String>,
    /// Candidates with a dedicated fill layer in the "all" view.
    pub winners: Vec<String>,
    /// Layer name inside the vector tiles.
    pub source_layer: String,
    #[serde(default)]
    pub tileset_id: Option<String>,
}

impl Election {
    pub fn has_candidate(&self, id: &str) -> bool {
        self.candidates.iter().any(|c| c == id)
    }

    pub fn is_winner(&self, id: &str) -> bool {
        self.winners.iter().any(|c| c == id)
    }
}

/// Candidate filter of the current selection: every winner, or one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CandidateFilter {
    #[default]
    All,
    Candidate(String),
}

impl CandidateFilter {
    pub fn candidate(&self) -> Option<&str> {
        match self {
            CandidateFilter::All => None,
            CandidateFilter::Candidate(id) => Some(id),
        }
    }
}

impl From<String> for CandidateFilter {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("all") {
            CandidateFilter::All
        } else {
            CandidateFilter::Candidate(s)
        }
    }
}

impl From<&str> for CandidateFilter {
    fn from(s: &str) -> Self {
        CandidateFilter::from(s.to_string())
    }
}

impl From<CandidateFilter> for String {
    fn from(f: CandidateFilter) -> Self {
        f.to_string()
    }
}

impl fmt::Display for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateFilter::All => f.write_str("all"),
            CandidateFilter::Candidate(id) => f.write_str(id),
        }
    }
}

/// Stable feature id used for renderer feature-state lookups.
///
/// Tiles may promote either a numeric or a string property, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(u64),
    Text(String),
}

impl FeatureId {
    /// Numeric ids that are not unsigned integers keep their JSON text.
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Number(n) => Some(match n.as_u64() {
                Some(u) => FeatureId::Number(u),
                None => FeatureId::Text(n.to_string()),
            }),
            Value::String(s) if !s.is_empty() => Some(FeatureId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureId::Number(n) => write!(f, "{n}"),
            FeatureId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FeatureId {
    fn from(n: u64) -> Self {
        FeatureId::Number(n)
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        FeatureId::Text(s.to_string())
    }
}

/// Geographic pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// A district feature as delivered by hit-testing the vector tiles.
///
/// Properties are kept as raw JSON: tiles carry one count and one percentage
/// field per candidate, and any of them may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct District {
    #[serde(default, deserialize_with = "feature_id_from_json")]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

fn feature_id_from_json<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FeatureId>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(FeatureId::from_value))
}

impl District {
    pub fn new(id: Option<FeatureId>, properties: Map<String, Value>) -> Self {
        Self { id, properties }
    }

    /// Build from a GeoJSON-like feature (`{"id": .., "properties": {..}}`) or a
    /// flat property object. Without an explicit id the promoted `district`
    /// property is used.
    pub fn from_feature(feature: &Value) -> Option<Self> {
        let obj = feature.as_object()?;
        let properties = match obj.get("properties") {
            Some(Value::Object(p)) => p.clone(),
            _ => obj.clone(),
        };
        let id = obj
            .get("id")
            .and_then(FeatureId::from_value)
            .or_else(|| properties.get(PROMOTED_ID_FIELD).and_then(FeatureId::from_value));
        Some(Self { id, properties })
    }

    fn number_field(&self, key: &str) -> Option<f64> {
        let v = match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        v.filter(|v| v.is_finite())
    }

    fn text_field(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Raw vote count for a candidate.
    pub fn votes(&self, candidate: &str) -> Option<u64> {
        self.number_field(candidate)
            .filter(|v| *v >= 0.0)
            .map(|v| v.round() as u64)
    }

    /// Vote share of a candidate in percent.
    pub fn percentage(&self, candidate: &str) -> Option<f64> {
        self.number_field(&percent_key(candidate))
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn winner(&self) -> Option<&str> {
        self.properties.get(WINNER_FIELD).and_then(Value::as_str)
    }

    pub fn winner_percentage(&self) -> Option<f64> {
        self.number_field(&percent_key(WINNER_FIELD))
    }

    /// Electoral commission (OKW) number.
    pub fn number(&self) -> Option<u32> {
        self.number_field("number").map(|v| v as u32)
    }

    pub fn gmina(&self) -> Option<String> {
        self.text_field("gmina")
    }

    pub fn teryt(&self) -> Option<String> {
        self.text_field("teryt")
    }

    pub fn code(&self) -> Option<String> {
        self.text_field(PROMOTED_ID_FIELD)
    }

    pub fn turnout(&self) -> Option<f64> {
        self.number_field("turnout")
    }

    pub fn voters(&self) -> Option<u64> {
        self.number_field("voters").map(|v| v.round() as u64)
    }

    pub fn total(&self) -> Option<u64> {
        self.number_field("total").map(|v| v.round() as u64)
    }
}
