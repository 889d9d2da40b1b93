use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Sector
// ---------------------------------------------------------------------------

/// Topic sector of a news item. Classification produces the first six;
/// `Technical` is reserved for the preprint feed, which tags its own items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Health,
    Engineering,
    Finance,
    Education,
    Legal,
    Technical,
    #[serde(other)]
    General,
}

impl Sector {
    /// All sectors a classifier may return.
    pub const CLASSIFIABLE: [Sector; 6] = [
        Sector::Health,
        Sector::Engineering,
        Sector::Finance,
        Sector::Education,
        Sector::Legal,
        Sector::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Health => "Health",
            Sector::Engineering => "Engineering",
            Sector::Finance => "Finance",
            Sector::Education => "Education",
            Sector::Legal => "Legal",
            Sector::Technical => "Technical",
            Sector::General => "General",
        }
    }

    /// A sector counts as confident when a fetcher tagged it with something
    /// more specific than the General placeholder.
    pub fn is_confident(&self) -> bool {
        !matches!(self, Sector::General)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = std::convert::Infallible;

    /// Lenient parse: unknown labels fall back to General. Model replies and
    /// stored rows both funnel through here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "health" => Sector::Health,
            "engineering" => Sector::Engineering,
            "finance" => Sector::Finance,
            "education" => Sector::Education,
            "legal" => Sector::Legal,
            "technical" => Sector::Technical,
            _ => Sector::General,
        })
    }
}

// ---------------------------------------------------------------------------
// ImpactLevel
// ---------------------------------------------------------------------------

/// Coarse urgency classification. High drives the `is_breaking` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    #[serde(other)]
    Medium,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
        }
    }

    pub fn is_breaking(&self) -> bool {
        matches!(self, ImpactLevel::High)
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImpactLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "high" => ImpactLevel::High,
            _ => ImpactLevel::Medium,
        })
    }
}

// ---------------------------------------------------------------------------
// CandidateItem
// ---------------------------------------------------------------------------

/// A freshly fetched, not-yet-enriched item. Produced by a fetcher, consumed
/// by the engine within a single run; never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateItem {
    pub title: String,
    pub source_url: String,
    pub sector: Sector,
    pub impact_level: ImpactLevel,
    pub published_at: DateTime<Utc>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// EnrichedRecord
// ---------------------------------------------------------------------------

/// The persisted news entity after classification and summarization.
///
/// `id` is minted exactly once, when the item is accepted into a batch, and
/// is never reused even if downstream persistence fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub id: Uuid,
    pub title: String,
    pub source_url: String,
    pub summary: String,
    pub sector: Sector,
    pub impact_level: ImpactLevel,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub is_breaking: bool,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// SearchHit
// ---------------------------------------------------------------------------

/// One ranked semantic-search match from the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub score: f32,
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_parse_is_lenient() {
        assert_eq!("Finance".parse::<Sector>().unwrap(), Sector::Finance);
        assert_eq!(" legal ".parse::<Sector>().unwrap(), Sector::Legal);
        assert_eq!("Sports".parse::<Sector>().unwrap(), Sector::General);
    }

    #[test]
    fn impact_high_is_breaking() {
        assert!("High".parse::<ImpactLevel>().unwrap().is_breaking());
        assert!(!"Medium".parse::<ImpactLevel>().unwrap().is_breaking());
        assert!(!"Low".parse::<ImpactLevel>().unwrap().is_breaking());
    }
}
