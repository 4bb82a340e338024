//! Types for the seeker similarity graph

use serde::{Deserialize, Serialize};

/// The preference attributes a similarity recomputation reads from a seeker.
///
/// Any subset may be unset; a malformed stored category list degrades to an
/// empty list rather than failing the load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeekerPreferences {
    pub service_categories: Vec<String>,
    pub primary_purpose: Option<String>,
    pub urgency: Option<String>,
    pub address: Option<String>,
}

/// The matching dimensions carried on `SIMILAR_INTERESTS` edges.
///
/// Location matches live on a separate `SIMILAR_LOCATION` relation and are
/// not part of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityDimension {
    ServiceCategory,
    PrimaryPurpose,
    Urgency,
}

impl SimilarityDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityDimension::ServiceCategory => "service_category",
            SimilarityDimension::PrimaryPurpose => "primary_purpose",
            SimilarityDimension::Urgency => "urgency",
        }
    }

    /// Edge-strength contribution of a match on this dimension. A shared
    /// primary purpose is stronger evidence than a shared category or urgency.
    pub fn weight(&self) -> i64 {
        match self {
            SimilarityDimension::PrimaryPurpose => 2,
            _ => 1,
        }
    }
}

/// One merged edge reported back from a dimension query
#[derive(Debug, Clone, Serialize)]
pub struct EdgeMerge {
    /// Destination seeker uid
    pub uid: String,
    /// Destination seeker display name
    pub name: String,
    /// Which attribute produced the match ("service_category", "location", ...)
    pub similarity: String,
    /// Edge strength after the merge
    pub strength: i64,
}

/// Result of recomputing a seeker's outgoing similarity edges
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecomputeOutcome {
    /// Uid of the seeker whose edges were recomputed
    pub seeker_uid: String,
    /// Total merge operations performed across all dimensions
    pub relationships_created: usize,
    /// Every edge merged, in dimension order
    pub similar_seekers: Vec<EdgeMerge>,
}

impl RecomputeOutcome {
    /// Zero-result outcome for a subject that does not exist in the store.
    pub fn empty(uid: &str) -> Self {
        Self {
            seeker_uid: uid.to_string(),
            ..Default::default()
        }
    }

    /// De-duplicated uids of all seekers touched by this recomputation.
    pub fn touched_uids(&self) -> Vec<String> {
        let mut uids: Vec<String> = self.similar_seekers.iter().map(|s| s.uid.clone()).collect();
        uids.sort();
        uids.dedup();
        uids
    }
}

/// One ranked entry from a top-K similarity query.
///
/// Deliberately carries no phone number: this list is shown to other users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarSeeker {
    pub uid: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub purpose: Option<String>,
    pub address: Option<String>,
    /// Distinct relation-type labels observed on the aggregated edges
    pub relationship_types: Vec<String>,
    /// Sum of edge strengths to this seeker
    pub similarity_score: i64,
}
