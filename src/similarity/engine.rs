//! Similarity recomputation and ranked retrieval.
//!
//! A recomputation is delete-and-rebuild: all outgoing similarity edges of
//! the subject are cleared, then re-merged from the subject's current
//! preferences, so running it any number of times converges to the same
//! graph state. A failure in one matching dimension is logged and skipped
//! rather than aborting the remaining dimensions.

use crate::neo4j::GraphStore;
use crate::similarity::models::{RecomputeOutcome, SimilarSeeker, SimilarityDimension};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Engine for building and querying the seeker similarity graph.
pub struct SimilarityEngine {
    store: Arc<dyn GraphStore>,
}

impl SimilarityEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Rebuild all outgoing similarity edges of a seeker from their current
    /// preference attributes.
    ///
    /// A missing seeker yields an empty outcome rather than an error, so
    /// callers can fire this after profile writes without existence checks.
    pub async fn recompute(&self, uid: &str) -> Result<RecomputeOutcome> {
        let Some(prefs) = self.store.seeker_preferences(uid).await? else {
            debug!(uid, "similarity recompute skipped, seeker not found");
            return Ok(RecomputeOutcome::empty(uid));
        };

        // Clear first so the rebuild is idempotent. A failed clear is logged
        // and the rebuild proceeds; strengths may be inflated until the next
        // successful run, which self-heals.
        match self.store.clear_similarity_edges(uid).await {
            Ok(removed) if removed > 0 => {
                debug!(uid, removed, "cleared outgoing similarity edges");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(uid, error = %e, "failed to clear similarity edges, continuing");
            }
        }

        let mut outcome = RecomputeOutcome::empty(uid);

        for category in &prefs.service_categories {
            self.merge_dimension(
                &mut outcome,
                SimilarityDimension::ServiceCategory,
                category,
            )
            .await;
        }
        if let Some(purpose) = &prefs.primary_purpose {
            self.merge_dimension(&mut outcome, SimilarityDimension::PrimaryPurpose, purpose)
                .await;
        }
        if let Some(urgency) = &prefs.urgency {
            self.merge_dimension(&mut outcome, SimilarityDimension::Urgency, urgency)
                .await;
        }
        if let Some(address) = prefs.address.as_deref().map(str::trim) {
            if !address.is_empty() {
                match self.store.merge_location_edges(uid, address).await {
                    Ok(merges) => {
                        outcome.relationships_created += merges.len();
                        outcome.similar_seekers.extend(merges);
                    }
                    Err(e) => {
                        warn!(uid, error = %e, "location edge merge failed, skipping");
                    }
                }
            }
        }

        info!(
            uid,
            relationships = outcome.relationships_created,
            seekers = outcome.touched_uids().len(),
            "similarity edges recomputed"
        );
        Ok(outcome)
    }

    /// Top-K most similar seekers, strongest first. A non-positive limit
    /// short-circuits to an empty list.
    pub async fn similar_seekers(&self, uid: &str, limit: usize) -> Result<Vec<SimilarSeeker>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.store.similar_seekers(uid, limit).await
    }

    async fn merge_dimension(
        &self,
        outcome: &mut RecomputeOutcome,
        dimension: SimilarityDimension,
        value: &str,
    ) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match self
            .store
            .merge_interest_edges(&outcome.seeker_uid, dimension, value)
            .await
        {
            Ok(merges) => {
                outcome.relationships_created += merges.len();
                outcome.similar_seekers.extend(merges);
            }
            Err(e) => {
                warn!(
                    uid = %outcome.seeker_uid,
                    dimension = dimension.as_str(),
                    error = %e,
                    "interest edge merge failed, skipping dimension"
                );
            }
        }
    }
}
