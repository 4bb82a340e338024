//! GraphStore trait definition
//!
//! Abstract interface over all Neo4j operations, mirroring the public async
//! methods of `Neo4jClient`. Enables testing against an in-memory mock and
//! keeps the similarity engine independent of the concrete driver.

use crate::neo4j::models::*;
use crate::similarity::models::{
    EdgeMerge, SeekerPreferences, SimilarSeeker, SimilarityDimension,
};
use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for all graph database operations.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a new seeker node
    async fn create_seeker(&self, seeker: &SeekerNode) -> Result<SeekerNode>;

    /// Create a new provider node
    async fn create_provider(&self, provider: &ProviderNode) -> Result<ProviderNode>;

    /// Get a user (seeker or provider) by uid
    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<UserRecord>>;

    /// Get a user (seeker or provider) by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Check whether any user exists with the given email
    async fn user_exists_by_email(&self, email: &str) -> Result<bool>;

    /// Apply a partial update to a seeker profile; returns the updated node
    /// or None when the seeker does not exist
    async fn update_seeker_profile(
        &self,
        uid: &str,
        update: &SeekerProfileUpdate,
    ) -> Result<Option<SeekerNode>>;

    /// Apply a partial update to a provider profile
    async fn update_provider_profile(
        &self,
        uid: &str,
        update: &ProviderProfileUpdate,
    ) -> Result<Option<ProviderNode>>;

    /// Detach-delete a user node (similarity edges go with it)
    async fn delete_user(&self, uid: &str) -> Result<bool>;

    /// List seekers, newest first
    async fn list_seekers(&self, limit: usize, skip: usize) -> Result<Vec<SeekerNode>>;

    /// List providers, newest first
    async fn list_providers(&self, limit: usize, skip: usize) -> Result<Vec<ProviderNode>>;

    /// Search providers by business type / rating / verification
    async fn search_providers(
        &self,
        filters: &ProviderSearchFilters,
        limit: usize,
    ) -> Result<Vec<ProviderNode>>;

    /// Set a provider's verification outcome ("approved" marks the provider
    /// verified, anything else clears the flag); returns the updated node or
    /// None when the provider does not exist
    async fn set_provider_verification(
        &self,
        uid: &str,
        status: &str,
    ) -> Result<Option<ProviderNode>>;

    /// Distinct non-empty business types across all providers, sorted
    async fn list_business_types(&self) -> Result<Vec<String>>;

    // ========================================================================
    // Similarity operations
    // ========================================================================

    /// Load the preference attributes of a seeker, or None when absent.
    /// A malformed stored category list degrades to an empty list.
    async fn seeker_preferences(&self, uid: &str) -> Result<Option<SeekerPreferences>>;

    /// Delete all outgoing similarity edges of a seeker (idempotency step
    /// before a rebuild). Returns the number of edges removed.
    async fn clear_similarity_edges(&self, uid: &str) -> Result<usize>;

    /// Merge `SIMILAR_INTERESTS` edges from `uid` to every *other* seeker
    /// matching `value` on `dimension` (exact category membership or exact
    /// attribute equality), adding the dimension weight to edge strength.
    async fn merge_interest_edges(
        &self,
        uid: &str,
        dimension: SimilarityDimension,
        value: &str,
    ) -> Result<Vec<EdgeMerge>>;

    /// Merge `SIMILAR_LOCATION` edges from `uid` to every other seeker whose
    /// address textually contains `address` (coarse proximity heuristic).
    async fn merge_location_edges(&self, uid: &str, address: &str) -> Result<Vec<EdgeMerge>>;

    /// Top-K seekers by summed outgoing edge strength, descending, with
    /// ascending uid as tie-break. Empty when the seeker has no edges.
    async fn similar_seekers(&self, uid: &str, limit: usize) -> Result<Vec<SimilarSeeker>>;

    // ========================================================================
    // Vehicle operations
    // ========================================================================

    /// Create a vehicle node and link it to its provider; fails when the
    /// provider does not exist
    async fn create_vehicle(&self, vehicle: &VehicleNode) -> Result<VehicleNode>;

    /// Get a vehicle by id
    async fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<VehicleNode>>;

    /// All vehicles owned by a provider, newest first
    async fn list_provider_vehicles(&self, provider_uid: &str) -> Result<Vec<VehicleNode>>;

    /// Apply a partial update to a vehicle
    async fn update_vehicle(
        &self,
        vehicle_id: &str,
        update: &VehicleUpdate,
    ) -> Result<Option<VehicleNode>>;

    /// Delete a vehicle and cascade to its services and the provider's
    /// OFFERS edges, in a single atomic statement
    async fn delete_vehicle(&self, vehicle_id: &str) -> Result<bool>;

    /// Flip a vehicle's availability flag
    async fn set_vehicle_availability(&self, vehicle_id: &str, is_available: bool) -> Result<bool>;

    // ========================================================================
    // Service operations
    // ========================================================================

    /// Create a service node linked to its provider and vehicle; fails when
    /// either does not exist
    async fn create_service(&self, service: &ServiceNode) -> Result<ServiceNode>;

    /// Get a service by id
    async fn get_service(&self, service_id: &str) -> Result<Option<ServiceNode>>;

    /// All services performed by a vehicle, newest first
    async fn list_vehicle_services(&self, vehicle_id: &str) -> Result<Vec<ServiceNode>>;

    /// All services offered by a provider, newest first
    async fn list_provider_services(&self, provider_uid: &str) -> Result<Vec<ServiceNode>>;

    /// Apply a partial update to a service
    async fn update_service(
        &self,
        service_id: &str,
        update: &ServiceUpdate,
    ) -> Result<Option<ServiceNode>>;

    /// Delete a service and its OFFERS/PROVIDES edges
    async fn delete_service(&self, service_id: &str) -> Result<bool>;

    // ========================================================================
    // Health
    // ========================================================================

    /// Cheap connectivity probe
    async fn health_check(&self) -> Result<bool>;
}
