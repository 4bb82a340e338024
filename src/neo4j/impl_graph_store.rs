//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;
use crate::similarity::models::{
    EdgeMerge, SeekerPreferences, SimilarSeeker, SimilarityDimension,
};

#[async_trait]
impl GraphStore for Neo4jClient {
    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_seeker(&self, seeker: &SeekerNode) -> anyhow::Result<SeekerNode> {
        self.create_seeker(seeker).await
    }

    async fn create_provider(&self, provider: &ProviderNode) -> anyhow::Result<ProviderNode> {
        self.create_provider(provider).await
    }

    async fn get_user_by_uid(&self, uid: &str) -> anyhow::Result<Option<UserRecord>> {
        self.get_user_by_uid(uid).await
    }

    async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        self.get_user_by_email(email).await
    }

    async fn user_exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        self.user_exists_by_email(email).await
    }

    async fn update_seeker_profile(
        &self,
        uid: &str,
        update: &SeekerProfileUpdate,
    ) -> anyhow::Result<Option<SeekerNode>> {
        self.update_seeker_profile(uid, update).await
    }

    async fn update_provider_profile(
        &self,
        uid: &str,
        update: &ProviderProfileUpdate,
    ) -> anyhow::Result<Option<ProviderNode>> {
        self.update_provider_profile(uid, update).await
    }

    async fn delete_user(&self, uid: &str) -> anyhow::Result<bool> {
        self.delete_user(uid).await
    }

    async fn list_seekers(&self, limit: usize, skip: usize) -> anyhow::Result<Vec<SeekerNode>> {
        self.list_seekers(limit, skip).await
    }

    async fn list_providers(&self, limit: usize, skip: usize) -> anyhow::Result<Vec<ProviderNode>> {
        self.list_providers(limit, skip).await
    }

    async fn search_providers(
        &self,
        filters: &ProviderSearchFilters,
        limit: usize,
    ) -> anyhow::Result<Vec<ProviderNode>> {
        self.search_providers(filters, limit).await
    }

    async fn set_provider_verification(
        &self,
        uid: &str,
        status: &str,
    ) -> anyhow::Result<Option<ProviderNode>> {
        self.set_provider_verification(uid, status).await
    }

    async fn list_business_types(&self) -> anyhow::Result<Vec<String>> {
        self.list_business_types().await
    }

    // ========================================================================
    // Similarity operations
    // ========================================================================

    async fn seeker_preferences(&self, uid: &str) -> anyhow::Result<Option<SeekerPreferences>> {
        self.seeker_preferences(uid).await
    }

    async fn clear_similarity_edges(&self, uid: &str) -> anyhow::Result<usize> {
        self.clear_similarity_edges(uid).await
    }

    async fn merge_interest_edges(
        &self,
        uid: &str,
        dimension: SimilarityDimension,
        value: &str,
    ) -> anyhow::Result<Vec<EdgeMerge>> {
        self.merge_interest_edges(uid, dimension, value).await
    }

    async fn merge_location_edges(
        &self,
        uid: &str,
        address: &str,
    ) -> anyhow::Result<Vec<EdgeMerge>> {
        self.merge_location_edges(uid, address).await
    }

    async fn similar_seekers(&self, uid: &str, limit: usize) -> anyhow::Result<Vec<SimilarSeeker>> {
        self.similar_seekers(uid, limit).await
    }

    // ========================================================================
    // Vehicle operations
    // ========================================================================

    async fn create_vehicle(&self, vehicle: &VehicleNode) -> anyhow::Result<VehicleNode> {
        self.create_vehicle(vehicle).await
    }

    async fn get_vehicle(&self, vehicle_id: &str) -> anyhow::Result<Option<VehicleNode>> {
        self.get_vehicle(vehicle_id).await
    }

    async fn list_provider_vehicles(
        &self,
        provider_uid: &str,
    ) -> anyhow::Result<Vec<VehicleNode>> {
        self.list_provider_vehicles(provider_uid).await
    }

    async fn update_vehicle(
        &self,
        vehicle_id: &str,
        update: &VehicleUpdate,
    ) -> anyhow::Result<Option<VehicleNode>> {
        self.update_vehicle(vehicle_id, update).await
    }

    async fn delete_vehicle(&self, vehicle_id: &str) -> anyhow::Result<bool> {
        self.delete_vehicle(vehicle_id).await
    }

    async fn set_vehicle_availability(
        &self,
        vehicle_id: &str,
        is_available: bool,
    ) -> anyhow::Result<bool> {
        self.set_vehicle_availability(vehicle_id, is_available).await
    }

    // ========================================================================
    // Service operations
    // ========================================================================

    async fn create_service(&self, service: &ServiceNode) -> anyhow::Result<ServiceNode> {
        self.create_service(service).await
    }

    async fn get_service(&self, service_id: &str) -> anyhow::Result<Option<ServiceNode>> {
        self.get_service(service_id).await
    }

    async fn list_vehicle_services(&self, vehicle_id: &str) -> anyhow::Result<Vec<ServiceNode>> {
        self.list_vehicle_services(vehicle_id).await
    }

    async fn list_provider_services(
        &self,
        provider_uid: &str,
    ) -> anyhow::Result<Vec<ServiceNode>> {
        self.list_provider_services(provider_uid).await
    }

    async fn update_service(
        &self,
        service_id: &str,
        update: &ServiceUpdate,
    ) -> anyhow::Result<Option<ServiceNode>> {
        self.update_service(service_id, update).await
    }

    async fn delete_service(&self, service_id: &str) -> anyhow::Result<bool> {
        self.delete_service(service_id).await
    }

    // ========================================================================
    // Health
    // ========================================================================

    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }
}
