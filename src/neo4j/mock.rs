//! In-memory mock implementation of GraphStore for testing.
//!
//! Provides a complete mock of all graph operations using
//! `tokio::sync::RwLock<HashMap<K, V>>` collections.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use crate::similarity::models::{
    EdgeMerge, SeekerPreferences, SimilarSeeker, SimilarityDimension,
};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Key of a similarity edge: (source uid, destination uid, relation label,
/// matching value). Mirrors the MERGE key used against the real graph.
pub type EdgeKey = (String, String, String, String);

/// Value carried on a similarity edge.
#[derive(Debug, Clone)]
pub struct MockEdge {
    pub similarity_type: String,
    pub strength: i64,
}

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    // Entity stores
    pub seekers: RwLock<HashMap<String, SeekerNode>>,
    pub providers: RwLock<HashMap<String, ProviderNode>>,
    pub vehicles: RwLock<HashMap<String, VehicleNode>>,
    pub services: RwLock<HashMap<String, ServiceNode>>,

    // Similarity edges
    pub edges: RwLock<HashMap<EdgeKey, MockEdge>>,

    // Failure injection for engine tests
    pub fail_interest_dimension: RwLock<Option<SimilarityDimension>>,
    pub fail_clear: RwLock<bool>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            seekers: RwLock::new(HashMap::new()),
            providers: RwLock::new(HashMap::new()),
            vehicles: RwLock::new(HashMap::new()),
            services: RwLock::new(HashMap::new()),
            edges: RwLock::new(HashMap::new()),
            fail_interest_dimension: RwLock::new(None),
            fail_clear: RwLock::new(false),
        }
    }

    /// Sum of edge strengths from `src` to `dst` across all edges.
    pub async fn edge_strength(&self, src: &str, dst: &str) -> i64 {
        self.edges
            .read()
            .await
            .iter()
            .filter(|((s, d, _, _), _)| s == src && d == dst)
            .map(|(_, e)| e.strength)
            .sum()
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_seeker(&self, seeker: &SeekerNode) -> Result<SeekerNode> {
        let mut seekers = self.seekers.write().await;
        if seekers.contains_key(&seeker.uid) {
            bail!("uid already exists: {}", seeker.uid);
        }
        seekers.insert(seeker.uid.clone(), seeker.clone());
        Ok(seeker.clone())
    }

    async fn create_provider(&self, provider: &ProviderNode) -> Result<ProviderNode> {
        let mut providers = self.providers.write().await;
        if providers.contains_key(&provider.uid) {
            bail!("uid already exists: {}", provider.uid);
        }
        providers.insert(provider.uid.clone(), provider.clone());
        Ok(provider.clone())
    }

    async fn get_user_by_uid(&self, uid: &str) -> Result<Option<UserRecord>> {
        if let Some(s) = self.seekers.read().await.get(uid) {
            return Ok(Some(UserRecord::Seeker(s.clone())));
        }
        if let Some(p) = self.providers.read().await.get(uid) {
            return Ok(Some(UserRecord::Provider(p.clone())));
        }
        Ok(None)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        if let Some(s) = self
            .seekers
            .read()
            .await
            .values()
            .find(|s| s.email == email)
        {
            return Ok(Some(UserRecord::Seeker(s.clone())));
        }
        if let Some(p) = self
            .providers
            .read()
            .await
            .values()
            .find(|p| p.email == email)
        {
            return Ok(Some(UserRecord::Provider(p.clone())));
        }
        Ok(None)
    }

    async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.get_user_by_email(email).await?.is_some())
    }

    async fn update_seeker_profile(
        &self,
        uid: &str,
        update: &SeekerProfileUpdate,
    ) -> Result<Option<SeekerNode>> {
        let mut seekers = self.seekers.write().await;
        let Some(seeker) = seekers.get_mut(uid) else {
            return Ok(None);
        };
        if let Some(v) = &update.full_name {
            seeker.full_name = v.clone();
        }
        if let Some(v) = &update.phone {
            seeker.phone = v.clone();
        }
        if let Some(v) = &update.profile_image {
            seeker.profile_image = Some(v.clone());
        }
        if let Some(v) = &update.address {
            seeker.address = Some(v.clone());
        }
        if let Some(v) = &update.bio {
            seeker.bio = Some(v.clone());
        }
        if let Some(v) = &update.gender {
            seeker.gender = Some(v.clone());
        }
        if let Some(v) = &update.date_of_birth {
            seeker.date_of_birth = Some(v.clone());
        }
        if let Some(v) = &update.service_categories {
            seeker.service_categories = v.clone();
        }
        if let Some(v) = &update.primary_purpose {
            seeker.primary_purpose = Some(v.clone());
        }
        if let Some(v) = &update.urgency {
            seeker.urgency = Some(v.clone());
        }
        if let Some(v) = &update.preferences_notes {
            seeker.preferences_notes = Some(v.clone());
        }
        if !update.is_empty() {
            seeker.updated_at = Utc::now();
        }
        Ok(Some(seeker.clone()))
    }

    async fn update_provider_profile(
        &self,
        uid: &str,
        update: &ProviderProfileUpdate,
    ) -> Result<Option<ProviderNode>> {
        let mut providers = self.providers.write().await;
        let Some(provider) = providers.get_mut(uid) else {
            return Ok(None);
        };
        if let Some(v) = &update.full_name {
            provider.full_name = v.clone();
        }
        if let Some(v) = &update.phone {
            provider.phone = v.clone();
        }
        if let Some(v) = &update.business_name {
            provider.business_name = Some(v.clone());
        }
        if let Some(v) = &update.business_type {
            provider.business_type = Some(v.clone());
        }
        if let Some(v) = &update.service_type {
            provider.service_type = Some(v.clone());
        }
        if let Some(v) = &update.cnic_number {
            provider.cnic_number = Some(v.clone());
        }
        if let Some(v) = &update.address {
            provider.address = Some(v.clone());
        }
        if let Some(v) = &update.city {
            provider.city = Some(v.clone());
        }
        if let Some(v) = &update.province {
            provider.province = Some(v.clone());
        }
        if let Some(v) = update.years_experience {
            provider.years_experience = Some(v);
        }
        if let Some(v) = &update.description {
            provider.description = Some(v.clone());
        }
        if let Some(v) = &update.profile_image {
            provider.profile_image = Some(v.clone());
        }
        if let Some(v) = &update.cnic_front_image {
            provider.cnic_front_image = Some(v.clone());
        }
        if let Some(v) = &update.cnic_back_image {
            provider.cnic_back_image = Some(v.clone());
        }
        if let Some(v) = &update.license_image {
            provider.license_image = Some(v.clone());
        }
        if let Some(v) = &update.license_number {
            provider.license_number = Some(v.clone());
        }
        if !update.is_empty() {
            provider.updated_at = Utc::now();
        }
        Ok(Some(provider.clone()))
    }

    async fn delete_user(&self, uid: &str) -> Result<bool> {
        let was_seeker = self.seekers.write().await.remove(uid).is_some();
        let was_provider = self.providers.write().await.remove(uid).is_some();
        if !was_seeker && !was_provider {
            return Ok(false);
        }
        // Edges in either direction go with the node
        self.edges
            .write()
            .await
            .retain(|(s, d, _, _), _| s != uid && d != uid);
        if was_provider {
            self.vehicles
                .write()
                .await
                .retain(|_, v| v.provider_uid != uid);
            self.services
                .write()
                .await
                .retain(|_, s| s.provider_uid != uid);
        }
        Ok(true)
    }

    async fn list_seekers(&self, limit: usize, skip: usize) -> Result<Vec<SeekerNode>> {
        let mut seekers: Vec<SeekerNode> = self.seekers.read().await.values().cloned().collect();
        seekers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(seekers.into_iter().skip(skip).take(limit).collect())
    }

    async fn list_providers(&self, limit: usize, skip: usize) -> Result<Vec<ProviderNode>> {
        let mut providers: Vec<ProviderNode> =
            self.providers.read().await.values().cloned().collect();
        providers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(providers.into_iter().skip(skip).take(limit).collect())
    }

    async fn search_providers(
        &self,
        filters: &ProviderSearchFilters,
        limit: usize,
    ) -> Result<Vec<ProviderNode>> {
        let mut matches: Vec<ProviderNode> = self
            .providers
            .read()
            .await
            .values()
            .filter(|p| p.rating >= filters.min_rating)
            .filter(|p| match &filters.business_type {
                Some(bt) => p.business_type.as_deref() == Some(bt.as_str()),
                None => true,
            })
            .filter(|p| match filters.is_verified {
                Some(v) => p.is_verified == v,
                None => true,
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        matches.truncate(limit);
        Ok(matches)
    }

    async fn set_provider_verification(
        &self,
        uid: &str,
        status: &str,
    ) -> Result<Option<ProviderNode>> {
        let mut providers = self.providers.write().await;
        Ok(providers.get_mut(uid).map(|p| {
            p.verification_status = status.to_string();
            p.is_verified = status == "approved";
            p.updated_at = chrono::Utc::now();
            p.clone()
        }))
    }

    async fn list_business_types(&self) -> Result<Vec<String>> {
        let mut types: Vec<String> = self
            .providers
            .read()
            .await
            .values()
            .filter_map(|p| p.business_type.clone())
            .filter(|bt| !bt.is_empty())
            .collect();
        types.sort();
        types.dedup();
        Ok(types)
    }

    // ========================================================================
    // Similarity operations
    // ========================================================================

    async fn seeker_preferences(&self, uid: &str) -> Result<Option<SeekerPreferences>> {
        Ok(self.seekers.read().await.get(uid).map(|s| SeekerPreferences {
            service_categories: s.service_categories.clone(),
            primary_purpose: s.primary_purpose.clone(),
            urgency: s.urgency.clone(),
            address: s.address.clone(),
        }))
    }

    async fn clear_similarity_edges(&self, uid: &str) -> Result<usize> {
        if *self.fail_clear.read().await {
            return Err(anyhow!("injected clear failure"));
        }
        let mut edges = self.edges.write().await;
        let before = edges.len();
        edges.retain(|(s, _, _, _), _| s != uid);
        Ok(before - edges.len())
    }

    async fn merge_interest_edges(
        &self,
        uid: &str,
        dimension: SimilarityDimension,
        value: &str,
    ) -> Result<Vec<EdgeMerge>> {
        if *self.fail_interest_dimension.read().await == Some(dimension) {
            return Err(anyhow!("injected merge failure for {}", dimension.as_str()));
        }
        let seekers = self.seekers.read().await;
        if !seekers.contains_key(uid) {
            return Ok(Vec::new());
        }
        let mut candidates: Vec<&SeekerNode> = seekers
            .values()
            .filter(|s2| s2.uid != uid)
            .filter(|s2| match dimension {
                SimilarityDimension::ServiceCategory => {
                    s2.service_categories.iter().any(|c| c == value)
                }
                SimilarityDimension::PrimaryPurpose => {
                    s2.primary_purpose.as_deref() == Some(value)
                }
                SimilarityDimension::Urgency => s2.urgency.as_deref() == Some(value),
            })
            .collect();
        candidates.sort_by(|a, b| a.uid.cmp(&b.uid));

        let mut edges = self.edges.write().await;
        let mut merges = Vec::new();
        for s2 in candidates {
            let key = (
                uid.to_string(),
                s2.uid.clone(),
                "SIMILAR_INTERESTS".to_string(),
                value.to_string(),
            );
            let edge = edges.entry(key).or_insert(MockEdge {
                similarity_type: dimension.as_str().to_string(),
                strength: 0,
            });
            edge.strength += dimension.weight();
            merges.push(EdgeMerge {
                uid: s2.uid.clone(),
                name: s2.full_name.clone(),
                similarity: dimension.as_str().to_string(),
                strength: edge.strength,
            });
        }
        Ok(merges)
    }

    async fn merge_location_edges(&self, uid: &str, address: &str) -> Result<Vec<EdgeMerge>> {
        let seekers = self.seekers.read().await;
        if !seekers.contains_key(uid) {
            return Ok(Vec::new());
        }
        let mut candidates: Vec<&SeekerNode> = seekers
            .values()
            .filter(|s2| s2.uid != uid)
            .filter(|s2| {
                s2.address
                    .as_deref()
                    .map(|a| a.contains(address))
                    .unwrap_or(false)
            })
            .collect();
        candidates.sort_by(|a, b| a.uid.cmp(&b.uid));

        let mut edges = self.edges.write().await;
        let mut merges = Vec::new();
        for s2 in candidates {
            let key = (
                uid.to_string(),
                s2.uid.clone(),
                "SIMILAR_LOCATION".to_string(),
                address.to_string(),
            );
            let edge = edges.entry(key).or_insert(MockEdge {
                similarity_type: "location".to_string(),
                strength: 0,
            });
            edge.strength += 1;
            merges.push(EdgeMerge {
                uid: s2.uid.clone(),
                name: s2.full_name.clone(),
                similarity: "location".to_string(),
                strength: edge.strength,
            });
        }
        Ok(merges)
    }

    async fn similar_seekers(&self, uid: &str, limit: usize) -> Result<Vec<SimilarSeeker>> {
        let edges = self.edges.read().await;
        // dst uid -> (total strength, distinct relation labels)
        let mut totals: HashMap<String, (i64, Vec<String>)> = HashMap::new();
        for ((src, dst, label, _), edge) in edges.iter() {
            if src != uid {
                continue;
            }
            let entry = totals.entry(dst.clone()).or_default();
            entry.0 += edge.strength;
            if !entry.1.contains(label) {
                entry.1.push(label.clone());
            }
        }
        drop(edges);

        let seekers = self.seekers.read().await;
        let mut ranked: Vec<SimilarSeeker> = totals
            .into_iter()
            .filter_map(|(dst, (total, mut labels))| {
                labels.sort();
                seekers.get(&dst).map(|s| SimilarSeeker {
                    uid: s.uid.clone(),
                    name: s.full_name.clone(),
                    email: s.email.clone(),
                    categories: s.service_categories.clone(),
                    purpose: s.primary_purpose.clone(),
                    address: s.address.clone(),
                    relationship_types: labels,
                    similarity_score: total,
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.similarity_score
                .cmp(&a.similarity_score)
                .then_with(|| a.uid.cmp(&b.uid))
        });
        ranked.truncate(limit);
        Ok(ranked)
    }

    // ========================================================================
    // Vehicle operations
    // ========================================================================

    async fn create_vehicle(&self, vehicle: &VehicleNode) -> Result<VehicleNode> {
        if !self
            .providers
            .read()
            .await
            .contains_key(&vehicle.provider_uid)
        {
            bail!("provider not found: {}", vehicle.provider_uid);
        }
        self.vehicles
            .write()
            .await
            .insert(vehicle.vehicle_id.clone(), vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<VehicleNode>> {
        Ok(self.vehicles.read().await.get(vehicle_id).cloned())
    }

    async fn list_provider_vehicles(&self, provider_uid: &str) -> Result<Vec<VehicleNode>> {
        let mut vehicles: Vec<VehicleNode> = self
            .vehicles
            .read()
            .await
            .values()
            .filter(|v| v.provider_uid == provider_uid)
            .cloned()
            .collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(vehicles)
    }

    async fn update_vehicle(
        &self,
        vehicle_id: &str,
        update: &VehicleUpdate,
    ) -> Result<Option<VehicleNode>> {
        let mut vehicles = self.vehicles.write().await;
        let Some(vehicle) = vehicles.get_mut(vehicle_id) else {
            return Ok(None);
        };
        if let Some(v) = &update.name {
            vehicle.name = v.clone();
        }
        if let Some(v) = &update.vehicle_type {
            vehicle.vehicle_type = v.clone();
        }
        if let Some(v) = &update.make {
            vehicle.make = v.clone();
        }
        if let Some(v) = &update.model {
            vehicle.model = v.clone();
        }
        if let Some(v) = update.year {
            vehicle.year = v;
        }
        if let Some(v) = &update.registration_number {
            vehicle.registration_number = v.clone();
        }
        if let Some(v) = &update.capacity {
            vehicle.capacity = Some(v.clone());
        }
        if let Some(v) = &update.condition {
            vehicle.condition = v.clone();
        }
        if let Some(v) = &update.vehicle_image {
            vehicle.vehicle_image = Some(v.clone());
        }
        if let Some(v) = &update.additional_images {
            vehicle.additional_images = Some(v.clone());
        }
        if let Some(v) = update.has_insurance {
            vehicle.has_insurance = v;
        }
        if let Some(v) = &update.insurance_expiry {
            vehicle.insurance_expiry = Some(v.clone());
        }
        if let Some(v) = update.is_available {
            vehicle.is_available = v;
        }
        if let Some(v) = &update.city {
            vehicle.city = Some(v.clone());
        }
        if let Some(v) = &update.province {
            vehicle.province = Some(v.clone());
        }
        if let Some(v) = update.price_per_hour {
            vehicle.price_per_hour = Some(v);
        }
        if let Some(v) = update.price_per_day {
            vehicle.price_per_day = Some(v);
        }
        if let Some(v) = &update.description {
            vehicle.description = Some(v.clone());
        }
        vehicle.updated_at = Utc::now();
        Ok(Some(vehicle.clone()))
    }

    async fn delete_vehicle(&self, vehicle_id: &str) -> Result<bool> {
        let removed = self.vehicles.write().await.remove(vehicle_id).is_some();
        if removed {
            self.services
                .write()
                .await
                .retain(|_, s| s.vehicle_id != vehicle_id);
        }
        Ok(removed)
    }

    async fn set_vehicle_availability(&self, vehicle_id: &str, is_available: bool) -> Result<bool> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.get_mut(vehicle_id) {
            Some(vehicle) => {
                vehicle.is_available = is_available;
                vehicle.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // Service operations
    // ========================================================================

    async fn create_service(&self, service: &ServiceNode) -> Result<ServiceNode> {
        if !self
            .providers
            .read()
            .await
            .contains_key(&service.provider_uid)
        {
            bail!("provider not found: {}", service.provider_uid);
        }
        if !self
            .vehicles
            .read()
            .await
            .contains_key(&service.vehicle_id)
        {
            bail!("vehicle not found: {}", service.vehicle_id);
        }
        self.services
            .write()
            .await
            .insert(service.service_id.clone(), service.clone());
        Ok(service.clone())
    }

    async fn get_service(&self, service_id: &str) -> Result<Option<ServiceNode>> {
        Ok(self.services.read().await.get(service_id).cloned())
    }

    async fn list_vehicle_services(&self, vehicle_id: &str) -> Result<Vec<ServiceNode>> {
        let mut services: Vec<ServiceNode> = self
            .services
            .read()
            .await
            .values()
            .filter(|s| s.vehicle_id == vehicle_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(services)
    }

    async fn list_provider_services(&self, provider_uid: &str) -> Result<Vec<ServiceNode>> {
        let mut services: Vec<ServiceNode> = self
            .services
            .read()
            .await
            .values()
            .filter(|s| s.provider_uid == provider_uid)
            .cloned()
            .collect();
        services.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(services)
    }

    async fn update_service(
        &self,
        service_id: &str,
        update: &ServiceUpdate,
    ) -> Result<Option<ServiceNode>> {
        let mut services = self.services.write().await;
        let Some(service) = services.get_mut(service_id) else {
            return Ok(None);
        };
        if let Some(v) = &update.service_name {
            service.service_name = v.clone();
        }
        if let Some(v) = &update.service_category {
            service.service_category = v.clone();
        }
        if let Some(v) = update.price_per_hour {
            service.price_per_hour = Some(v);
        }
        if let Some(v) = update.price_per_day {
            service.price_per_day = Some(v);
        }
        if let Some(v) = update.price_per_service {
            service.price_per_service = Some(v);
        }
        if let Some(v) = &update.description {
            service.description = Some(v.clone());
        }
        if let Some(v) = &update.service_area {
            service.service_area = Some(v.clone());
        }
        if let Some(v) = &update.min_booking_duration {
            service.min_booking_duration = Some(v.clone());
        }
        if let Some(v) = update.is_active {
            service.is_active = v;
        }
        if let Some(v) = &update.available_days {
            service.available_days = Some(v.clone());
        }
        if let Some(v) = &update.available_hours {
            service.available_hours = Some(v.clone());
        }
        if let Some(v) = update.operator_included {
            service.operator_included = v;
        }
        if let Some(v) = update.fuel_included {
            service.fuel_included = v;
        }
        if let Some(v) = update.transportation_included {
            service.transportation_included = v;
        }
        service.updated_at = Utc::now();
        Ok(Some(service.clone()))
    }

    async fn delete_service(&self, service_id: &str) -> Result<bool> {
        Ok(self.services.write().await.remove(service_id).is_some())
    }

    // ========================================================================
    // Health
    // ========================================================================

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
