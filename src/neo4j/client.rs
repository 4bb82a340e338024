//! Neo4j client for the marketplace graph

use super::models::*;
use crate::similarity::models::{
    EdgeMerge, SeekerPreferences, SimilarSeeker, SimilarityDimension,
};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use neo4rs::{query, Graph};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

/// Builder for dynamic SET/WHERE fragments in Cypher queries
#[derive(Default)]
struct ClauseBuilder {
    parts: Vec<String>,
}

impl ClauseBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Add the fragment when the condition holds
    fn push_if(&mut self, present: bool, fragment: &str) -> &mut Self {
        if present {
            self.parts.push(fragment.to_string());
        }
        self
    }

    fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn join(&self, sep: &str) -> String {
        self.parts.join(sep)
    }
}

/// Read an optional string property, treating the empty string as absent.
/// Optional fields are written as empty strings so the property always exists.
fn opt_string(node: &neo4rs::Node, key: &str) -> Option<String> {
    node.get::<String>(key).ok().filter(|s| !s.is_empty())
}

/// SET fragments for a partial seeker update. `name` mirrors `full_name` as
/// the node display property, so both are written together.
fn seeker_set_clauses(update: &SeekerProfileUpdate) -> ClauseBuilder {
    let mut set = ClauseBuilder::new();
    set.push_if(
        update.full_name.is_some(),
        "s.full_name = $full_name, s.name = $full_name",
    )
    .push_if(update.phone.is_some(), "s.phone = $phone")
    .push_if(
        update.profile_image.is_some(),
        "s.profile_image = $profile_image",
    )
    .push_if(update.address.is_some(), "s.address = $address")
    .push_if(update.bio.is_some(), "s.bio = $bio")
    .push_if(update.gender.is_some(), "s.gender = $gender")
    .push_if(
        update.date_of_birth.is_some(),
        "s.date_of_birth = $date_of_birth",
    )
    .push_if(
        update.service_categories.is_some(),
        "s.service_categories = $service_categories",
    )
    .push_if(
        update.primary_purpose.is_some(),
        "s.primary_purpose = $primary_purpose",
    )
    .push_if(update.urgency.is_some(), "s.urgency = $urgency")
    .push_if(
        update.preferences_notes.is_some(),
        "s.preferences_notes = $preferences_notes",
    );
    set
}

/// SET fragments for a partial provider update, with the same `name` mirror.
fn provider_set_clauses(update: &ProviderProfileUpdate) -> ClauseBuilder {
    let mut set = ClauseBuilder::new();
    set.push_if(
        update.full_name.is_some(),
        "p.full_name = $full_name, p.name = $full_name",
    )
    .push_if(update.phone.is_some(), "p.phone = $phone")
    .push_if(
        update.business_name.is_some(),
        "p.business_name = $business_name",
    )
    .push_if(
        update.business_type.is_some(),
        "p.business_type = $business_type",
    )
    .push_if(
        update.service_type.is_some(),
        "p.service_type = $service_type",
    )
    .push_if(update.cnic_number.is_some(), "p.cnic_number = $cnic_number")
    .push_if(update.address.is_some(), "p.address = $address")
    .push_if(update.city.is_some(), "p.city = $city")
    .push_if(update.province.is_some(), "p.province = $province")
    .push_if(
        update.years_experience.is_some(),
        "p.years_experience = $years_experience",
    )
    .push_if(update.description.is_some(), "p.description = $description")
    .push_if(
        update.profile_image.is_some(),
        "p.profile_image = $profile_image",
    )
    .push_if(
        update.cnic_front_image.is_some(),
        "p.cnic_front_image = $cnic_front_image",
    )
    .push_if(
        update.cnic_back_image.is_some(),
        "p.cnic_back_image = $cnic_back_image",
    )
    .push_if(
        update.license_image.is_some(),
        "p.license_image = $license_image",
    )
    .push_if(
        update.license_number.is_some(),
        "p.license_number = $license_number",
    );
    set
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        // Initialize schema
        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT seeker_uid IF NOT EXISTS FOR (s:Seeker) REQUIRE s.uid IS UNIQUE",
            "CREATE CONSTRAINT seeker_email IF NOT EXISTS FOR (s:Seeker) REQUIRE s.email IS UNIQUE",
            "CREATE CONSTRAINT provider_uid IF NOT EXISTS FOR (p:Provider) REQUIRE p.uid IS UNIQUE",
            "CREATE CONSTRAINT provider_email IF NOT EXISTS FOR (p:Provider) REQUIRE p.email IS UNIQUE",
            "CREATE CONSTRAINT vehicle_id IF NOT EXISTS FOR (v:Vehicle) REQUIRE v.vehicle_id IS UNIQUE",
            "CREATE CONSTRAINT service_id IF NOT EXISTS FOR (s:Service) REQUIRE s.service_id IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX seeker_urgency IF NOT EXISTS FOR (s:Seeker) ON (s.urgency)",
            "CREATE INDEX seeker_purpose IF NOT EXISTS FOR (s:Seeker) ON (s.primary_purpose)",
            "CREATE INDEX provider_business_type IF NOT EXISTS FOR (p:Provider) ON (p.business_type)",
            "CREATE INDEX provider_rating IF NOT EXISTS FOR (p:Provider) ON (p.rating)",
            "CREATE INDEX vehicle_provider IF NOT EXISTS FOR (v:Vehicle) ON (v.provider_uid)",
            "CREATE INDEX vehicle_type IF NOT EXISTS FOR (v:Vehicle) ON (v.vehicle_type)",
            "CREATE INDEX service_provider IF NOT EXISTS FOR (s:Service) ON (s.provider_uid)",
            "CREATE INDEX service_category IF NOT EXISTS FOR (s:Service) ON (s.service_category)",
        ];

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a new seeker node
    pub async fn create_seeker(&self, seeker: &SeekerNode) -> Result<SeekerNode> {
        let q = query(
            r#"
            CREATE (s:Seeker {
                uid: $uid,
                email: $email,
                full_name: $full_name,
                name: $full_name,
                phone: $phone,
                user_type: 'seeker',
                profile_image: $profile_image,
                address: $address,
                bio: $bio,
                gender: $gender,
                date_of_birth: $date_of_birth,
                service_categories: $service_categories,
                primary_purpose: $primary_purpose,
                urgency: $urgency,
                preferences_notes: $preferences_notes,
                created_at: $created_at,
                updated_at: $updated_at
            })
            RETURN s
            "#,
        )
        .param("uid", seeker.uid.clone())
        .param("email", seeker.email.clone())
        .param("full_name", seeker.full_name.clone())
        .param("phone", seeker.phone.clone())
        .param(
            "profile_image",
            seeker.profile_image.clone().unwrap_or_default(),
        )
        .param("address", seeker.address.clone().unwrap_or_default())
        .param("bio", seeker.bio.clone().unwrap_or_default())
        .param("gender", seeker.gender.clone().unwrap_or_default())
        .param(
            "date_of_birth",
            seeker.date_of_birth.clone().unwrap_or_default(),
        )
        .param("service_categories", seeker.service_categories.clone())
        .param(
            "primary_purpose",
            seeker.primary_purpose.clone().unwrap_or_default(),
        )
        .param("urgency", seeker.urgency.clone().unwrap_or_default())
        .param(
            "preferences_notes",
            seeker.preferences_notes.clone().unwrap_or_default(),
        )
        .param("created_at", seeker.created_at.to_rfc3339())
        .param("updated_at", seeker.updated_at.to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("s")?;
            self.node_to_seeker(&node)
        } else {
            bail!("seeker node was not created: {}", seeker.uid)
        }
    }

    /// Create a new provider node
    pub async fn create_provider(&self, provider: &ProviderNode) -> Result<ProviderNode> {
        let q = query(
            r#"
            CREATE (p:Provider {
                uid: $uid,
                email: $email,
                full_name: $full_name,
                name: $full_name,
                phone: $phone,
                user_type: 'provider',
                business_name: $business_name,
                business_type: $business_type,
                service_type: $service_type,
                cnic_number: $cnic_number,
                address: $address,
                city: $city,
                province: $province,
                years_experience: $years_experience,
                description: $description,
                profile_image: $profile_image,
                cnic_front_image: $cnic_front_image,
                cnic_back_image: $cnic_back_image,
                license_image: $license_image,
                license_number: $license_number,
                is_verified: $is_verified,
                documents_uploaded: $documents_uploaded,
                verification_status: $verification_status,
                rating: $rating,
                total_bookings: $total_bookings,
                created_at: $created_at,
                updated_at: $updated_at
            })
            RETURN p
            "#,
        )
        .param("uid", provider.uid.clone())
        .param("email", provider.email.clone())
        .param("full_name", provider.full_name.clone())
        .param("phone", provider.phone.clone())
        .param(
            "business_name",
            provider.business_name.clone().unwrap_or_default(),
        )
        .param(
            "business_type",
            provider.business_type.clone().unwrap_or_default(),
        )
        .param(
            "service_type",
            provider.service_type.clone().unwrap_or_default(),
        )
        .param(
            "cnic_number",
            provider.cnic_number.clone().unwrap_or_default(),
        )
        .param("address", provider.address.clone().unwrap_or_default())
        .param("city", provider.city.clone().unwrap_or_default())
        .param("province", provider.province.clone().unwrap_or_default())
        .param("years_experience", provider.years_experience.unwrap_or(-1))
        .param(
            "description",
            provider.description.clone().unwrap_or_default(),
        )
        .param(
            "profile_image",
            provider.profile_image.clone().unwrap_or_default(),
        )
        .param(
            "cnic_front_image",
            provider.cnic_front_image.clone().unwrap_or_default(),
        )
        .param(
            "cnic_back_image",
            provider.cnic_back_image.clone().unwrap_or_default(),
        )
        .param(
            "license_image",
            provider.license_image.clone().unwrap_or_default(),
        )
        .param(
            "license_number",
            provider.license_number.clone().unwrap_or_default(),
        )
        .param("is_verified", provider.is_verified)
        .param("documents_uploaded", provider.documents_uploaded)
        .param(
            "verification_status",
            provider.verification_status.clone(),
        )
        .param("rating", provider.rating)
        .param("total_bookings", provider.total_bookings)
        .param("created_at", provider.created_at.to_rfc3339())
        .param("updated_at", provider.updated_at.to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p")?;
            self.node_to_provider(&node)
        } else {
            bail!("provider node was not created: {}", provider.uid)
        }
    }

    /// Get a user (either label) by uid
    pub async fn get_user_by_uid(&self, uid: &str) -> Result<Option<UserRecord>> {
        let q = query(
            r#"
            MATCH (u)
            WHERE (u:Seeker OR u:Provider) AND u.uid = $uid
            RETURN u, labels(u) AS labels
            "#,
        )
        .param("uid", uid);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("u")?;
            let labels: Vec<String> = row.get("labels")?;
            Ok(Some(self.node_to_user(&node, &labels)?))
        } else {
            Ok(None)
        }
    }

    /// Get a user (either label) by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let q = query(
            r#"
            MATCH (u)
            WHERE (u:Seeker OR u:Provider) AND u.email = $email
            RETURN u, labels(u) AS labels
            "#,
        )
        .param("email", email);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("u")?;
            let labels: Vec<String> = row.get("labels")?;
            Ok(Some(self.node_to_user(&node, &labels)?))
        } else {
            Ok(None)
        }
    }

    /// Check whether any user exists with the given email
    pub async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u)
            WHERE (u:Seeker OR u:Provider) AND u.email = $email
            RETURN count(u) > 0 AS present
            "#,
        )
        .param("email", email);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            Ok(row.get("present")?)
        } else {
            Ok(false)
        }
    }

    /// Apply a partial update to a seeker profile
    pub async fn update_seeker_profile(
        &self,
        uid: &str,
        update: &SeekerProfileUpdate,
    ) -> Result<Option<SeekerNode>> {
        let set = seeker_set_clauses(update);

        if set.is_empty() {
            // Nothing to change, return the current profile
            return match self.get_user_by_uid(uid).await? {
                Some(UserRecord::Seeker(s)) => Ok(Some(s)),
                _ => Ok(None),
            };
        }

        let cypher = format!(
            "MATCH (s:Seeker {{uid: $uid}}) SET {}, s.updated_at = $updated_at RETURN s",
            set.join(", ")
        );

        let mut q = query(&cypher)
            .param("uid", uid)
            .param("updated_at", Utc::now().to_rfc3339());

        if let Some(v) = &update.full_name {
            q = q.param("full_name", v.clone());
        }
        if let Some(v) = &update.phone {
            q = q.param("phone", v.clone());
        }
        if let Some(v) = &update.profile_image {
            q = q.param("profile_image", v.clone());
        }
        if let Some(v) = &update.address {
            q = q.param("address", v.clone());
        }
        if let Some(v) = &update.bio {
            q = q.param("bio", v.clone());
        }
        if let Some(v) = &update.gender {
            q = q.param("gender", v.clone());
        }
        if let Some(v) = &update.date_of_birth {
            q = q.param("date_of_birth", v.clone());
        }
        if let Some(v) = &update.service_categories {
            q = q.param("service_categories", v.clone());
        }
        if let Some(v) = &update.primary_purpose {
            q = q.param("primary_purpose", v.clone());
        }
        if let Some(v) = &update.urgency {
            q = q.param("urgency", v.clone());
        }
        if let Some(v) = &update.preferences_notes {
            q = q.param("preferences_notes", v.clone());
        }

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("s")?;
            Ok(Some(self.node_to_seeker(&node)?))
        } else {
            Ok(None)
        }
    }

    /// Apply a partial update to a provider profile
    pub async fn update_provider_profile(
        &self,
        uid: &str,
        update: &ProviderProfileUpdate,
    ) -> Result<Option<ProviderNode>> {
        let set = provider_set_clauses(update);

        if set.is_empty() {
            return match self.get_user_by_uid(uid).await? {
                Some(UserRecord::Provider(p)) => Ok(Some(p)),
                _ => Ok(None),
            };
        }

        let cypher = format!(
            "MATCH (p:Provider {{uid: $uid}}) SET {}, p.updated_at = $updated_at RETURN p",
            set.join(", ")
        );

        let mut q = query(&cypher)
            .param("uid", uid)
            .param("updated_at", Utc::now().to_rfc3339());

        if let Some(v) = &update.full_name {
            q = q.param("full_name", v.clone());
        }
        if let Some(v) = &update.phone {
            q = q.param("phone", v.clone());
        }
        if let Some(v) = &update.business_name {
            q = q.param("business_name", v.clone());
        }
        if let Some(v) = &update.business_type {
            q = q.param("business_type", v.clone());
        }
        if let Some(v) = &update.service_type {
            q = q.param("service_type", v.clone());
        }
        if let Some(v) = &update.cnic_number {
            q = q.param("cnic_number", v.clone());
        }
        if let Some(v) = &update.address {
            q = q.param("address", v.clone());
        }
        if let Some(v) = &update.city {
            q = q.param("city", v.clone());
        }
        if let Some(v) = &update.province {
            q = q.param("province", v.clone());
        }
        if let Some(v) = update.years_experience {
            q = q.param("years_experience", v);
        }
        if let Some(v) = &update.description {
            q = q.param("description", v.clone());
        }
        if let Some(v) = &update.profile_image {
            q = q.param("profile_image", v.clone());
        }
        if let Some(v) = &update.cnic_front_image {
            q = q.param("cnic_front_image", v.clone());
        }
        if let Some(v) = &update.cnic_back_image {
            q = q.param("cnic_back_image", v.clone());
        }
        if let Some(v) = &update.license_image {
            q = q.param("license_image", v.clone());
        }
        if let Some(v) = &update.license_number {
            q = q.param("license_number", v.clone());
        }

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p")?;
            Ok(Some(self.node_to_provider(&node)?))
        } else {
            Ok(None)
        }
    }

    /// Delete a user node. For providers this cascades to their vehicles and
    /// services; similarity edges go with the node via DETACH DELETE.
    pub async fn delete_user(&self, uid: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u)
            WHERE (u:Seeker OR u:Provider) AND u.uid = $uid
            OPTIONAL MATCH (u)-[:OWNS]->(v:Vehicle)
            OPTIONAL MATCH (u)-[:OFFERS]->(svc:Service)
            WITH u, collect(DISTINCT v) AS vehicles, collect(DISTINCT svc) AS services
            FOREACH (s IN services | DETACH DELETE s)
            FOREACH (x IN vehicles | DETACH DELETE x)
            DETACH DELETE u
            RETURN size(vehicles) + size(services) AS cascaded
            "#,
        )
        .param("uid", uid);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let cascaded: i64 = row.get("cascaded")?;
            if cascaded > 0 {
                tracing::debug!(uid, cascaded, "cascade-deleted owned nodes with user");
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// List seekers, newest first
    pub async fn list_seekers(&self, limit: usize, skip: usize) -> Result<Vec<SeekerNode>> {
        let q = query(
            r#"
            MATCH (s:Seeker)
            RETURN s
            ORDER BY s.created_at DESC
            SKIP $skip
            LIMIT $limit
            "#,
        )
        .param("skip", skip as i64)
        .param("limit", limit as i64);

        let mut result = self.graph.execute(q).await?;
        let mut seekers = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("s")?;
            seekers.push(self.node_to_seeker(&node)?);
        }
        Ok(seekers)
    }

    /// List providers, newest first
    pub async fn list_providers(&self, limit: usize, skip: usize) -> Result<Vec<ProviderNode>> {
        let q = query(
            r#"
            MATCH (p:Provider)
            RETURN p
            ORDER BY p.created_at DESC
            SKIP $skip
            LIMIT $limit
            "#,
        )
        .param("skip", skip as i64)
        .param("limit", limit as i64);

        let mut result = self.graph.execute(q).await?;
        let mut providers = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p")?;
            providers.push(self.node_to_provider(&node)?);
        }
        Ok(providers)
    }

    /// Search providers by business type, minimum rating and verification
    pub async fn search_providers(
        &self,
        filters: &ProviderSearchFilters,
        limit: usize,
    ) -> Result<Vec<ProviderNode>> {
        let mut cond = ClauseBuilder::new();
        cond.push_if(true, "COALESCE(p.rating, 0) >= $min_rating")
            .push_if(
                filters.business_type.is_some(),
                "p.business_type = $business_type",
            )
            .push_if(filters.is_verified.is_some(), "p.is_verified = $is_verified");

        let cypher = format!(
            r#"
            MATCH (p:Provider)
            WHERE {}
            RETURN p
            ORDER BY p.rating DESC, p.created_at DESC
            LIMIT $limit
            "#,
            cond.join(" AND ")
        );

        let mut q = query(&cypher)
            .param("min_rating", filters.min_rating)
            .param("limit", limit as i64);

        if let Some(bt) = &filters.business_type {
            q = q.param("business_type", bt.clone());
        }
        if let Some(verified) = filters.is_verified {
            q = q.param("is_verified", verified);
        }

        let mut result = self.graph.execute(q).await?;
        let mut providers = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("p")?;
            providers.push(self.node_to_provider(&node)?);
        }
        Ok(providers)
    }

    /// Record a provider's verification outcome
    pub async fn set_provider_verification(
        &self,
        uid: &str,
        status: &str,
    ) -> Result<Option<ProviderNode>> {
        let q = query(
            r#"
            MATCH (p:Provider {uid: $uid})
            SET p.verification_status = $status,
                p.is_verified = $is_verified,
                p.updated_at = $now
            RETURN p
            "#,
        )
        .param("uid", uid)
        .param("status", status)
        .param("is_verified", status == "approved")
        .param("now", Utc::now().to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => {
                let node: neo4rs::Node = row.get("p")?;
                Ok(Some(self.node_to_provider(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Distinct non-empty business types across all providers
    pub async fn list_business_types(&self) -> Result<Vec<String>> {
        let q = query(
            r#"
            MATCH (p:Provider)
            WHERE p.business_type <> ''
            RETURN DISTINCT p.business_type AS business_type
            ORDER BY business_type ASC
            "#,
        );

        let mut result = self.graph.execute(q).await?;
        let mut types = Vec::new();
        while let Some(row) = result.next().await? {
            types.push(row.get::<String>("business_type")?);
        }
        Ok(types)
    }

    // ========================================================================
    // Similarity operations
    // ========================================================================

    /// Load the preference attributes of a seeker
    pub async fn seeker_preferences(&self, uid: &str) -> Result<Option<SeekerPreferences>> {
        let q = query(
            r#"
            MATCH (s:Seeker {uid: $uid})
            RETURN s.service_categories AS categories,
                   s.primary_purpose AS purpose,
                   s.urgency AS urgency,
                   s.address AS address
            "#,
        )
        .param("uid", uid);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            Ok(Some(SeekerPreferences {
                service_categories: row.get::<Vec<String>>("categories").unwrap_or_default(),
                primary_purpose: row.get::<String>("purpose").ok().filter(|s| !s.is_empty()),
                urgency: row.get::<String>("urgency").ok().filter(|s| !s.is_empty()),
                address: row.get::<String>("address").ok().filter(|s| !s.is_empty()),
            }))
        } else {
            Ok(None)
        }
    }

    /// Delete all outgoing similarity edges of a seeker
    pub async fn clear_similarity_edges(&self, uid: &str) -> Result<usize> {
        let q = query(
            r#"
            MATCH (s:Seeker {uid: $uid})-[r:SIMILAR_INTERESTS|SIMILAR_LOCATION]->()
            DELETE r
            RETURN count(r) AS removed
            "#,
        )
        .param("uid", uid);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let removed: i64 = row.get("removed")?;
            Ok(removed as usize)
        } else {
            Ok(0)
        }
    }

    /// Merge `SIMILAR_INTERESTS` edges from `uid` to every other seeker
    /// matching `value` on `dimension`. The edge is keyed by similarity type
    /// and matching value, so repeated merges for the same match bump the
    /// same edge rather than creating a parallel one.
    pub async fn merge_interest_edges(
        &self,
        uid: &str,
        dimension: SimilarityDimension,
        value: &str,
    ) -> Result<Vec<EdgeMerge>> {
        let candidate_filter = match dimension {
            SimilarityDimension::ServiceCategory => "$value IN s2.service_categories",
            SimilarityDimension::PrimaryPurpose => "s2.primary_purpose = $value",
            SimilarityDimension::Urgency => "s2.urgency = $value",
        };

        let cypher = format!(
            r#"
            MATCH (s1:Seeker {{uid: $uid}})
            MATCH (s2:Seeker)
            WHERE s2.uid <> $uid AND {}
            MERGE (s1)-[r:SIMILAR_INTERESTS {{similarity_type: $similarity_type, matching_value: $value}}]->(s2)
            ON CREATE SET r.created_at = $now
            SET r.strength = COALESCE(r.strength, 0) + $weight
            RETURN s2.uid AS uid, s2.full_name AS name, r.strength AS strength
            ORDER BY s2.uid ASC
            "#,
            candidate_filter
        );

        let q = query(&cypher)
            .param("uid", uid)
            .param("value", value)
            .param("similarity_type", dimension.as_str())
            .param("weight", dimension.weight())
            .param("now", Utc::now().to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        let mut merges = Vec::new();
        while let Some(row) = result.next().await? {
            merges.push(EdgeMerge {
                uid: row.get("uid")?,
                name: row.get("name")?,
                similarity: dimension.as_str().to_string(),
                strength: row.get("strength")?,
            });
        }
        Ok(merges)
    }

    /// Merge `SIMILAR_LOCATION` edges from `uid` to every other seeker whose
    /// address textually contains `address`
    pub async fn merge_location_edges(&self, uid: &str, address: &str) -> Result<Vec<EdgeMerge>> {
        let q = query(
            r#"
            MATCH (s1:Seeker {uid: $uid})
            MATCH (s2:Seeker)
            WHERE s2.uid <> $uid
              AND s2.address IS NOT NULL
              AND s2.address CONTAINS $address
            MERGE (s1)-[r:SIMILAR_LOCATION {location: $address}]->(s2)
            ON CREATE SET r.created_at = $now
            SET r.strength = COALESCE(r.strength, 0) + 1
            RETURN s2.uid AS uid, s2.full_name AS name, r.strength AS strength
            ORDER BY s2.uid ASC
            "#,
        )
        .param("uid", uid)
        .param("address", address)
        .param("now", Utc::now().to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        let mut merges = Vec::new();
        while let Some(row) = result.next().await? {
            merges.push(EdgeMerge {
                uid: row.get("uid")?,
                name: row.get("name")?,
                similarity: "location".to_string(),
                strength: row.get("strength")?,
            });
        }
        Ok(merges)
    }

    /// Top-K seekers ranked by summed outgoing edge strength, descending,
    /// with ascending uid as the deterministic tie-break
    pub async fn similar_seekers(&self, uid: &str, limit: usize) -> Result<Vec<SimilarSeeker>> {
        let q = query(
            r#"
            MATCH (s1:Seeker {uid: $uid})-[r:SIMILAR_INTERESTS|SIMILAR_LOCATION]->(s2:Seeker)
            WITH s2, sum(r.strength) AS total_strength,
                 collect(DISTINCT type(r)) AS relationship_types
            RETURN s2.uid AS uid,
                   s2.full_name AS name,
                   s2.email AS email,
                   s2.service_categories AS categories,
                   s2.primary_purpose AS purpose,
                   s2.address AS address,
                   relationship_types,
                   total_strength
            ORDER BY total_strength DESC, uid ASC
            LIMIT $limit
            "#,
        )
        .param("uid", uid)
        .param("limit", limit as i64);

        let mut result = self.graph.execute(q).await?;
        let mut seekers = Vec::new();
        while let Some(row) = result.next().await? {
            seekers.push(SimilarSeeker {
                uid: row.get("uid")?,
                name: row.get("name")?,
                email: row.get("email")?,
                categories: row.get::<Vec<String>>("categories").unwrap_or_default(),
                purpose: row.get::<String>("purpose").ok().filter(|s| !s.is_empty()),
                address: row.get::<String>("address").ok().filter(|s| !s.is_empty()),
                relationship_types: row.get("relationship_types")?,
                similarity_score: row.get("total_strength")?,
            });
        }
        Ok(seekers)
    }

    // ========================================================================
    // Vehicle operations
    // ========================================================================

    /// Create a vehicle node linked to its owning provider. Fails when the
    /// provider does not exist (the MATCH produces no rows).
    pub async fn create_vehicle(&self, vehicle: &VehicleNode) -> Result<VehicleNode> {
        let q = query(
            r#"
            MATCH (p:Provider {uid: $provider_uid})
            CREATE (v:Vehicle {
                vehicle_id: $vehicle_id,
                provider_uid: $provider_uid,
                name: $name,
                vehicle_type: $vehicle_type,
                make: $make,
                model: $model,
                year: $year,
                registration_number: $registration_number,
                capacity: $capacity,
                condition: $condition,
                vehicle_image: $vehicle_image,
                additional_images: $additional_images,
                has_insurance: $has_insurance,
                insurance_expiry: $insurance_expiry,
                is_available: $is_available,
                city: $city,
                province: $province,
                price_per_hour: $price_per_hour,
                price_per_day: $price_per_day,
                description: $description,
                created_at: $created_at,
                updated_at: $updated_at
            })
            CREATE (p)-[:OWNS]->(v)
            RETURN v
            "#,
        )
        .param("vehicle_id", vehicle.vehicle_id.clone())
        .param("provider_uid", vehicle.provider_uid.clone())
        .param("name", vehicle.name.clone())
        .param("vehicle_type", vehicle.vehicle_type.clone())
        .param("make", vehicle.make.clone())
        .param("model", vehicle.model.clone())
        .param("year", vehicle.year)
        .param(
            "registration_number",
            vehicle.registration_number.clone(),
        )
        .param("capacity", vehicle.capacity.clone().unwrap_or_default())
        .param("condition", vehicle.condition.clone())
        .param(
            "vehicle_image",
            vehicle.vehicle_image.clone().unwrap_or_default(),
        )
        .param(
            "additional_images",
            vehicle.additional_images.clone().unwrap_or_default(),
        )
        .param("has_insurance", vehicle.has_insurance)
        .param(
            "insurance_expiry",
            vehicle.insurance_expiry.clone().unwrap_or_default(),
        )
        .param("is_available", vehicle.is_available)
        .param("city", vehicle.city.clone().unwrap_or_default())
        .param("province", vehicle.province.clone().unwrap_or_default())
        .param("price_per_hour", vehicle.price_per_hour.unwrap_or(-1.0))
        .param("price_per_day", vehicle.price_per_day.unwrap_or(-1.0))
        .param(
            "description",
            vehicle.description.clone().unwrap_or_default(),
        )
        .param("created_at", vehicle.created_at.to_rfc3339())
        .param("updated_at", vehicle.updated_at.to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("v")?;
            self.node_to_vehicle(&node)
        } else {
            bail!("provider not found: {}", vehicle.provider_uid)
        }
    }

    /// Get a vehicle by id
    pub async fn get_vehicle(&self, vehicle_id: &str) -> Result<Option<VehicleNode>> {
        let q = query(
            r#"
            MATCH (v:Vehicle {vehicle_id: $vehicle_id})
            RETURN v
            "#,
        )
        .param("vehicle_id", vehicle_id);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("v")?;
            Ok(Some(self.node_to_vehicle(&node)?))
        } else {
            Ok(None)
        }
    }

    /// All vehicles owned by a provider, newest first
    pub async fn list_provider_vehicles(&self, provider_uid: &str) -> Result<Vec<VehicleNode>> {
        let q = query(
            r#"
            MATCH (p:Provider {uid: $provider_uid})-[:OWNS]->(v:Vehicle)
            RETURN v
            ORDER BY v.created_at DESC
            "#,
        )
        .param("provider_uid", provider_uid);

        let mut result = self.graph.execute(q).await?;
        let mut vehicles = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("v")?;
            vehicles.push(self.node_to_vehicle(&node)?);
        }
        Ok(vehicles)
    }

    /// Apply a partial update to a vehicle
    pub async fn update_vehicle(
        &self,
        vehicle_id: &str,
        update: &VehicleUpdate,
    ) -> Result<Option<VehicleNode>> {
        let mut set = ClauseBuilder::new();
        set.push_if(update.name.is_some(), "v.name = $name")
            .push_if(update.vehicle_type.is_some(), "v.vehicle_type = $vehicle_type")
            .push_if(update.make.is_some(), "v.make = $make")
            .push_if(update.model.is_some(), "v.model = $model")
            .push_if(update.year.is_some(), "v.year = $year")
            .push_if(
                update.registration_number.is_some(),
                "v.registration_number = $registration_number",
            )
            .push_if(update.capacity.is_some(), "v.capacity = $capacity")
            .push_if(update.condition.is_some(), "v.condition = $condition")
            .push_if(
                update.vehicle_image.is_some(),
                "v.vehicle_image = $vehicle_image",
            )
            .push_if(
                update.additional_images.is_some(),
                "v.additional_images = $additional_images",
            )
            .push_if(
                update.has_insurance.is_some(),
                "v.has_insurance = $has_insurance",
            )
            .push_if(
                update.insurance_expiry.is_some(),
                "v.insurance_expiry = $insurance_expiry",
            )
            .push_if(update.is_available.is_some(), "v.is_available = $is_available")
            .push_if(update.city.is_some(), "v.city = $city")
            .push_if(update.province.is_some(), "v.province = $province")
            .push_if(
                update.price_per_hour.is_some(),
                "v.price_per_hour = $price_per_hour",
            )
            .push_if(
                update.price_per_day.is_some(),
                "v.price_per_day = $price_per_day",
            )
            .push_if(update.description.is_some(), "v.description = $description");

        if set.is_empty() {
            return self.get_vehicle(vehicle_id).await;
        }

        let cypher = format!(
            "MATCH (v:Vehicle {{vehicle_id: $vehicle_id}}) SET {}, v.updated_at = $updated_at RETURN v",
            set.join(", ")
        );

        let mut q = query(&cypher)
            .param("vehicle_id", vehicle_id)
            .param("updated_at", Utc::now().to_rfc3339());

        if let Some(v) = &update.name {
            q = q.param("name", v.clone());
        }
        if let Some(v) = &update.vehicle_type {
            q = q.param("vehicle_type", v.clone());
        }
        if let Some(v) = &update.make {
            q = q.param("make", v.clone());
        }
        if let Some(v) = &update.model {
            q = q.param("model", v.clone());
        }
        if let Some(v) = update.year {
            q = q.param("year", v);
        }
        if let Some(v) = &update.registration_number {
            q = q.param("registration_number", v.clone());
        }
        if let Some(v) = &update.capacity {
            q = q.param("capacity", v.clone());
        }
        if let Some(v) = &update.condition {
            q = q.param("condition", v.clone());
        }
        if let Some(v) = &update.vehicle_image {
            q = q.param("vehicle_image", v.clone());
        }
        if let Some(v) = &update.additional_images {
            q = q.param("additional_images", v.clone());
        }
        if let Some(v) = update.has_insurance {
            q = q.param("has_insurance", v);
        }
        if let Some(v) = &update.insurance_expiry {
            q = q.param("insurance_expiry", v.clone());
        }
        if let Some(v) = update.is_available {
            q = q.param("is_available", v);
        }
        if let Some(v) = &update.city {
            q = q.param("city", v.clone());
        }
        if let Some(v) = &update.province {
            q = q.param("province", v.clone());
        }
        if let Some(v) = update.price_per_hour {
            q = q.param("price_per_hour", v);
        }
        if let Some(v) = update.price_per_day {
            q = q.param("price_per_day", v);
        }
        if let Some(v) = &update.description {
            q = q.param("description", v.clone());
        }

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("v")?;
            Ok(Some(self.node_to_vehicle(&node)?))
        } else {
            Ok(None)
        }
    }

    /// Delete a vehicle together with its services, in one statement
    pub async fn delete_vehicle(&self, vehicle_id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (v:Vehicle {vehicle_id: $vehicle_id})
            OPTIONAL MATCH (v)-[:PROVIDES]->(svc:Service)
            WITH v, collect(svc) AS services
            FOREACH (s IN services | DETACH DELETE s)
            DETACH DELETE v
            RETURN size(services) AS services_deleted
            "#,
        )
        .param("vehicle_id", vehicle_id);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let services_deleted: i64 = row.get("services_deleted")?;
            if services_deleted > 0 {
                tracing::debug!(vehicle_id, services_deleted, "cascade-deleted services");
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Flip a vehicle's availability flag
    pub async fn set_vehicle_availability(
        &self,
        vehicle_id: &str,
        is_available: bool,
    ) -> Result<bool> {
        let q = query(
            r#"
            MATCH (v:Vehicle {vehicle_id: $vehicle_id})
            SET v.is_available = $is_available, v.updated_at = $updated_at
            RETURN v.vehicle_id AS vehicle_id
            "#,
        )
        .param("vehicle_id", vehicle_id)
        .param("is_available", is_available)
        .param("updated_at", Utc::now().to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        Ok(result.next().await?.is_some())
    }

    // ========================================================================
    // Service operations
    // ========================================================================

    /// Create a service node linked to its provider (OFFERS) and the vehicle
    /// that performs it (PROVIDES). Fails when either endpoint is missing.
    pub async fn create_service(&self, service: &ServiceNode) -> Result<ServiceNode> {
        let q = query(
            r#"
            MATCH (p:Provider {uid: $provider_uid})
            MATCH (v:Vehicle {vehicle_id: $vehicle_id})
            CREATE (svc:Service {
                service_id: $service_id,
                vehicle_id: $vehicle_id,
                provider_uid: $provider_uid,
                service_name: $service_name,
                service_category: $service_category,
                price_per_hour: $price_per_hour,
                price_per_day: $price_per_day,
                price_per_service: $price_per_service,
                description: $description,
                service_area: $service_area,
                min_booking_duration: $min_booking_duration,
                is_active: $is_active,
                available_days: $available_days,
                available_hours: $available_hours,
                operator_included: $operator_included,
                fuel_included: $fuel_included,
                transportation_included: $transportation_included,
                total_bookings: $total_bookings,
                rating: $rating,
                created_at: $created_at,
                updated_at: $updated_at
            })
            CREATE (p)-[:OFFERS]->(svc)
            CREATE (v)-[:PROVIDES]->(svc)
            RETURN svc
            "#,
        )
        .param("service_id", service.service_id.clone())
        .param("vehicle_id", service.vehicle_id.clone())
        .param("provider_uid", service.provider_uid.clone())
        .param("service_name", service.service_name.clone())
        .param("service_category", service.service_category.clone())
        .param("price_per_hour", service.price_per_hour.unwrap_or(-1.0))
        .param("price_per_day", service.price_per_day.unwrap_or(-1.0))
        .param(
            "price_per_service",
            service.price_per_service.unwrap_or(-1.0),
        )
        .param(
            "description",
            service.description.clone().unwrap_or_default(),
        )
        .param(
            "service_area",
            service.service_area.clone().unwrap_or_default(),
        )
        .param(
            "min_booking_duration",
            service.min_booking_duration.clone().unwrap_or_default(),
        )
        .param("is_active", service.is_active)
        .param(
            "available_days",
            service.available_days.clone().unwrap_or_default(),
        )
        .param(
            "available_hours",
            service.available_hours.clone().unwrap_or_default(),
        )
        .param("operator_included", service.operator_included)
        .param("fuel_included", service.fuel_included)
        .param(
            "transportation_included",
            service.transportation_included,
        )
        .param("total_bookings", service.total_bookings)
        .param("rating", service.rating)
        .param("created_at", service.created_at.to_rfc3339())
        .param("updated_at", service.updated_at.to_rfc3339());

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("svc")?;
            self.node_to_service(&node)
        } else {
            bail!(
                "provider {} or vehicle {} not found",
                service.provider_uid,
                service.vehicle_id
            )
        }
    }

    /// Get a service by id
    pub async fn get_service(&self, service_id: &str) -> Result<Option<ServiceNode>> {
        let q = query(
            r#"
            MATCH (svc:Service {service_id: $service_id})
            RETURN svc
            "#,
        )
        .param("service_id", service_id);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("svc")?;
            Ok(Some(self.node_to_service(&node)?))
        } else {
            Ok(None)
        }
    }

    /// All services performed by a vehicle, newest first
    pub async fn list_vehicle_services(&self, vehicle_id: &str) -> Result<Vec<ServiceNode>> {
        let q = query(
            r#"
            MATCH (v:Vehicle {vehicle_id: $vehicle_id})-[:PROVIDES]->(svc:Service)
            RETURN svc
            ORDER BY svc.created_at DESC
            "#,
        )
        .param("vehicle_id", vehicle_id);

        let mut result = self.graph.execute(q).await?;
        let mut services = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("svc")?;
            services.push(self.node_to_service(&node)?);
        }
        Ok(services)
    }

    /// All services offered by a provider, newest first
    pub async fn list_provider_services(&self, provider_uid: &str) -> Result<Vec<ServiceNode>> {
        let q = query(
            r#"
            MATCH (p:Provider {uid: $provider_uid})-[:OFFERS]->(svc:Service)
            RETURN svc
            ORDER BY svc.created_at DESC
            "#,
        )
        .param("provider_uid", provider_uid);

        let mut result = self.graph.execute(q).await?;
        let mut services = Vec::new();
        while let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("svc")?;
            services.push(self.node_to_service(&node)?);
        }
        Ok(services)
    }

    /// Apply a partial update to a service
    pub async fn update_service(
        &self,
        service_id: &str,
        update: &ServiceUpdate,
    ) -> Result<Option<ServiceNode>> {
        let mut set = ClauseBuilder::new();
        set.push_if(update.service_name.is_some(), "svc.service_name = $service_name")
            .push_if(
                update.service_category.is_some(),
                "svc.service_category = $service_category",
            )
            .push_if(
                update.price_per_hour.is_some(),
                "svc.price_per_hour = $price_per_hour",
            )
            .push_if(
                update.price_per_day.is_some(),
                "svc.price_per_day = $price_per_day",
            )
            .push_if(
                update.price_per_service.is_some(),
                "svc.price_per_service = $price_per_service",
            )
            .push_if(update.description.is_some(), "svc.description = $description")
            .push_if(update.service_area.is_some(), "svc.service_area = $service_area")
            .push_if(
                update.min_booking_duration.is_some(),
                "svc.min_booking_duration = $min_booking_duration",
            )
            .push_if(update.is_active.is_some(), "svc.is_active = $is_active")
            .push_if(
                update.available_days.is_some(),
                "svc.available_days = $available_days",
            )
            .push_if(
                update.available_hours.is_some(),
                "svc.available_hours = $available_hours",
            )
            .push_if(
                update.operator_included.is_some(),
                "svc.operator_included = $operator_included",
            )
            .push_if(
                update.fuel_included.is_some(),
                "svc.fuel_included = $fuel_included",
            )
            .push_if(
                update.transportation_included.is_some(),
                "svc.transportation_included = $transportation_included",
            );

        if set.is_empty() {
            return self.get_service(service_id).await;
        }

        let cypher = format!(
            "MATCH (svc:Service {{service_id: $service_id}}) SET {}, svc.updated_at = $updated_at RETURN svc",
            set.join(", ")
        );

        let mut q = query(&cypher)
            .param("service_id", service_id)
            .param("updated_at", Utc::now().to_rfc3339());

        if let Some(v) = &update.service_name {
            q = q.param("service_name", v.clone());
        }
        if let Some(v) = &update.service_category {
            q = q.param("service_category", v.clone());
        }
        if let Some(v) = update.price_per_hour {
            q = q.param("price_per_hour", v);
        }
        if let Some(v) = update.price_per_day {
            q = q.param("price_per_day", v);
        }
        if let Some(v) = update.price_per_service {
            q = q.param("price_per_service", v);
        }
        if let Some(v) = &update.description {
            q = q.param("description", v.clone());
        }
        if let Some(v) = &update.service_area {
            q = q.param("service_area", v.clone());
        }
        if let Some(v) = &update.min_booking_duration {
            q = q.param("min_booking_duration", v.clone());
        }
        if let Some(v) = update.is_active {
            q = q.param("is_active", v);
        }
        if let Some(v) = &update.available_days {
            q = q.param("available_days", v.clone());
        }
        if let Some(v) = &update.available_hours {
            q = q.param("available_hours", v.clone());
        }
        if let Some(v) = update.operator_included {
            q = q.param("operator_included", v);
        }
        if let Some(v) = update.fuel_included {
            q = q.param("fuel_included", v);
        }
        if let Some(v) = update.transportation_included {
            q = q.param("transportation_included", v);
        }

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("svc")?;
            Ok(Some(self.node_to_service(&node)?))
        } else {
            Ok(None)
        }
    }

    /// Delete a service and its incoming edges
    pub async fn delete_service(&self, service_id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (svc:Service {service_id: $service_id})
            DETACH DELETE svc
            RETURN count(svc) AS deleted
            "#,
        )
        .param("service_id", service_id);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let deleted: i64 = row.get("deleted")?;
            Ok(deleted > 0)
        } else {
            Ok(false)
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Cheap connectivity probe
    pub async fn health_check(&self) -> Result<bool> {
        let mut result = self.graph.execute(query("RETURN 1 AS ok")).await?;
        Ok(result.next().await?.is_some())
    }

    // ========================================================================
    // Node parsers
    // ========================================================================

    fn node_to_user(&self, node: &neo4rs::Node, labels: &[String]) -> Result<UserRecord> {
        if labels.iter().any(|l| l == "Provider") {
            Ok(UserRecord::Provider(self.node_to_provider(node)?))
        } else {
            Ok(UserRecord::Seeker(self.node_to_seeker(node)?))
        }
    }

    fn node_to_seeker(&self, node: &neo4rs::Node) -> Result<SeekerNode> {
        Ok(SeekerNode {
            uid: node.get("uid")?,
            email: node.get("email")?,
            full_name: node.get("full_name")?,
            phone: node.get("phone")?,
            user_type: UserType::Seeker,
            profile_image: opt_string(node, "profile_image"),
            address: opt_string(node, "address"),
            bio: opt_string(node, "bio"),
            gender: opt_string(node, "gender"),
            date_of_birth: opt_string(node, "date_of_birth"),
            service_categories: node
                .get::<Vec<String>>("service_categories")
                .unwrap_or_default(),
            primary_purpose: opt_string(node, "primary_purpose"),
            urgency: opt_string(node, "urgency"),
            preferences_notes: opt_string(node, "preferences_notes"),
            created_at: node
                .get::<String>("created_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: node
                .get::<String>("updated_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn node_to_provider(&self, node: &neo4rs::Node) -> Result<ProviderNode> {
        Ok(ProviderNode {
            uid: node.get("uid")?,
            email: node.get("email")?,
            full_name: node.get("full_name")?,
            phone: node.get("phone")?,
            user_type: UserType::Provider,
            business_name: opt_string(node, "business_name"),
            business_type: opt_string(node, "business_type"),
            service_type: opt_string(node, "service_type"),
            cnic_number: opt_string(node, "cnic_number"),
            address: opt_string(node, "address"),
            city: opt_string(node, "city"),
            province: opt_string(node, "province"),
            years_experience: node
                .get::<i64>("years_experience")
                .ok()
                .filter(|y| *y >= 0),
            description: opt_string(node, "description"),
            profile_image: opt_string(node, "profile_image"),
            cnic_front_image: opt_string(node, "cnic_front_image"),
            cnic_back_image: opt_string(node, "cnic_back_image"),
            license_image: opt_string(node, "license_image"),
            license_number: opt_string(node, "license_number"),
            is_verified: node.get("is_verified").unwrap_or(false),
            documents_uploaded: node.get("documents_uploaded").unwrap_or(false),
            verification_status: node
                .get("verification_status")
                .unwrap_or_else(|_| "pending".to_string()),
            rating: node.get("rating").unwrap_or(0.0),
            total_bookings: node.get("total_bookings").unwrap_or(0),
            created_at: node
                .get::<String>("created_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: node
                .get::<String>("updated_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn node_to_vehicle(&self, node: &neo4rs::Node) -> Result<VehicleNode> {
        Ok(VehicleNode {
            vehicle_id: node.get("vehicle_id")?,
            provider_uid: node.get("provider_uid")?,
            name: node.get("name")?,
            vehicle_type: node.get("vehicle_type")?,
            make: node.get("make")?,
            model: node.get("model")?,
            year: node.get("year")?,
            registration_number: node.get("registration_number")?,
            capacity: opt_string(node, "capacity"),
            condition: node.get("condition")?,
            vehicle_image: opt_string(node, "vehicle_image"),
            additional_images: opt_string(node, "additional_images"),
            has_insurance: node.get("has_insurance").unwrap_or(false),
            insurance_expiry: opt_string(node, "insurance_expiry"),
            is_available: node.get("is_available").unwrap_or(true),
            city: opt_string(node, "city"),
            province: opt_string(node, "province"),
            price_per_hour: node.get::<f64>("price_per_hour").ok().filter(|p| *p >= 0.0),
            price_per_day: node.get::<f64>("price_per_day").ok().filter(|p| *p >= 0.0),
            description: opt_string(node, "description"),
            created_at: node
                .get::<String>("created_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: node
                .get::<String>("updated_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    fn node_to_service(&self, node: &neo4rs::Node) -> Result<ServiceNode> {
        Ok(ServiceNode {
            service_id: node.get("service_id")?,
            vehicle_id: node.get("vehicle_id")?,
            provider_uid: node.get("provider_uid")?,
            service_name: node.get("service_name")?,
            service_category: node.get("service_category")?,
            price_per_hour: node.get::<f64>("price_per_hour").ok().filter(|p| *p >= 0.0),
            price_per_day: node.get::<f64>("price_per_day").ok().filter(|p| *p >= 0.0),
            price_per_service: node
                .get::<f64>("price_per_service")
                .ok()
                .filter(|p| *p >= 0.0),
            description: opt_string(node, "description"),
            service_area: opt_string(node, "service_area"),
            min_booking_duration: opt_string(node, "min_booking_duration"),
            is_active: node.get("is_active").unwrap_or(true),
            available_days: opt_string(node, "available_days"),
            available_hours: opt_string(node, "available_hours"),
            operator_included: node.get("operator_included").unwrap_or(false),
            fuel_included: node.get("fuel_included").unwrap_or(false),
            transportation_included: node.get("transportation_included").unwrap_or(false),
            total_bookings: node.get("total_bookings").unwrap_or(0),
            rating: node.get("rating").unwrap_or(0.0),
            created_at: node
                .get::<String>("created_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
            updated_at: node
                .get::<String>("updated_at")?
                .parse()
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
