//! Neo4j graph models for users, vehicles and services

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// User types
// ============================================================================

/// Discriminates the two user roles on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Seeker,
    Provider,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Seeker => "seeker",
            UserType::Provider => "provider",
        }
    }
}

/// A user record loaded from the graph, either label
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserRecord {
    Seeker(SeekerNode),
    Provider(ProviderNode),
}

impl UserRecord {
    pub fn uid(&self) -> &str {
        match self {
            UserRecord::Seeker(s) => &s.uid,
            UserRecord::Provider(p) => &p.uid,
        }
    }

    pub fn user_type(&self) -> UserType {
        match self {
            UserRecord::Seeker(_) => UserType::Seeker,
            UserRecord::Provider(_) => UserType::Provider,
        }
    }
}

// ============================================================================
// Seeker
// ============================================================================

/// A service seeker (`:Seeker` node).
///
/// The preference fields (`service_categories`, `primary_purpose`, `urgency`,
/// `address`) feed the similarity engine. Categories are a typed list stored
/// as a native Neo4j list property so membership queries stay exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekerNode {
    pub uid: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub user_type: UserType,
    pub profile_image: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub service_categories: Vec<String>,
    pub primary_purpose: Option<String>,
    pub urgency: Option<String>,
    pub preferences_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeekerNode {
    /// Build a fresh seeker with only the registration fields set.
    pub fn new(uid: String, email: String, full_name: String, phone: String) -> Self {
        let now = Utc::now();
        Self {
            uid,
            email,
            full_name,
            phone,
            user_type: UserType::Seeker,
            profile_image: None,
            address: None,
            bio: None,
            gender: None,
            date_of_birth: None,
            service_categories: Vec::new(),
            primary_purpose: None,
            urgency: None,
            preferences_notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update payload for a seeker profile. `None` fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeekerProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub profile_image: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub service_categories: Option<Vec<String>>,
    pub primary_purpose: Option<String>,
    pub urgency: Option<String>,
    pub preferences_notes: Option<String>,
}

impl SeekerProfileUpdate {
    /// True when no field is set at all.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.profile_image.is_none()
            && self.address.is_none()
            && self.bio.is_none()
            && self.gender.is_none()
            && self.date_of_birth.is_none()
            && self.service_categories.is_none()
            && self.primary_purpose.is_none()
            && self.urgency.is_none()
            && self.preferences_notes.is_none()
    }

    /// True when the update touches a field the similarity engine matches on,
    /// meaning the seeker's similarity edges should be recomputed.
    pub fn touches_preferences(&self) -> bool {
        self.service_categories.is_some()
            || self.primary_purpose.is_some()
            || self.urgency.is_some()
            || self.address.is_some()
    }
}

// ============================================================================
// Provider
// ============================================================================

/// A service provider (`:Provider` node)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderNode {
    pub uid: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub user_type: UserType,
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub service_type: Option<String>,
    pub cnic_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub years_experience: Option<i64>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub cnic_front_image: Option<String>,
    pub cnic_back_image: Option<String>,
    pub license_image: Option<String>,
    pub license_number: Option<String>,
    pub is_verified: bool,
    pub documents_uploaded: bool,
    /// "pending", "approved" or "rejected"
    pub verification_status: String,
    pub rating: f64,
    pub total_bookings: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderNode {
    /// Build a fresh provider from registration fields. Business fields are
    /// optional at registration and can be filled in later via profile update.
    pub fn new(uid: String, email: String, full_name: String, phone: String) -> Self {
        let now = Utc::now();
        Self {
            uid,
            email,
            full_name,
            phone,
            user_type: UserType::Provider,
            business_name: None,
            business_type: None,
            service_type: None,
            cnic_number: None,
            address: None,
            city: None,
            province: None,
            years_experience: None,
            description: None,
            profile_image: None,
            cnic_front_image: None,
            cnic_back_image: None,
            license_image: None,
            license_number: None,
            is_verified: false,
            documents_uploaded: false,
            verification_status: "pending".to_string(),
            rating: 0.0,
            total_bookings: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update payload for a provider profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub business_type: Option<String>,
    pub service_type: Option<String>,
    pub cnic_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub years_experience: Option<i64>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub cnic_front_image: Option<String>,
    pub cnic_back_image: Option<String>,
    pub license_image: Option<String>,
    pub license_number: Option<String>,
}

impl ProviderProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.business_name.is_none()
            && self.business_type.is_none()
            && self.service_type.is_none()
            && self.cnic_number.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.province.is_none()
            && self.years_experience.is_none()
            && self.description.is_none()
            && self.profile_image.is_none()
            && self.cnic_front_image.is_none()
            && self.cnic_back_image.is_none()
            && self.license_image.is_none()
            && self.license_number.is_none()
    }
}

/// Filters for provider search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSearchFilters {
    pub business_type: Option<String>,
    #[serde(default)]
    pub min_rating: f64,
    pub is_verified: Option<bool>,
}

// ============================================================================
// Vehicle
// ============================================================================

/// A vehicle/equipment unit (`:Vehicle`), owned by a provider via `OWNS`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleNode {
    pub vehicle_id: String,
    pub provider_uid: String,
    pub name: String,
    /// Harvester, Tractor, Crane, ...
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub registration_number: String,
    /// e.g. "500 HP", "10 tons"
    pub capacity: Option<String>,
    pub condition: String,
    pub vehicle_image: Option<String>,
    pub additional_images: Option<String>,
    pub has_insurance: bool,
    pub insurance_expiry: Option<String>,
    pub is_available: bool,
    pub city: Option<String>,
    pub province: Option<String>,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update payload for a vehicle
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleUpdate {
    pub name: Option<String>,
    pub vehicle_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub registration_number: Option<String>,
    pub capacity: Option<String>,
    pub condition: Option<String>,
    pub vehicle_image: Option<String>,
    pub additional_images: Option<String>,
    pub has_insurance: Option<bool>,
    pub insurance_expiry: Option<String>,
    pub is_available: Option<bool>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub description: Option<String>,
}

// ============================================================================
// Service
// ============================================================================

/// A bookable service (`:Service`), linked from its provider (`OFFERS`) and
/// the vehicle that performs it (`PROVIDES`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceNode {
    pub service_id: String,
    pub vehicle_id: String,
    pub provider_uid: String,
    pub service_name: String,
    /// Heavy Machinery, Transport, Construction, ...
    pub service_category: String,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub price_per_service: Option<f64>,
    pub description: Option<String>,
    /// Cities/regions served
    pub service_area: Option<String>,
    /// e.g. "4 hours", "1 day"
    pub min_booking_duration: Option<String>,
    pub is_active: bool,
    pub available_days: Option<String>,
    pub available_hours: Option<String>,
    pub operator_included: bool,
    pub fuel_included: bool,
    pub transportation_included: bool,
    pub total_bookings: i64,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update payload for a service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceUpdate {
    pub service_name: Option<String>,
    pub service_category: Option<String>,
    pub price_per_hour: Option<f64>,
    pub price_per_day: Option<f64>,
    pub price_per_service: Option<f64>,
    pub description: Option<String>,
    pub service_area: Option<String>,
    pub min_booking_duration: Option<String>,
    pub is_active: Option<bool>,
    pub available_days: Option<String>,
    pub available_hours: Option<String>,
    pub operator_included: Option<bool>,
    pub fuel_included: Option<bool>,
    pub transportation_included: Option<bool>,
}
