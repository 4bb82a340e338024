//! API integration tests
//!
//! These tests require the full stack (server, Neo4j, identity emulator)
//! to be running. Run with: cargo test --test api_tests

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const BASE_URL: &str = "http://localhost:8080";

/// Helper to delete a user (for cleanup)
async fn delete_user(client: &Client, uid: &str) {
    let _ = client
        .delete(format!("{}/api/users/{}", BASE_URL, uid))
        .send()
        .await;
}

/// Check if API is available
async fn api_available() -> bool {
    let client = Client::new();
    client
        .get(format!("{}/health", BASE_URL))
        .timeout(Duration::from_secs(2))
        .send()
        .await
        .map(|r| r.status().is_success())
        .unwrap_or(false)
}

fn unique_email(prefix: &str) -> String {
    format!(
        "{}-{}@example.com",
        prefix,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

async fn register_seeker(client: &Client, email: &str) -> Value {
    let resp = client
        .post(format!("{}/api/auth/register/seeker", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123",
            "full_name": "Test Seeker",
            "phone": "+923001234567"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    if !api_available().await {
        eprintln!("Skipping test: API not available at {}", BASE_URL);
        return;
    }

    let client = Client::new();
    let resp = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_success());

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_register_and_get_seeker() {
    if !api_available().await {
        eprintln!("Skipping test: API not available");
        return;
    }

    let client = Client::new();
    let email = unique_email("seeker");
    let body = register_seeker(&client, &email).await;

    assert_eq!(body["success"], true);
    let uid = body["data"]["user"]["uid"].as_str().unwrap().to_string();
    assert!(body["data"]["token"].is_string());

    let resp = client
        .get(format!("{}/api/users/{}", BASE_URL, uid))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["data"]["email"], email.as_str());
    assert_eq!(fetched["data"]["user_type"], "seeker");

    delete_user(&client, &uid).await;
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    if !api_available().await {
        eprintln!("Skipping test: API not available");
        return;
    }

    let client = Client::new();
    let email = unique_email("dup");
    let body = register_seeker(&client, &email).await;
    let uid = body["data"]["user"]["uid"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{}/api/auth/register/seeker", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "secret123",
            "full_name": "Test Seeker",
            "phone": "+923001234567"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    delete_user(&client, &uid).await;
}

#[tokio::test]
async fn test_invalid_registration_payload_rejected() {
    if !api_available().await {
        eprintln!("Skipping test: API not available");
        return;
    }

    let client = Client::new();
    let resp = client
        .post(format!("{}/api/auth/register/seeker", BASE_URL))
        .json(&json!({
            "email": "not-an-email",
            "password": "secret123",
            "full_name": "Test Seeker",
            "phone": "+923001234567"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_similarity_flow() {
    if !api_available().await {
        eprintln!("Skipping test: API not available");
        return;
    }

    let client = Client::new();
    let a = register_seeker(&client, &unique_email("sim-a")).await;
    let b = register_seeker(&client, &unique_email("sim-b")).await;
    let uid_a = a["data"]["user"]["uid"].as_str().unwrap().to_string();
    let uid_b = b["data"]["user"]["uid"].as_str().unwrap().to_string();

    // Give both the same preferences; the patch recomputes edges inline
    for uid in [&uid_a, &uid_b] {
        let resp = client
            .patch(format!("{}/api/seekers/{}/profile", BASE_URL, uid))
            .json(&json!({
                "service_categories": ["crane"],
                "primary_purpose": "construction"
            }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }

    let resp = client
        .get(format!("{}/api/seekers/{}/similar?limit=5", BASE_URL, uid_a))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    let similar = body["data"].as_array().unwrap();
    let entry = similar
        .iter()
        .find(|s| s["uid"] == uid_b.as_str())
        .expect("seeker b should appear in seeker a's similar list");
    // shared category (1) + shared purpose (2)
    assert_eq!(entry["similarity_score"], 3);
    assert!(entry.get("phone").is_none());

    // Explicit recompute is idempotent
    let resp = client
        .post(format!(
            "{}/api/seekers/{}/similarity/recompute",
            BASE_URL, uid_a
        ))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let resp = client
        .get(format!("{}/api/seekers/{}/similar?limit=5", BASE_URL, uid_a))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let entry = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["uid"] == uid_b.as_str())
        .unwrap()
        .clone();
    assert_eq!(entry["similarity_score"], 3);

    delete_user(&client, &uid_a).await;
    delete_user(&client, &uid_b).await;
}

#[tokio::test]
async fn test_vehicle_and_service_lifecycle() {
    if !api_available().await {
        eprintln!("Skipping test: API not available");
        return;
    }

    let client = Client::new();
    let resp = client
        .post(format!("{}/api/auth/register/provider", BASE_URL))
        .json(&json!({
            "email": unique_email("provider"),
            "password": "secret123",
            "full_name": "Test Provider",
            "phone": "+923009876543",
            "business_name": "Khan Rentals"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let provider_uid = body["data"]["user"]["uid"].as_str().unwrap().to_string();

    // Create a vehicle
    let resp = client
        .post(format!("{}/api/vehicles", BASE_URL))
        .json(&json!({
            "provider_uid": provider_uid,
            "name": "Big Crane",
            "vehicle_type": "Crane",
            "make": "Liebherr",
            "model": "LTM 1030",
            "year": 2019,
            "registration_number": "LHR-1234",
            "condition": "good",
            "price_per_day": 45000.0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let vehicle_id = body["data"]["vehicle_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["is_available"], true);

    // Attach a service
    let resp = client
        .post(format!("{}/api/services", BASE_URL))
        .json(&json!({
            "provider_uid": provider_uid,
            "vehicle_id": vehicle_id,
            "service_name": "Crane lifting",
            "service_category": "Heavy Machinery",
            "price_per_hour": 8000.0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let service_id = body["data"]["service_id"].as_str().unwrap().to_string();

    // Vehicle's service list includes it
    let resp = client
        .get(format!(
            "{}/api/vehicles/{}/services",
            BASE_URL, vehicle_id
        ))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["service_id"] == service_id.as_str()));

    // Deleting the vehicle cascades to the service
    let resp = client
        .delete(format!("{}/api/vehicles/{}", BASE_URL, vehicle_id))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let resp = client
        .get(format!("{}/api/services/{}", BASE_URL, service_id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    delete_user(&client, &provider_uid).await;
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    if !api_available().await {
        eprintln!("Skipping test: API not available");
        return;
    }

    let client = Client::new();
    let resp = client
        .get(format!("{}/api/users/no-such-uid", BASE_URL))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}
