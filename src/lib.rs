//! Haulistry backend
//!
//! A marketplace backend for heavy-machinery and transport rentals:
//! - Neo4j graph for seekers, providers, vehicles and services
//! - Firebase Authentication as the identity boundary
//! - A seeker similarity graph with weighted edges and ranked retrieval

pub mod api;
pub mod auth;
pub mod neo4j;
pub mod similarity;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub firebase: FirebaseYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "haulistry123".into(),
        }
    }
}

/// Firebase configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirebaseYamlConfig {
    pub api_key: String,
    pub base_url: String,
    pub service_account_email: Option<String>,
    pub service_account_key: Option<String>,
}

impl Default for FirebaseYamlConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://identitytoolkit.googleapis.com".into(),
            service_account_email: None,
            service_account_key: None,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Firebase runtime configuration
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    /// Identity Toolkit base URL; point at an emulator in development
    pub base_url: String,
    pub service_account_email: Option<String>,
    /// PEM-encoded RSA private key for minting custom tokens
    pub service_account_key: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub firebase: FirebaseConfig,
    pub server_port: u16,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            firebase: FirebaseConfig {
                api_key: std::env::var("FIREBASE_API_KEY").unwrap_or(yaml.firebase.api_key),
                base_url: std::env::var("FIREBASE_AUTH_URL").unwrap_or(yaml.firebase.base_url),
                service_account_email: std::env::var("FIREBASE_SERVICE_ACCOUNT_EMAIL")
                    .ok()
                    .or(yaml.firebase.service_account_email),
                service_account_key: std::env::var("FIREBASE_SERVICE_ACCOUNT_KEY")
                    .ok()
                    .or(yaml.firebase.service_account_key),
            },
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

// ============================================================================
// Server bootstrap
// ============================================================================

/// Connect to the backing services and serve the API until shutdown.
pub async fn start_server(config: Config) -> Result<()> {
    let store = Arc::new(
        neo4j::Neo4jClient::new(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password)
            .await?,
    );
    tracing::info!("Connected to Neo4j at {}", config.neo4j_uri);

    let identity = Arc::new(auth::FirebaseAuthClient::new(&config.firebase));

    let state = Arc::new(api::ServerState::new(store, identity));
    let router = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("server terminated unexpectedly")
}

// ============================================================================
// Tests
// ============================================================================
