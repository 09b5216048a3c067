//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Base URL for the server (used in generated URLs).
    pub base_url: String,

    /// Path prefix the identity provider endpoints are mounted under.
    pub idp_prefix: String,

    /// Path to the service provider registry file.
    pub sp_registry_path: String,

    /// Header carrying the authenticated remote user.
    pub remote_user_header: String,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("IDP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("IDP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let base_url = std::env::var("IDP_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let idp_prefix =
            std::env::var("IDP_PREFIX").unwrap_or_else(|_| "/saml/idp".to_string());

        let sp_registry_path = std::env::var("IDP_SP_REGISTRY").map_err(|_| {
            anyhow::anyhow!("IDP_SP_REGISTRY environment variable is required")
        })?;

        let remote_user_header = std::env::var("IDP_REMOTE_USER_HEADER")
            .unwrap_or_else(|_| "x-remote-user".to_string());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            base_url,
            idp_prefix,
            sp_registry_path,
            remote_user_header,
            log_level,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            idp_prefix: "/saml/idp".to_string(),
            sp_registry_path: "sp-registry.json".to_string(),
            remote_user_header: "x-remote-user".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mount_under_saml_prefix() {
        let config = ServerConfig::default();
        assert_eq!(config.idp_prefix, "/saml/idp");
        assert_eq!(config.remote_user_header, "x-remote-user");
    }
}
