use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Environment variable holding the Cartesia API key
pub const CARTESIA_API_KEY_VAR: &str = "CARTESIA_API_KEY";

/// Environment variable holding the Deepgram API key
pub const DEEPGRAM_API_KEY_VAR: &str = "DEEPGRAM_API_KEY";

/// Which STT provider this deployment proxies uploads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Cartesia,
    Deepgram,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Cartesia
    }
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cartesia => "cartesia",
            Self::Deepgram => "deepgram",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cartesia" => Ok(Self::Cartesia),
            "deepgram" => Ok(Self::Deepgram),
            _ => Err(format!(
                "Unknown provider: {} (expected \"cartesia\" or \"deepgram\")",
                s
            )),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderKind,
    pub host: String,
    pub port: u16,

    // API keys come from the environment only and never leave the process
    #[serde(skip)]
    pub cartesia_api_key: Option<String>,
    #[serde(skip)]
    pub deepgram_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            cartesia_api_key: None,
            deepgram_api_key: None,
        }
    }
}

impl Config {
    /// Build the configuration from CLI values plus the environment.
    pub fn from_env(provider: ProviderKind, host: String, port: u16) -> Self {
        Self {
            provider,
            host,
            port,
            cartesia_api_key: read_env_key(CARTESIA_API_KEY_VAR),
            deepgram_api_key: read_env_key(DEEPGRAM_API_KEY_VAR),
        }
    }

    /// The API key matching the configured provider, when present.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::Cartesia => self.cartesia_api_key.as_deref(),
            ProviderKind::Deepgram => self.deepgram_api_key.as_deref(),
        }
    }

    /// Name of the environment variable the configured provider reads.
    pub fn api_key_var(&self) -> &'static str {
        match self.provider {
            ProviderKind::Cartesia => CARTESIA_API_KEY_VAR,
            ProviderKind::Deepgram => DEEPGRAM_API_KEY_VAR,
        }
    }

    /// Parse the bind address. The host must be an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }
}

fn read_env_key(var: &str) -> Option<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider, ProviderKind::Cartesia);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(
            "cartesia".parse::<ProviderKind>().unwrap(),
            ProviderKind::Cartesia
        );
        assert_eq!(
            "DEEPGRAM".parse::<ProviderKind>().unwrap(),
            ProviderKind::Deepgram
        );
        assert!("whisper".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_display() {
        assert_eq!(ProviderKind::Cartesia.to_string(), "cartesia");
        assert_eq!(ProviderKind::Deepgram.to_string(), "deepgram");
    }

    #[test]
    fn test_api_key_follows_provider() {
        let config = Config {
            provider: ProviderKind::Deepgram,
            cartesia_api_key: Some("cartesia-key".to_string()),
            deepgram_api_key: Some("deepgram-key".to_string()),
            ..Config::default()
        };

        assert_eq!(config.api_key(), Some("deepgram-key"));
        assert_eq!(config.api_key_var(), DEEPGRAM_API_KEY_VAR);
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 8080);

        let bad = Config {
            host: "localhost".to_string(),
            ..Config::default()
        };
        assert!(bad.bind_addr().is_err());
    }

    #[test]
    fn test_keys_are_not_serialized() {
        let config = Config {
            cartesia_api_key: Some("secret".to_string()),
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
