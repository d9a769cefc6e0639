use crate::AggregatorClient;
use oneinch_constants::DEFAULT_API_URL;
use oneinch_onchain::Wallet;
use oneinch_types::SigningError;
use std::{env, fmt};
use url::Url;
use zeroize::Zeroizing;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "DEV_PORTAL_TOKEN";
/// Environment variable holding the JSON-RPC endpoint.
pub const NODE_URL_ENV: &str = "NODE_URL";
/// Environment variable holding the wallet key.
pub const WALLET_KEY_ENV: &str = "WALLET_KEY";

/// Errors building a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An environment variable is missing or not unicode.
    #[error("environment variable {name}: {source}")]
    Var {
        /// The variable.
        name: &'static str,
        /// Why it could not be read.
        #[source]
        source: env::VarError,
    },
    /// A URL could not be parsed.
    #[error(transparent)]
    Url(#[from] url::ParseError),
    /// An optional setting needed by the caller is absent.
    #[error("{0} is not configured")]
    Missing(&'static str),
    /// The wallet key is invalid.
    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl ConfigError {
    /// A short, stable identifier for the error kind.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Var { .. } => "config_var",
            Self::Url(_) => "invalid_url",
            Self::Missing(_) => "config_missing",
            Self::Signing(e) => e.code(),
        }
    }
}

fn load_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|source| ConfigError::Var { name, source })
}

/// Read the API key from `DEV_PORTAL_TOKEN`.
pub fn load_api_key() -> Result<String, ConfigError> {
    load_var(API_KEY_ENV)
}

/// Read the JSON-RPC endpoint from `NODE_URL`.
pub fn load_node_url() -> Result<Url, ConfigError> {
    Ok(Url::parse(&load_var(NODE_URL_ENV)?)?)
}

/// Read the wallet key from `WALLET_KEY`.
pub fn load_private_key() -> Result<Zeroizing<String>, ConfigError> {
    load_var(WALLET_KEY_ENV).map(Zeroizing::new)
}

/// Settings for an [`AggregatorClient`] and, optionally, the wallet that
/// signs for it.
#[derive(Clone)]
pub struct ClientConfig {
    api_url: Url,
    api_key: Zeroizing<String>,
    chain_id: u64,
    node_url: Option<Url>,
    private_key: Option<Zeroizing<String>>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("node_url", &self.node_url.as_ref().map(Url::as_str))
            .field("has_private_key", &self.private_key.is_some())
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Create a config for the given API.
    pub fn new(api_url: Url, api_key: impl Into<String>, chain_id: u64) -> Self {
        Self {
            api_url,
            api_key: Zeroizing::new(api_key.into()),
            chain_id,
            node_url: None,
            private_key: None,
        }
    }

    /// Create a config for the public API endpoint.
    pub fn with_default_api(
        api_key: impl Into<String>,
        chain_id: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(Url::parse(DEFAULT_API_URL)?, api_key, chain_id))
    }

    /// Load the API key, node URL and wallet key from the environment.
    ///
    /// Reads `DEV_PORTAL_TOKEN` (required), `NODE_URL` and `WALLET_KEY`
    /// (both optional).
    pub fn from_env(chain_id: u64) -> Result<Self, ConfigError> {
        let mut config = Self::with_default_api(load_api_key()?, chain_id)?;
        match load_node_url() {
            Ok(url) => config.node_url = Some(url),
            Err(ConfigError::Var { source: env::VarError::NotPresent, .. }) => {}
            Err(e) => return Err(e),
        }
        match load_private_key() {
            Ok(key) => config.private_key = Some(key),
            Err(ConfigError::Var { source: env::VarError::NotPresent, .. }) => {}
            Err(e) => return Err(e),
        }
        Ok(config)
    }

    /// Set the API URL.
    pub fn with_api_url(self, api_url: Url) -> Self {
        Self { api_url, ..self }
    }

    /// Set the JSON-RPC endpoint.
    pub fn with_node_url(self, node_url: Url) -> Self {
        Self { node_url: Some(node_url), ..self }
    }

    /// Set the wallet key, 64 hex characters without a `0x` prefix.
    pub fn with_private_key(self, private_key: impl Into<String>) -> Self {
        Self { private_key: Some(Zeroizing::new(private_key.into())), ..self }
    }

    /// Get the API URL.
    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the chain ID.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the JSON-RPC endpoint.
    pub const fn node_url(&self) -> Option<&Url> {
        self.node_url.as_ref()
    }

    /// The JSON-RPC endpoint, or an error if none is configured.
    pub fn require_node_url(&self) -> Result<&Url, ConfigError> {
        self.node_url().ok_or(ConfigError::Missing("node url"))
    }

    /// Build the wallet from the configured key.
    pub fn wallet(&self) -> Result<Wallet, ConfigError> {
        let key = self.private_key.as_ref().ok_or(ConfigError::Missing("private key"))?;
        Ok(Wallet::from_hex(key, self.chain_id)?)
    }

    /// Build a client for the configured API.
    pub fn client(&self) -> AggregatorClient {
        AggregatorClient::new(self.api_url.clone(), self.api_key(), self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "ad21c0552a3b52e94520da713455cc347e4e89628a334be24d85b8083848434f";

    #[test]
    fn debug_redacts_secrets() {
        let config = ClientConfig::with_default_api("secret-token", 137)
            .unwrap()
            .with_private_key(KEY);
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(!debug.contains(KEY));
        assert!(debug.contains("has_private_key: true"));
        assert_eq!(config.api_url().as_str(), "https://api.1inch.dev/");
    }

    #[test]
    fn wallet_requires_key() {
        let config = ClientConfig::with_default_api("token", 1).unwrap();
        assert_eq!(config.wallet().unwrap_err().code(), "config_missing");
        assert_eq!(config.require_node_url().unwrap_err().code(), "config_missing");

        let wallet = config.with_private_key(KEY).wallet().unwrap();
        assert_eq!(wallet.chain_id(), 1);

        let bad = ClientConfig::with_default_api("token", 1).unwrap().with_private_key("0x12");
        assert_eq!(bad.wallet().unwrap_err().code(), "invalid_key");
    }

    #[test]
    fn client_uses_config() {
        let url = Url::parse("http://localhost:8080").unwrap();
        let client = ClientConfig::new(url.clone(), "token", 56).client();
        assert_eq!(client.url(), &url);
        assert_eq!(client.chain_id(), 56);
    }
}
