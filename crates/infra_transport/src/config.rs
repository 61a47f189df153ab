//! Transport configuration

use serde::Deserialize;

use fiscal_kernel::Environment;

/// ISSNet DF homologation endpoint (ABRASF 2.04)
pub const DEFAULT_HOMOLOG_URL: &str =
    "https://www.issnetonline.com.br/homologaabrasf/webservicenfse204/nfse.asmx";

/// ISSNet DF production endpoint (ABRASF 2.04)
pub const DEFAULT_PRODUCTION_URL: &str =
    "https://www.issnetonline.com.br/abrasfdf/webservicenfse204/nfse.asmx";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoint and timeout settings for the SOAP client
#[derive(Debug, Clone, Deserialize)]
pub struct TransportConfig {
    /// Which endpoint the client talks to
    pub environment: Environment,
    /// Homologation base URL
    pub homolog_url: String,
    /// Production base URL
    pub production_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Homolog,
            homolog_url: DEFAULT_HOMOLOG_URL.to_string(),
            production_url: DEFAULT_PRODUCTION_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TransportConfig {
    /// Loads configuration from `NFSE_`-prefixed environment variables,
    /// falling back to the ISSNet DF defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("environment", Environment::Homolog.as_str())?
            .set_default("homolog_url", DEFAULT_HOMOLOG_URL)?
            .set_default("production_url", DEFAULT_PRODUCTION_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .add_source(config::Environment::with_prefix("NFSE"))
            .build()?
            .try_deserialize()
    }

    /// Creates a configuration for the given environment with defaults
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    /// The endpoint selected by the configured environment
    pub fn endpoint(&self) -> &str {
        match self.environment {
            Environment::Homolog => &self.homolog_url,
            Environment::Production => &self.production_url,
        }
    }
}
