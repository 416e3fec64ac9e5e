use anyhow::Error;
use confique::Config;
use std::{
    fmt,
    net::IpAddr,
    path::Path,
    sync::{Arc, OnceLock},
};

#[derive(Config)]
pub struct BridgeConfig {
    #[config(env = "TCMONITOR_PORT", default = 3000)]
    pub port: u16,
    #[config(env = "TCMONITOR_ENDPOINT", default = "127.0.0.1")]
    pub endpoint: IpAddr,

    #[config(env = "TCMONITOR_HTTP_BODY_LIMIT", default = "1mb")]
    pub http_body_limit: String,

    #[config(env = "TCMONITOR_HTTP_SERVER_TIMEOUT_SECONDS", default = 30)]
    pub http_server_timeout_seconds: u64,

    /// Default data source credentials, used when a request carries no
    /// plugin context of its own.
    #[config(env = "TCMONITOR_SECRET_ID")]
    pub secret_id: Option<String>,
    #[config(env = "TCMONITOR_SECRET_KEY")]
    pub secret_key: Option<String>,

    /// Region used to build the client for the region lookup.
    #[config(env = "TCMONITOR_REGIONS_LOOKUP_REGION", default = "ap-guangzhou")]
    pub regions_lookup_region: String,

    /// Overrides `https://<service>.tencentcloudapi.com` for every service.
    #[config(env = "TCMONITOR_PROVIDER_ENDPOINT")]
    pub provider_endpoint: Option<String>,

    #[config(env = "TCMONITOR_QUERY_CONCURRENCY", default = 1)]
    pub query_concurrency: usize,

    #[config(env = "TCMONITOR_SENTRY_DSN")]
    pub sentry_dsn: Option<String>,
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("BridgeConfig")
            .field("port", &self.port)
            .field("endpoint", &self.endpoint)
            .field("http_body_limit", &self.http_body_limit)
            .field("http_server_timeout_seconds", &self.http_server_timeout_seconds)
            .field("secret_id", &self.secret_id)
            .field("secret_key", &redacted(&self.secret_key))
            .field("regions_lookup_region", &self.regions_lookup_region)
            .field("provider_endpoint", &self.provider_endpoint)
            .field("query_concurrency", &self.query_concurrency)
            .field("sentry_dsn", &redacted(&self.sentry_dsn))
            .finish()
    }
}

impl BridgeConfig {
    pub fn load() -> Result<BridgeConfig, Error> {
        Self::load_from("settings.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<BridgeConfig, Error> {
        let c = BridgeConfig::builder()
            .env()
            .file(path.as_ref())
            .load()?;

        Ok(c)
    }

    pub fn parse_http_body_limit(&self) -> Result<usize, Error> {
        let size = byte_unit::Byte::parse_str(self.http_body_limit.clone(), true)?.as_u64();
        if size > 1024 * 1024 * 1024 {
            anyhow::bail!("Body size is too big: > 1GB");
        }
        Ok(size as usize)
    }
}

static BRIDGE_CONFIG: OnceLock<Arc<BridgeConfig>> = OnceLock::new();

pub fn get() -> Result<Arc<BridgeConfig>, Error> {
    BRIDGE_CONFIG.get().cloned().ok_or_else(|| {
        Error::msg(
            "Configuration not loaded. Please call load_configuration() before using the configuration",
        )
    })
}

pub fn load_configuration(path: impl AsRef<Path>) -> Result<(), Error> {
    // Check if the configuration has already been loaded
    if BRIDGE_CONFIG.get().is_some() {
        return Ok(());
    }

    let config = BridgeConfig::load_from(path)?;
    BRIDGE_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}

use std::sync::Mutex;

#[allow(dead_code)] // Used by integration tests, not visible in cargo check
static TEST_CONFIG_INIT: Mutex<()> = Mutex::new(());

/// Test-only function to ensure configuration is loaded exactly once per test run
#[allow(dead_code)] // Used by integration tests, not visible in cargo check
pub fn load_configuration_for_tests() -> Result<(), Error> {
    let _guard = TEST_CONFIG_INIT
        .lock()
        .map_err(|e| Error::msg(format!("Test configuration lock poisoned: {}", e)))?;

    if BRIDGE_CONFIG.get().is_some() {
        return Ok(());
    }

    let config = BridgeConfig::load()?;
    BRIDGE_CONFIG.get_or_init(|| Arc::new(config));

    Ok(())
}
