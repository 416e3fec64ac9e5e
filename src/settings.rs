use crate::config::BridgeConfig;
use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const SECRET_KEY_FIELD: &str = "secretKey";

/// Data source instance settings as handed over by the host.
///
/// `json_data` is the plain settings object. `decrypted_secure_json_data`
/// holds the secure fields, already decrypted by the host.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceInstanceSettings {
    #[serde(default)]
    pub json_data: Value,
    #[serde(default)]
    pub decrypted_secure_json_data: HashMap<String, String>,
}

impl DataSourceInstanceSettings {
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            json_data: serde_json::json!({ "secretId": secret_id.into() }),
            decrypted_secure_json_data: HashMap::from([(
                SECRET_KEY_FIELD.to_string(),
                secret_key.into(),
            )]),
        }
    }

    /// Default instance settings built from the process configuration.
    pub fn from_config(config: &BridgeConfig) -> Self {
        let mut settings = Self {
            json_data: Value::Object(Default::default()),
            decrypted_secure_json_data: HashMap::new(),
        };
        if let Some(secret_id) = &config.secret_id {
            settings.json_data = serde_json::json!({ "secretId": secret_id });
        }
        if let Some(secret_key) = &config.secret_key {
            settings
                .decrypted_secure_json_data
                .insert(SECRET_KEY_FIELD.to_string(), secret_key.clone());
        }
        settings
    }
}

// Secure values never reach logs, only their keys
impl fmt::Debug for DataSourceInstanceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secure: BTreeMap<&str, &str> = self
            .decrypted_secure_json_data
            .keys()
            .map(|key| (key.as_str(), "<redacted>"))
            .collect();
        f.debug_struct("DataSourceInstanceSettings")
            .field("json_data", &self.json_data)
            .field("decrypted_secure_json_data", &secure)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasourceJsonData {
    #[serde(default)]
    secret_id: Option<String>,
}

/// Provider credentials. Lives for one request and is never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Extracts the provider credentials from the host settings.
pub fn load_credentials(settings: &DataSourceInstanceSettings) -> Result<Credentials, BridgeError> {
    let json_data: DatasourceJsonData = match &settings.json_data {
        Value::Null => DatasourceJsonData::default(),
        value => serde_json::from_value(value.clone()).map_err(|e| {
            BridgeError::configuration(format!("error reading settings: {}", e))
        })?,
    };

    let secret_id = json_data
        .secret_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| BridgeError::configuration("missing secretId in data source settings"))?;

    let secret_key = settings
        .decrypted_secure_json_data
        .get(SECRET_KEY_FIELD)
        .filter(|key| !key.is_empty())
        .cloned()
        .ok_or_else(|| {
            BridgeError::configuration("missing secretKey in secure data source settings")
        })?;

    Ok(Credentials {
        secret_id,
        secret_key,
    })
}
