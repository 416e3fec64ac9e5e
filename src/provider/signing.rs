//! TC3-HMAC-SHA256 request signing for the Tencent Cloud API 3.0.

use crate::datamodel::bridge_datetime::{BridgeDateTime, BridgeDateTimeExt};
use crate::error::BridgeError;
use crate::settings::Credentials;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";

/// What goes into the signature of a single POST call.
#[derive(Debug, Clone, Copy)]
pub struct SignedRequest<'a> {
    pub service: &'a str,
    pub host: &'a str,
    pub payload: &'a str,
    /// Unix seconds, also sent as `X-TC-Timestamp`
    pub timestamp: i64,
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &str) -> Result<Vec<u8>, BridgeError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| BridgeError::provider("sign request", e))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn canonical_request(host: &str, payload: &str) -> String {
    format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        SIGNED_HEADERS,
        sha256_hex(payload.as_bytes())
    )
}

pub fn credential_scope(date: &str, service: &str) -> String {
    format!("{}/{}/tc3_request", date, service)
}

pub fn string_to_sign(timestamp: i64, scope: &str, canonical_request: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        scope,
        sha256_hex(canonical_request.as_bytes())
    )
}

pub fn signature(
    secret_key: &str,
    date: &str,
    service: &str,
    string_to_sign: &str,
) -> Result<String, BridgeError> {
    let secret_date = hmac_sha256(format!("TC3{}", secret_key).as_bytes(), date)?;
    let secret_service = hmac_sha256(&secret_date, service)?;
    let secret_signing = hmac_sha256(&secret_service, "tc3_request")?;
    Ok(hex::encode(hmac_sha256(&secret_signing, string_to_sign)?))
}

/// Value of the `Authorization` header.
pub fn authorization(
    credentials: &Credentials,
    request: &SignedRequest<'_>,
) -> Result<String, BridgeError> {
    let date = BridgeDateTime::from_unix_seconds_i64(request.timestamp).to_utc_date();
    let scope = credential_scope(&date, request.service);
    let canonical = canonical_request(request.host, request.payload);
    let to_sign = string_to_sign(request.timestamp, &scope, &canonical);
    let signature = signature(&credentials.secret_key, &date, request.service, &to_sign)?;

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.secret_id, scope, SIGNED_HEADERS, signature
    ))
}
