mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{ensure_config, fake_app};
use serde_json::Value;
use std::sync::Arc;
use tcmonitor_bridge::settings::DataSourceInstanceSettings;
use tcmonitor_bridge::test_utils::FakeProviderFactory;
use tcmonitor_bridge::test_utils::http::TestApp;

mod health_check_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_endpoint() -> Result<()> {
        ensure_config();
        // Given: A running bridge
        let app = fake_app(&Arc::new(FakeProviderFactory::new()));

        // When: We query the liveness endpoint
        let response = app.get("/health/live").await?;

        // Then: Response should be successful
        response.assert_status(StatusCode::OK);

        let health_response: Value = response.json()?;
        assert_eq!(health_response["status"], "ok");

        Ok(())
    }

    #[tokio::test]
    async fn test_health_with_credentials() -> Result<()> {
        ensure_config();
        // Given: A bridge with credentials
        let factory = Arc::new(FakeProviderFactory::new());
        let app = fake_app(&factory);

        // When: We query the health endpoint
        let response = app.get("/health").await?;

        // Then: It reports OK without calling the provider
        response.assert_status(StatusCode::OK);
        let health: Value = response.json()?;
        assert_eq!(health["status"], "OK");
        assert!(factory.calls().is_empty());
        assert!(factory.connected_secret_ids().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_health_without_credentials() -> Result<()> {
        ensure_config();
        // Given: A bridge whose secret key is missing
        let mut settings = DataSourceInstanceSettings::new("AKIDexample", "unused");
        settings.decrypted_secure_json_data.clear();
        let app = TestApp::new(Arc::new(FakeProviderFactory::new()), settings);

        // When: We query the health endpoint
        let response = app.get("/health").await?;

        // Then: It reports the configuration problem
        response.assert_status(StatusCode::OK);
        let health: Value = response.json()?;
        assert_eq!(health["status"], "ERROR");
        assert!(health["message"].as_str().unwrap().contains("secretKey"));

        Ok(())
    }
}
