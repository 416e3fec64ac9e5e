mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::fixtures::{cpu_query, query_request, two_series_cpu_usage};
use common::{ensure_config, fake_app};
use serde_json::{Value, json};
use std::sync::Arc;
use tcmonitor_bridge::datasource::DatasourceOptions;
use tcmonitor_bridge::settings::DataSourceInstanceSettings;
use tcmonitor_bridge::test_utils::http::TestApp;
use tcmonitor_bridge::test_utils::{FakeProviderFactory, ProviderCall};

mod query_data_tests {
    use super::*;

    #[tokio::test]
    async fn test_two_series_frame_layout() -> Result<()> {
        ensure_config();
        // Given: A provider answering two series of three points each
        let factory = Arc::new(
            FakeProviderFactory::new().with_monitor_data(two_series_cpu_usage()),
        );
        let app = fake_app(&factory);

        // When: We run one query over both instances
        let response = app
            .post_json("/query", &query_request(vec![cpu_query("A")]))
            .await?;

        // Then: One frame with every timestamp but only the last series' values
        response.assert_status(StatusCode::OK);
        let body: Value = response.json()?;
        let result = &body["results"]["A"];
        assert_eq!(result["status"], 200);
        assert!(result.get("error").is_none());

        let frames = result["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 1);
        let fields = frames[0]["schema"]["fields"].as_array().unwrap();
        assert_eq!(fields[0]["name"], "Timestamps");
        assert_eq!(fields[0]["type"], "time");
        assert_eq!(fields[1]["name"], "CPUUsage");
        assert_eq!(fields[1]["labels"], json!({"InstanceId": "ins-1"}));

        let values = frames[0]["data"]["values"].as_array().unwrap();
        assert_eq!(values[0].as_array().unwrap().len(), 6);
        assert_eq!(values[0][0], json!(1704067200000_i64));
        assert_eq!(values[1], json!([10.0, null, 30.0]));

        Ok(())
    }

    #[tokio::test]
    async fn test_split_series_frames() -> Result<()> {
        ensure_config();
        // Given: The same two series, with per-series frames requested
        let factory = Arc::new(
            FakeProviderFactory::new().with_monitor_data(two_series_cpu_usage()),
        );
        let app = fake_app(&factory);
        let mut query = cpu_query("A");
        query["splitSeries"] = json!(true);

        // When: We run the query
        let response = app.post_json("/query", &query_request(vec![query])).await?;

        // Then: Each frame is a consistent table with its own labels
        let body: Value = response.json()?;
        let frames = body["results"]["A"]["frames"].as_array().unwrap().clone();
        assert_eq!(frames.len(), 2);
        for (frame, instance) in frames.iter().zip(["ins-1", "ins-2"]) {
            let values = frame["data"]["values"].as_array().unwrap();
            assert_eq!(values[0].as_array().unwrap().len(), 3);
            assert_eq!(values[1].as_array().unwrap().len(), 3);
            assert_eq!(
                frame["schema"]["fields"][1]["labels"]["InstanceId"],
                instance
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_batch_isolation() -> Result<()> {
        ensure_config();
        // Given: A batch with one malformed query and one valid query
        let factory = Arc::new(
            FakeProviderFactory::new().with_monitor_data(two_series_cpu_usage()),
        );
        let app = TestApp::with_options(
            factory.clone(),
            common::test_settings(),
            DatasourceOptions {
                query_concurrency: 2,
                ..Default::default()
            },
        );
        let mut broken = cpu_query("A");
        broken["service"] = json!("");

        // When: We run the batch
        let response = app
            .post_json("/query", &query_request(vec![broken, cpu_query("B")]))
            .await?;

        // Then: Only the malformed query fails
        response.assert_status(StatusCode::OK);
        let body: Value = response.json()?;
        assert_eq!(body["results"]["A"]["status"], 400);
        assert!(
            body["results"]["A"]["error"]
                .as_str()
                .unwrap()
                .contains("missing namespace")
        );
        assert_eq!(body["results"]["B"]["status"], 200);
        assert_eq!(body["results"]["B"]["frames"].as_array().unwrap().len(), 1);

        // And: Only the valid query reached the provider
        assert_eq!(factory.calls().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_hidden_query() -> Result<()> {
        ensure_config();
        // Given: A hidden query
        let factory = Arc::new(FakeProviderFactory::new());
        let app = fake_app(&factory);
        let mut query = cpu_query("A");
        query["hide"] = json!(true);

        // When: We run it
        let response = app.post_json("/query", &query_request(vec![query])).await?;

        // Then: It yields an empty success and no provider call
        let body: Value = response.json()?;
        assert_eq!(body["results"]["A"], json!({"frames": [], "status": 200}));
        assert!(factory.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_hidden_query_skips_parsing() -> Result<()> {
        ensure_config();
        // Given: A hidden query with a period that would not parse
        let factory = Arc::new(FakeProviderFactory::new());
        let app = fake_app(&factory);
        let query = json!({"refId": "H", "hide": true, "period": "60"});

        // When: We run it
        let response = app.post_json("/query", &query_request(vec![query])).await?;

        // Then: It is skipped before its body is read
        let body: Value = response.json()?;
        assert_eq!(body["results"]["H"], json!({"frames": [], "status": 200}));
        assert!(factory.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_null_query_fields() -> Result<()> {
        ensure_config();
        // Given: A query sending null for its optional fields
        let factory = Arc::new(
            FakeProviderFactory::new().with_monitor_data(two_series_cpu_usage()),
        );
        let app = fake_app(&factory);
        let mut query = cpu_query("A");
        query["dimensions"] = json!(null);
        query["hide"] = json!(null);
        query["splitSeries"] = json!(null);

        // When: We run it
        let response = app.post_json("/query", &query_request(vec![query])).await?;

        // Then: The nulls read as defaults and the query succeeds
        let body: Value = response.json()?;
        assert_eq!(body["results"]["A"]["status"], 200);
        assert_eq!(body["results"]["A"]["frames"].as_array().unwrap().len(), 1);
        match factory.calls().as_slice() {
            [ProviderCall::FetchMonitorData { request, .. }] => {
                assert!(request.instances[0].dimensions.is_empty());
            }
            calls => panic!("unexpected calls: {:?}", calls),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_translated_request() -> Result<()> {
        ensure_config();
        // Given: A query with a per-query time range
        let factory = Arc::new(FakeProviderFactory::new());
        let app = fake_app(&factory);
        let mut query = cpu_query("A");
        query["timeRange"] = json!({"from": 1718454645000_i64, "to": 1718458245000_i64});

        // When: We run it
        app.post_json("/query", &query_request(vec![query]))
            .await?
            .assert_status(StatusCode::OK);

        // Then: The provider gets the query's own range and every dimension
        match factory.calls().as_slice() {
            [ProviderCall::FetchMonitorData { region, request }] => {
                assert_eq!(region, "ap-guangzhou");
                assert_eq!(request.namespace, "QCE/CVM");
                assert_eq!(request.metric_name, "CPUUsage");
                assert_eq!(request.period, 60);
                assert_eq!(request.start_time, "2024-06-15T12:30:45+00:00");
                assert_eq!(request.end_time, "2024-06-15T13:30:45+00:00");
                assert_eq!(request.instances.len(), 1);
                assert_eq!(request.instances[0].dimensions.len(), 2);
            }
            calls => panic!("unexpected calls: {:?}", calls),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_plugin_context_settings() -> Result<()> {
        ensure_config();
        // Given: An app without default credentials
        let factory = Arc::new(FakeProviderFactory::new());
        let app = TestApp::new(factory.clone(), DataSourceInstanceSettings::default());
        let body = json!({
            "pluginContext": {
                "dataSourceInstanceSettings": {
                    "jsonData": {"secretId": "AKIDcontext"},
                    "decryptedSecureJsonData": {"secretKey": "contextSecret"}
                }
            },
            "queries": [cpu_query("A")],
            "range": {"from": 0, "to": 60000}
        });

        // When: The request carries its own settings
        let response = app.post_json("/query", &body.to_string()).await?;

        // Then: They are used for the query
        let body: Value = response.json()?;
        assert_eq!(body["results"]["A"]["status"], 200);
        assert_eq!(factory.connected_secret_ids(), vec!["AKIDcontext".to_string()]);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_credentials() -> Result<()> {
        ensure_config();
        // Given: An app without credentials
        let factory = Arc::new(FakeProviderFactory::new());
        let app = TestApp::new(factory.clone(), DataSourceInstanceSettings::default());

        // When: We run a query
        let response = app
            .post_json("/query", &query_request(vec![cpu_query("A")]))
            .await?;

        // Then: The query fails with a configuration error
        let body: Value = response.json()?;
        assert_eq!(body["results"]["A"]["status"], 400);
        assert!(
            body["results"]["A"]["error"]
                .as_str()
                .unwrap()
                .starts_with("Configuration error")
        );
        assert!(factory.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_body() -> Result<()> {
        ensure_config();
        let factory = Arc::new(FakeProviderFactory::new());
        let app = fake_app(&factory);

        let response = app.post_json("/query", "{not json").await?;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json()?;
        assert!(body["error"].is_string());

        Ok(())
    }
}
