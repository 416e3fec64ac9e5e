use std::sync::Arc;
use tcmonitor_bridge::config::load_configuration_for_tests;
use tcmonitor_bridge::settings::DataSourceInstanceSettings;
use tcmonitor_bridge::test_utils::FakeProviderFactory;
use tcmonitor_bridge::test_utils::http::TestApp;

#[allow(dead_code)]
pub mod fixtures;

// Ensure configuration is loaded once for all tests in a test binary
static INIT: std::sync::Once = std::sync::Once::new();
pub fn ensure_config() {
    INIT.call_once(|| {
        load_configuration_for_tests().expect("Failed to load configuration for tests");
    });
}

#[allow(dead_code)]
pub fn test_settings() -> DataSourceInstanceSettings {
    DataSourceInstanceSettings::new("AKIDexample", "secretExample")
}

/// Test app backed by the in-memory provider
#[allow(dead_code)]
pub fn fake_app(factory: &Arc<FakeProviderFactory>) -> TestApp {
    TestApp::new(factory.clone(), test_settings())
}
