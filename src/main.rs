#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tcmonitor_bridge::config::{self, load_configuration};
use tcmonitor_bridge::datasource::{DatasourceOptions, MonitorDatasource};
use tcmonitor_bridge::http::server::run_http_server;
use tcmonitor_bridge::http::state::HttpServerState;
use tcmonitor_bridge::provider::tencentcloud::TencentCloudFactory;
use tcmonitor_bridge::settings::DataSourceInstanceSettings;
use tracing::{Level, event};

#[derive(Debug, Parser)]
#[command(version, about = "Tencent Cloud Monitor data source bridge")]
struct Cli {
    /// Path to the TOML settings file, environment variables take precedence
    #[arg(short, long, default_value = "settings.toml")]
    settings: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install CryptoProvider: {:?}", e))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    load_configuration(&cli.settings).context("Failed to load configuration")?;
    let config = config::get().context("Failed to get configuration")?;

    // Initialize Sentry if DSN is provided
    let _sentry = config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.clone(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let factory = TencentCloudFactory::from_endpoint(config.provider_endpoint.as_deref())
        .context("Failed to configure the provider client")?;
    let datasource = Arc::new(MonitorDatasource::new(
        Arc::new(factory),
        DataSourceInstanceSettings::from_config(&config),
        DatasourceOptions::from(&*config),
    ));

    // Exit the program if a panic occurs
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        std::process::exit(1);
    }));

    let address = SocketAddr::from((config.endpoint, config.port));
    event!(Level::INFO, %address, "Starting HTTP server");

    let result = run_http_server(
        HttpServerState {
            name: Arc::new("Tencent Cloud Monitor Bridge".to_string()),
            datasource: datasource.clone(),
        },
        address,
    )
    .await;
    datasource.dispose();

    match result {
        Ok(_) => {
            event!(Level::INFO, "HTTP server stopped gracefully");
            Ok(())
        }
        Err(err) => {
            event!(Level::ERROR, "HTTP server failed to start: {}", err);
            Err(err)
        }
    }
}
