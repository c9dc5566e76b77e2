use anyhow::Result;
use clap::Parser;
use r8it_backend::ai::OpenAiVisionClient;
use r8it_backend::analysis::PlaceAnalyzer;
use r8it_backend::api::{build_app, AppState, ServiceSet};
use r8it_backend::gps::GpsExtractor;
use r8it_backend::location::{LocationService, NominatimClient, RetryPolicy};
use r8it_backend::models::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "r8it-backend")]
#[command(about = "Image analysis and GPS location API for R8it")]
struct CliArgs {
    /// Address to listen on; overrides BIND_ADDR.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Route groups to serve.
    #[arg(long, value_enum, default_value_t = ServiceSet::All)]
    service: ServiceSet,
}

fn build_state(config: &Config) -> Result<AppState> {
    let vision = OpenAiVisionClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.vision_model.clone(),
        config.vision_timeout,
    )?;

    let geocoder = NominatimClient::new(
        config.nominatim_base_url.clone(),
        &config.nominatim_user_agent,
        config.geocode_timeout,
    )?;

    let locations = LocationService::new(Arc::new(geocoder))
        .with_retry_policy(RetryPolicy {
            max_attempts: config.geocode_max_attempts,
            delay: config.geocode_retry_delay,
        })
        .with_deadline(config.geocode_deadline);

    Ok(AppState {
        analyzer: Arc::new(PlaceAnalyzer::new(Arc::new(vision))),
        locations: Arc::new(locations),
        extractor: Arc::new(GpsExtractor::new()),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "r8it_backend=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env()?;
    let bind_addr = args.bind.unwrap_or(config.bind_addr);

    let app = build_app(build_state(&config)?, args.service);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Serving {:?} routes on {}", args.service, bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Received shutdown signal, starting graceful shutdown");
}
