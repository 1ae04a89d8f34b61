// Framework bootstrap for the command-line driver.

use std::sync::Arc;

use crate::domain::{AuthService, Credentials, GatewayError, ReportService, Route};
use crate::frameworks::config::{ConfigError, GatewayConfig};
use crate::frameworks::location::provider_for;
use crate::frameworks::navigation::RouteChannel;
use crate::frameworks::storage::FileSessionStore;
use crate::interface_adapters::clients::GatewayClient;
use crate::use_cases::NearbyFeedUseCase;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run_with_config() -> Result<(), RunError> {
    init_runtime();

    let config = GatewayConfig::load().inspect_err(|e| {
        tracing::error!(error = %e, "failed to load configuration");
    })?;
    run(config).await
}

pub async fn run(config: GatewayConfig) -> Result<(), RunError> {
    tracing::debug!(api_base_url = %config.api_base_url, "gateway configured.");

    let session = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let (navigator, mut routes) = RouteChannel::new();
    let gateway = GatewayClient::new(&config.api_base_url, session, Arc::new(navigator))?;

    // Stand-in for the UI router: report redirects as they arrive.
    let router = tokio::spawn(async move {
        while let Some(route) = routes.recv().await {
            tracing::warn!(route = route.path(), "navigate");
            if route == Route::Login {
                tracing::info!("session ended; sign in again to continue.");
            }
        }
    });

    let username = std::env::var("LOSTFOUND_USERNAME").ok();
    let password = std::env::var("LOSTFOUND_PASSWORD").ok();
    if let (Some(username), Some(password)) = (username, password) {
        gateway.login(Credentials { username, password }).await?;
    }

    if gateway.is_authenticated()? {
        match gateway.my_reports().await {
            Ok(mine) => {
                for report in &mine {
                    tracing::info!(id = %report.id, status = %report.status, title = %report.title, "my report");
                }
            }
            // A rejected token has already been cleared; keep going anonymously.
            Err(error) if error.is_auth_rejected() => {
                tracing::warn!(%error, "stored session was rejected");
            }
            Err(error) => return Err(error.into()),
        }
    }

    let feed = NearbyFeedUseCase {
        radius_in_meters: config.nearby_radius_m,
        limit: config.feed_limit,
        locate_timeout: config.locate_timeout(),
        ..NearbyFeedUseCase::new(provider_for(config.device_location), gateway.clone())
    }
    .execute(None)
    .await?;

    tracing::info!(
        latitude = feed.origin.coordinate.latitude,
        longitude = feed.origin.coordinate.longitude,
        degraded = feed.origin.is_degraded(),
        "searching around"
    );
    for report in &feed.reports {
        tracing::info!(
            id = %report.id,
            report_type = %report.report_type,
            title = %report.title,
            "nearby report"
        );
    }

    // Dropping the gateway closes the navigation channel so the router task ends.
    drop(gateway);
    let _ = router.await;
    Ok(())
}
