use adapter::{
    database::connect_database_with,
    notification::{gmail::GmailNotifier, log::LogNotifier},
    redis::RedisClient,
};
use anyhow::{Context, Result};
use api::route::v1;
use axum::Router;
use kernel::notifier::Notifier;
use registry::AppRegistry;
use shared::config::{AppConfig, MailConfig};
use shared::env::{which, Environment};
use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

// メール設定が揃っていなければログ出力のみの通知にする
async fn build_notifier(mail: &MailConfig) -> Result<Arc<dyn Notifier>> {
    match (&mail.service_account_key, &mail.sender) {
        (Some(key), Some(sender)) => {
            let notifier = GmailNotifier::new(key, sender)
                .await
                .context("Failed to initialize Gmail notifier")?;
            Ok(Arc::new(notifier))
        }
        _ => {
            tracing::warn!("mail is not configured; notifications will only be logged");
            Ok(Arc::new(LogNotifier))
        }
    }
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let pool = connect_database_with(&app_config.database);
    pool.migrate().await.context("Failed to run migrations")?;
    let kv = Arc::new(RedisClient::new(&app_config.redis)?);
    let notifier = build_notifier(&app_config.mail).await?;

    let (registry, notification_worker) = AppRegistry::new(
        pool,
        kv,
        notifier,
        app_config.venue,
        app_config.notification,
    );
    notification_worker.spawn();

    let app = Router::new()
        .merge(v1::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 8080);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}
