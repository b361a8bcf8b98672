/*
 * Responsibility
 * - Config → tracing → stores → Router
 * - Router-wide middleware (CORS, request id / trace / limits)
 * - axum::serve() with graceful shutdown
 */
use anyhow::{Context as _, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::{panic, process, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::context::SessionCookieConfig;
use crate::middleware;
use crate::repos::PgUserStore;
use crate::services::cache::{MemoryCache, ValkeyClient, ttl_seconds};
use crate::services::locale::StaticLocaleStore;
use crate::services::session::{CacheSessionStore, SessionStore};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins, e.g. RUST_LOG=info,request_context=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!("starting in {:?} mode on {}", config.app_env, config.addr);

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the user database")?;
    let users = Arc::new(PgUserStore::new(pool));

    let ttl = ttl_seconds(config.session.ttl_seconds);
    let prefix = config.session.key_prefix.clone();
    let sessions: Arc<dyn SessionStore> = match &config.valkey_url {
        Some(url) => {
            let client = ValkeyClient::new(url)
                .await
                .context("failed to connect to valkey")?;
            Arc::new(CacheSessionStore::new(Arc::new(client), prefix, ttl))
        }
        None => {
            tracing::warn!("VALKEY_URL not set, sessions are kept in process memory");
            Arc::new(CacheSessionStore::new(Arc::new(MemoryCache::new()), prefix, ttl))
        }
    };

    let locales = StaticLocaleStore::load(
        &config.locale.default_lang,
        &config.locale.supported,
        config.locale.translations_dir.as_deref(),
    )
    .context("failed to load translations")?;

    let session_cookie = SessionCookieConfig {
        name: config.session.cookie_name.clone(),
        max_age_seconds: config.session.ttl_seconds,
        secure: config.app_env.is_production(),
    };

    Ok(AppState::new(
        sessions,
        users,
        Arc::new(locales),
        session_cookie,
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::cors::apply(router, config.app_env, &config.http);
    middleware::http::apply(router, &config.http)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
