use std::process;
use std::sync::Arc;

use tokio::signal;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

use vitrina::{
    application::{
        about::AboutService, auth::AuthService, carousels::CarouselService,
        contacts::ContactService, items::ItemService, menus::MenuService,
        products::ProductService, users::UserService,
    },
    cache::{CacheConfig, ObjectCache},
    config::{self, Command},
    domain::entities::SearchQuery,
    infra::{
        error::InfraError,
        http::{self, AppState, session::SessionStore},
        telemetry,
        upstream::UpstreamClient,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_startup_error(&error);
        process::exit(1);
    }
}

fn report_startup_error(error: &InfraError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "startup error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "startup error");
    });
}

async fn run() -> Result<(), InfraError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(Command::Serve(config::ServeArgs::default()));

    telemetry::init(&settings.logging)?;

    match command {
        Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), InfraError> {
    let upstream = Arc::new(UpstreamClient::new(&settings.upstream)?);
    let cache_config = CacheConfig::from(&settings.cache);
    let cache = Arc::new(ObjectCache::new(&cache_config));
    let sessions = Arc::new(SessionStore::new(settings.auth.session_ttl()));

    if settings.auth.jwt_secret.is_empty() {
        warn!("auth.jwt_secret is empty; access-token fallback will reject all tokens");
    }

    let state = AppState {
        products: ProductService::new(upstream.clone(), cache.clone()),
        items: ItemService::new(upstream.clone(), cache.clone()),
        carousels: CarouselService::new(upstream.clone(), cache.clone()),
        menus: MenuService::new(upstream.clone(), cache.clone()),
        users: UserService::new(upstream.clone(), cache.clone()),
        contacts: ContactService::new(upstream.clone(), cache.clone()),
        about: AboutService::new(upstream.clone(), cache.clone()),
        auth: AuthService::new(upstream.clone()),
        sessions: sessions.clone(),
        cache: cache.clone(),
        company_code: settings.upstream.company_code,
        jwt_secret: settings.auth.jwt_secret.clone(),
    };

    spawn_warmup(state.clone());
    spawn_cache_sweeper(cache.clone(), cache_config.sweep_interval());
    spawn_session_sweeper(sessions, settings.auth.session_sweep_interval());

    let addr = settings.server.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, company = settings.upstream.company_code, "vitrina listening");

    let grace = settings.server.graceful_shutdown();
    let router = http::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = signal::ctrl_c().await;
            info!(grace_secs = grace.as_secs(), "shutdown signal received, draining");
        })
        .await?;

    Ok(())
}

/// Prefetch the public storefront reads so the first request lands on a warm
/// cache. Upstream unavailability at boot is logged, never fatal.
fn spawn_warmup(state: AppState) {
    tokio::spawn(async move {
        let company = state.company_code;
        let results = tokio::join!(
            state.products.company_products(company),
            state.carousels.list(SearchQuery::for_company(company)),
            state.contacts.company_contact(company),
            state.about.for_company(company),
        );

        let failures = [
            results.0.err().map(|e| ("products", e)),
            results.1.err().map(|e| ("carousel", e)),
            results.2.err().map(|e| ("contacts", e)),
            results.3.err().map(|e| ("about", e)),
        ];
        let mut warmed = 4;
        for failure in failures.into_iter().flatten() {
            warmed -= 1;
            warn!(scope = failure.0, error = %failure.1, "cache warmup fetch failed");
        }
        info!(warmed, entries = state.cache.len(), "cache warmup finished");
    });
}

fn spawn_cache_sweeper(cache: Arc<ObjectCache>, interval: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await; // Skip the first immediate tick
        loop {
            ticker.tick().await;
            cache.sweep_expired();
        }
    });
}

fn spawn_session_sweeper(sessions: Arc<SessionStore>, interval: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            sessions.sweep_expired();
        }
    });
}
