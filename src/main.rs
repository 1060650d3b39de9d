use std::sync::Arc;

use actix::prelude::*;
use actix_web::{web, App, HttpServer};
use anyhow::Context as _;

use dealership_orders::actors::SessionActor;
use dealership_orders::config::AppConfig;
use dealership_orders::session::AppSession;
use dealership_orders::{api, catalog, demo, logging, metrics};

#[actix::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        policy = ?config.transition_policy,
        seed_demo = config.seed_demo,
        "Starting {}",
        catalog::APP_TITLE
    );

    // === 1. Metrics registry ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 2. Session, optionally pre-populated ===
    let mut session = AppSession::new(config.transition_policy);
    if config.seed_demo {
        session.login("admin", "admin")?;
        let seeded = demo::seed_demo_orders(&mut session)?;
        for _ in &seeded {
            metrics.record_order_created(session.orders().len());
        }
        session.logout();
    }

    // === 3. Session actor ===
    let session_actor = SessionActor::new(session, metrics.clone()).start();

    // === 4. HTTP server ===
    let addr = config.socket_addr();
    tracing::info!("Listening on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(session_actor.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .configure(api::configure)
            .configure(metrics::configure)
    })
    .bind(addr)
    .with_context(|| format!("failed to bind {addr}"))?
    .run()
    .await
    .context("server crashed")?;

    tracing::info!("Server stopped");
    Ok(())
}
