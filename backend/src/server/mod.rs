//! Server construction and wiring.

mod config;

pub use config::ServerSettings;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use url::Url;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::IdentityGate;
use backend::domain::{IssueIntakeService, WorkflowService};
use backend::example_data::{ExampleDataSettings, demo_tokens, seed_example_data};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::workflow;
use backend::outbound::identity::{HttpIdentityGate, StaticIdentityGate};
use backend::outbound::store::MemoryDocumentStore;

fn build_identity_gate(settings: &ServerSettings) -> std::io::Result<Arc<dyn IdentityGate>> {
    match settings.identity_provider_url.as_deref() {
        Some(raw) => {
            let base = Url::parse(raw).map_err(|e| {
                std::io::Error::other(format!("invalid identity provider URL {raw}: {e}"))
            })?;
            let gate = HttpIdentityGate::new(base)
                .map_err(|e| std::io::Error::other(format!("identity gate setup failed: {e}")))?;
            Ok(Arc::new(gate))
        }
        None => {
            warn!("no identity provider configured; accepting static demo tokens (dev only)");
            Ok(Arc::new(StaticIdentityGate::new(demo_tokens())))
        }
    }
}

/// Build the adapters, optionally seed example data, and run the server
/// until shutdown.
pub async fn run(settings: ServerSettings) -> std::io::Result<()> {
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|e| {
        std::io::Error::other(format!("invalid bind address {}: {e}", settings.bind_addr()))
    })?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Arc::new(MemoryDocumentStore::with_retry_policy(
        clock,
        settings.retry_policy(),
    ));

    let example_data = ExampleDataSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load example data settings: {e}")))?;
    if example_data.enabled {
        let outcome = seed_example_data(store.as_ref())
            .await
            .map_err(|e| std::io::Error::other(format!("example data seeding failed: {e}")))?;
        info!(?outcome, "example data ready");
    }

    let http_state = web::Data::new(HttpState::new(
        Arc::new(WorkflowService::new(Arc::clone(&store))),
        Arc::new(IssueIntakeService::new(Arc::clone(&store))),
        build_identity_gate(&settings)?,
    ));
    let health_state = web::Data::new(HealthState::new());

    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(workflow::configure))
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    info!(%bind_addr, "listening");
    server.run().await
}
