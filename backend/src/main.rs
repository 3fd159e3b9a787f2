//! Service entry-point: wires storage, queue and identity adapters into the
//! domain services and serves the REST endpoints.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use storefront::domain::ports::NotificationQueue;
use storefront::domain::ports::DefaultPasswordPolicy;
use storefront::domain::{AccountService, BasketService, ImportService};
use storefront::inbound::http::health::{live, ready, HealthState};
use storefront::inbound::http::{routes, HttpState};
use storefront::outbound::identity::ArgonPasswordHasher;
use storefront::outbound::persistence::{
    DbPool, DieselAccessTokenRepository, DieselCatalogIngestionRepository,
    DieselCatalogRepository, DieselConfirmationTokenRepository, DieselContactRepository,
    DieselOrderRepository, DieselUserRepository, PoolConfig,
};
use storefront::outbound::queue::{ApalisNotificationQueue, LoggingNotificationQueue};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_PRICELIST: &str = "/var/lib/storefront/pricelist.json";

/// Apply pending migrations on a blocking connection before serving.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut connection = PgConnection::establish(&database_url)
            .map_err(|err| std::io::Error::other(format!("database connection failed: {err}")))?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
        Ok(())
    })
    .await
    .map_err(|err| std::io::Error::other(format!("migration task panicked: {err}")))?
}

/// Build the notification queue, falling back to the logging adapter when
/// no queue database is configured or reachable.
async fn notification_queue(queue_url: Option<String>) -> Arc<dyn NotificationQueue> {
    let Some(url) = queue_url else {
        warn!("QUEUE_DATABASE_URL unset; notifications will be logged and dropped");
        return Arc::new(LoggingNotificationQueue::new());
    };
    let pool = match sqlx::PgPool::connect(&url).await {
        Ok(pool) => pool,
        Err(err) => {
            warn!(error = %err, "queue database unreachable; falling back to logging queue");
            return Arc::new(LoggingNotificationQueue::new());
        }
    };
    match ApalisNotificationQueue::setup(pool).await {
        Ok(queue) => Arc::new(queue),
        Err(err) => {
            warn!(error = %err, "queue setup failed; falling back to logging queue");
            Arc::new(LoggingNotificationQueue::new())
        }
    }
}

fn build_state(pool: DbPool, queue: Arc<dyn NotificationQueue>, pricelist_path: PathBuf) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let confirmations = Arc::new(DieselConfirmationTokenRepository::new(pool.clone()));
    let access_tokens = Arc::new(DieselAccessTokenRepository::new(pool.clone()));

    let accounts = AccountService::new(
        users,
        confirmations,
        access_tokens.clone(),
        Arc::new(ArgonPasswordHasher::new()),
        Arc::new(DefaultPasswordPolicy),
        queue.clone(),
    );
    let imports = ImportService::new(Arc::new(DieselCatalogIngestionRepository::new(
        pool.clone(),
    )));
    let baskets = BasketService::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselContactRepository::new(pool.clone())),
        queue,
    );

    HttpState::new(
        Arc::new(accounts),
        Arc::new(imports),
        Arc::new(baskets),
        Arc::new(DieselCatalogRepository::new(pool)),
        access_tokens,
        pricelist_path,
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let bind = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND.into());
    let pricelist_path =
        PathBuf::from(env::var("PRICELIST_PATH").unwrap_or_else(|_| DEFAULT_PRICELIST.into()));
    let queue_url = env::var("QUEUE_DATABASE_URL").ok();

    run_migrations(database_url.clone()).await?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("pool build failed: {err}")))?;
    let queue = notification_queue(queue_url).await;
    let state = web::Data::new(build_state(pool, queue, pricelist_path));

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .app_data(server_health_state.clone())
            .configure(routes::configure)
            .service(ready)
            .service(live)
    })
    .bind(bind.as_str())?;

    info!(%bind, "storefront listening");
    health_state.mark_ready();
    server.run().await
}
