// Compound Search Service Main Entry Point
// Serves free-text and filtered search over biomedical compound records
// backed by PostgreSQL, or by an in-memory seed file for local runs
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use compound_search::{
    api::search_routes,
    config::{LogFormat, StoreBackend},
    db::{CompoundStore, DatabaseConfig, MemoryCompoundStore, PgCompoundStore},
    SearchConfig, SearchService,
};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET"]),
        None => Cors::default(),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = SearchConfig::from_env()?;

    init_tracing(config.log_format);
    info!("Starting compound search service");

    let store: Arc<dyn CompoundStore> = match config.backend()? {
        StoreBackend::Postgres(url) => {
            let db_config = DatabaseConfig::from_search_config(url, &config);
            Arc::new(PgCompoundStore::connect_lazy(&db_config)?)
        }
        StoreBackend::Memory(path) => Arc::new(MemoryCompoundStore::from_seed_file(&path)?),
    };

    info!(store = store.id(), "Initialized compound store");

    let service = web::Data::new(SearchService::new(store));
    let allowed_origin = config.cors_allowed_origin.clone();

    info!("🚀 Listening on http://{}:{}", config.host, config.port);
    info!("   Search: GET /api/search?query=&evidenceType=&disease=&confidenceScore=");

    HttpServer::new(move || {
        App::new()
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(TracingLogger::default())
            .app_data(service.clone())
            .configure(search_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Compound search service stopped");
    Ok(())
}
