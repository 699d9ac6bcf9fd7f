use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use press_match::config::Settings;
use press_match::core::{ContentProcessor, JitterSource, SeededJitter, ThreadJitter};
use press_match::routes::{self, AppState};
use press_match::services::PostgresClient;
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            // Subscriber is not up yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting press matching service...");

    let postgres = PostgresClient::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await
    .map_err(|e| {
        error!("Failed to connect to PostgreSQL: {}", e);
        io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
    })?;

    info!("PostgreSQL client initialized");

    let jitter: Arc<dyn JitterSource> = match settings.ai.jitter_seed {
        Some(seed) => {
            info!("Using seeded score jitter ({})", seed);
            Arc::new(SeededJitter::new(seed))
        }
        None => Arc::new(ThreadJitter),
    };

    let mut processor = ContentProcessor::new(settings.ai.rules(), jitter);
    if let Some(model_path) = &settings.ai.model_path {
        info!("Model path configured: {}", model_path);
        processor = processor.with_model_path(model_path);
    }

    info!(
        "Processor initialized ({} vocabulary terms, {} tag rules)",
        processor.rules().vocabulary.len(),
        processor.rules().tag_rules.len()
    );

    let app_state = AppState {
        store: Arc::new(postgres),
        processor,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
