use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trade_match::config::Settings;
use trade_match::core::{Matcher, Normalizer};
use trade_match::routes::{self, matches::AppState};
use trade_match::services::RiskCache;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting trade-match scoring service...");

    let matching_config = settings.matching.to_matching_config();
    info!(
        "Matcher initialized: version {}, reference date {}, {} corridors",
        matching_config.version,
        matching_config.reference_date,
        matching_config.scoring.corridors.len()
    );

    let app_state = AppState {
        matcher: Matcher::new(matching_config),
        normalizer: Normalizer::new(settings.matching.home_country.clone()),
        risk_cache: RiskCache::new(settings.cache.risk_map_capacity, settings.cache.ttl_secs),
        max_limit: settings.matching.max_limit,
    };

    info!(
        "Risk cache initialized ({} entries, TTL: {}s)",
        settings.cache.risk_map_capacity, settings.cache.ttl_secs
    );

    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting HTTP server on {}:{}", host, port);

    let mut server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    });

    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    server
        .bind((host, port))
        .map_err(|e| {
            error!("Failed to bind {}:{}: {}", settings.server.host, port, e);
            e
        })?
        .run()
        .await
}
