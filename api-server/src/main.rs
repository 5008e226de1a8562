use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cornhole_api::{configure, MatchRegistry, DEFAULT_MAX_MATCHES};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Cornhole Match API Server");

    let bind_address =
        std::env::var("CORNHOLE_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    tracing::info!("Binding to {}", bind_address);

    let max_matches = std::env::var("CORNHOLE_MAX_MATCHES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_MATCHES);
    tracing::info!("Hosting up to {} matches", max_matches);

    let registry = web::Data::new(MatchRegistry::with_capacity(max_matches));

    HttpServer::new(move || {
        // Configure CORS to allow all origins
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .max_age(86400);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(registry.clone())
            .app_data(web::JsonConfig::default().limit(65_536))
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
