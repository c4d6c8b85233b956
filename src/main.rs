use actix_web::{App, HttpServer, middleware, web};

use plenum::config::Config;
use plenum::db;
use plenum::handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::load();

    if let Some(dir) = std::path::Path::new(&config.database_path).parent() {
        std::fs::create_dir_all(dir).expect("Failed to create data directory");
    }

    let pool = db::init_pool(&config.database_path);
    db::run_migrations(&pool);

    log::info!(
        "Starting server at http://127.0.0.1:8080 (links built against {})",
        config.base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            // Shareable-link entry point: dispatches on ?table=&mode=
            .route("/", web::get().to(handlers::participant_handlers::entry))
            // Participant flows
            .route("/join", web::get().to(handlers::participant_handlers::join))
            .route(
                "/forms/{slug}",
                web::get().to(handlers::participant_handlers::form_view),
            )
            .route(
                "/forms/{slug}/responses",
                web::post().to(handlers::participant_handlers::submit),
            )
            // Admin JSON API
            .service(web::scope("/api/v1").configure(handlers::api_v1::configure))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({ "error": "Not found" }))
            }))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
