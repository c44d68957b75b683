use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};

use podium::app_state::AppState;
use podium::config::Settings;
use podium::handlers;
use podium::models::record::{MemoryRecords, RecordStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env();

    let records = match &settings.seed_file {
        Some(path) => MemoryRecords::from_seed_file(path).unwrap_or_else(|e| {
            log::warn!("Could not load seed records from {path}: {e}; starting empty");
            MemoryRecords::new()
        }),
        None => MemoryRecords::new(),
    };
    let records: Arc<dyn RecordStore> = Arc::new(records);

    let bind_addr = settings.bind_addr.clone();
    let state = web::Data::new(AppState::new(settings, records));

    log::info!("Starting projector at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::projector_handlers::configure)
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::SeeOther()
                    .insert_header(("Location", "/projector"))
                    .finish()
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
