use std::sync::{Arc, Mutex};

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use zenspace::config::AppConfig;
use zenspace::db;
use zenspace::handlers;
use zenspace::planner::Planner;
use zenspace::repository::SqliteRepository;
use zenspace::services::ai::gemini::GeminiProvider;
use zenspace::services::ai::ollama::OllamaProvider;
use zenspace::services::ai::LlmProvider;
use zenspace::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "gemini" => {
            anyhow::ensure!(
                !config.gemini_api_key.is_empty(),
                "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini"
            );
            tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);
            Box::new(GeminiProvider::new(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
            ))
        }
        _ => {
            tracing::info!("using Ollama LLM provider (url: {})", config.ollama_url);
            Box::new(OllamaProvider::new(
                config.ollama_url.clone(),
                "llama3.2".to_string(),
            ))
        }
    };

    let repo = Arc::new(SqliteRepository::new(Arc::new(Mutex::new(conn))));
    let today = chrono::Local::now().date_naive().to_string();
    let mut planner = Planner::new(repo, today);
    planner.load().await?;

    let state = Arc::new(AppState {
        planner: tokio::sync::Mutex::new(planner),
        llm,
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/spaces", get(handlers::spaces::list_spaces))
        .route("/api/spaces", post(handlers::spaces::create_space))
        .route("/api/spaces/:id", put(handlers::spaces::update_space))
        .route("/api/spaces/:id", delete(handlers::spaces::delete_space))
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route("/api/bookings", post(handlers::bookings::create_booking))
        .route(
            "/api/bookings/preview",
            post(handlers::bookings::preview_booking),
        )
        .route("/api/bookings/:id", put(handlers::bookings::update_booking))
        .route(
            "/api/bookings/:id",
            delete(handlers::bookings::delete_booking),
        )
        .route("/api/stats", get(handlers::stats::daily_stats))
        .route("/api/assistant/suggest", post(handlers::assistant::suggest))
        .route("/api/assistant/summary", get(handlers::assistant::summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
