use anyhow::Result;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use clear_tag::handlers::CheckHandler;
use clear_tag::services::{GeminiService, GradingService, HistoryLog};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting Clear Tag...");

    // Credentials and endpoint are read once here and injected explicitly;
    // nothing below reads the environment at call time.
    let api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set in .env file");

    let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".to_string());

    let grader: Arc<dyn GradingService> = match env::var("GEMINI_API_URL") {
        Ok(endpoint) => Arc::new(GeminiService::with_endpoint(api_key, model.clone(), endpoint)),
        Err(_) => Arc::new(GeminiService::new(api_key, model.clone())),
    };
    log::info!("✅ Gemini grading service initialized with model: {}", model);

    let history = Arc::new(HistoryLog::new());
    let check_handler = Arc::new(CheckHandler::new(grader, history));
    log::info!("✅ Check handler initialized");

    #[cfg(feature = "api-server")]
    {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let app = clear_tag::server::create_router(check_handler.clone());

        log::info!("🌐 API server starting on {}", bind_addr);

        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .expect("Failed to bind API server");
            axum::serve(listener, app)
                .await
                .expect("Failed to start API server");
        });

        log::info!("✅ API server started");
    }

    log::info!("🎉 Clear Tag is ready!");

    println!("\n🏷️ Clear Tag is running!");
    println!("🌐 API: http://localhost:8080/api/check");
    println!("📖 Fabric dictionary: http://localhost:8080/api/materials");
    println!("🌱 Brand directory: http://localhost:8080/api/brands");
    println!("\n🛑 Press Ctrl+C to stop\n");

    // Keep running
    tokio::signal::ctrl_c().await?;

    log::info!("🛑 Shutting down...");

    Ok(())
}
