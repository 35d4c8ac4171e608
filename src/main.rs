//! Local handler for the Naver OAuth login callback.
//!
//! The application server finishes the Naver code exchange and redirects the
//! browser here with `?access_token=<jwt>`. This binary hosts the callback
//! page: it stores the token locally and sends the browser back into the app.

use naver_callback::config::AppConfig;
use naver_callback::server::CallbackServer;
use naver_callback::store;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let store = store::open(&config)?;
    let server = CallbackServer::bind(&config).await?;
    server.run(store).await?;
    Ok(())
}
