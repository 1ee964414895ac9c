use std::env;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use paperbot_backend::core::logging;
use paperbot_backend::server::router;
use paperbot_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let state = AppState::initialize().await?;
    logging::init(&state.paths);

    let port = env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(8765);
    let bind_addr = format!("127.0.0.1:{}", port);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    println!("PAPERBOT_PORT={}", addr.port());
    tracing::info!(
        "Listening on {} ({} corpus entries, generation: {})",
        addr,
        state.corpus.len(),
        state.answers.generation_enabled()
    );

    let app: Router = router::router(state.clone());

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
