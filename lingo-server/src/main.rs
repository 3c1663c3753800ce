use std::net::SocketAddr;

use lingo_server::config::Config;
use lingo_server::{app, State};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::load()?;
    let state = State::open(&config.db_path)?;
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await?;
    Ok(())
}
