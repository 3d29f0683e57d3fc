//! Filtersense Server binary.
//!
//! Loads configuration from files/environment and serves the semantic
//! filter extraction API.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
