use anyhow::Context;
use archive_proxy::{
    cli_args::CliArgs,
    server::{Server, ServerConfig},
};
use clap::Parser;

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "server=info,archive_proxy=info,tower_http=info");
    }

    init_tracing()?;

    tracing::info!("Starting ...");

    let cli_args = CliArgs::parse();
    let server_config = ServerConfig::from_cli_args(cli_args).await?;
    let server = Server::new(server_config);

    server.run().await?;

    Ok(())
}
