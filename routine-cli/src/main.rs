mod cli;
mod output;
mod plan;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    cli::Cli::parse().run().await
}
