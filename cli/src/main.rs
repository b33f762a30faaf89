use clap::Parser;
use dossier_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dossier_cli::run_main(cli).await
}
