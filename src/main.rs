// Entrypoint for the CLI application.
// - Keeps `main` small: load config, build the API clients and hand them to
//   the UI loop.
// - Logs go to stderr so they stay out of the prompts; raise the level with
//   RUST_LOG (e.g. RUST_LOG=wayfarer_cli=debug).

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use wayfarer_cli::{
    api::CountryClient, config::Config, excerpt::WikiClient, prompt::TerminalConsole,
    ui::run_session,
};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wayfarer_cli=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let countries = CountryClient::from_config(&config).context("Failed to build country client")?;
    let excerpts = WikiClient::from_config(&config).context("Failed to build wiki client")?;

    // Blocks until the user stops searching and the files are written.
    run_session(TerminalConsole, countries, excerpts, &config)?;
    Ok(())
}
