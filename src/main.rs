use std::sync::Arc;

use dashgate::cli;
use dashgate::config::{config_schema, load_config};
use dashgate::startup::build_state;
use dashgate::utils::logger::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli::command().get_matches();

    if let Some(("schema", _)) = matches.subcommand() {
        println!("{}", config_schema()?);
        return Ok(());
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(cli::DEFAULT_CONFIG_PATH);
    let config = Arc::new(load_config(config_path)?);
    init_logging(&config.logging)?;

    let state = build_state(config)?;
    cli::dispatch(&matches, &state).await
}
