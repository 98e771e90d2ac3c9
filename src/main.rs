use anyhow::Result;
use dotenv::dotenv;
use log::info;

use noesis::config::initialize_config;
use noesis::logging::init_logging;
use noesis::ui::run_ui;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    initialize_config()?;

    let log_level = noesis::config::get_config().log_level;
    let _logger = init_logging(&log_level)?;

    info!("noesis starting");
    run_ui().await?;
    info!("noesis exited cleanly");

    Ok(())
}
