mod app;
mod config;
mod render;

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::load(config_path.as_deref())?;
    catalog_logging::initialize(
        config.log_destination,
        config.log_level()?,
        &catalog_logging::default_log_path(),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();
    runtime.block_on(app::run(config, handle))
}
