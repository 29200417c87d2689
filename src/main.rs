use anyhow::{Context, Result};
use glsandbox::{engine, SandboxConfig, ShaderSource};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

const DEFAULT_CONFIG_PATH: &str = "sandbox.toml";

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).env().init()?;
    info!("Initializing sandbox...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = SandboxConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;

    let source = ShaderSource::from_file(&config.shader.path)
        .with_context(|| format!("Error parsing shaders: {}", config.shader.path.display()))?;

    engine::run(&config, &source)?;

    info!("Window closed, exiting");
    Ok(())
}
