use std::fs::File;

use accessory_core::prelude::*;
use accessory_platform::run_terminal_app;
use anyhow::Context;

/// Path to a JSON `FormConfig`; the First Name / Last Name form is used when unset.
const CONFIG_ENV: &str = "ACCESSORY_FORM_CONFIG";
/// Log file. Without it logging is off: stderr shares the alternate screen.
const LOG_ENV: &str = "ACCESSORY_FORM_LOG";

fn init_logging() -> anyhow::Result<()> {
    let mut builder = match std::env::var_os(LOG_ENV) {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("creating {LOG_ENV}={}", path.to_string_lossy()))?;
            let mut b = env_logger::Builder::from_default_env();
            b.target(env_logger::Target::Pipe(Box::new(file)));
            b
        }
        None => {
            let mut b = env_logger::Builder::new();
            b.filter_level(log::LevelFilter::Off);
            b
        }
    };
    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => FormConfig::load(&path)
            .with_context(|| format!("loading {CONFIG_ENV}={}", path.to_string_lossy()))?,
        None => FormConfig::default(),
    };
    log::debug!("form config: {config:?}");

    for field in run_terminal_app(&config)? {
        println!("{}: {}", field.label, field.text);
    }
    Ok(())
}
