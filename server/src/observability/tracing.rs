use std::{error::Error, io::stdout};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use metatile_application::infrastructure_config::{Config, LogFormat};

const SERVICE_NAME: &str = "metatile-editor";

/// `RUST_LOG` wins over `logging.level` when set.
pub fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    let json = matches!(config.logging.format, LogFormat::Json);
    let location = config.logging.include_location;

    let storage_layer = json.then_some(JsonStorageLayer);
    let bunyan_layer =
        json.then(|| BunyanFormattingLayer::new(SERVICE_NAME.to_string(), stdout));
    let pretty_layer = (!json).then(|| {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(location)
            .with_line_number(location)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(storage_layer)
        .with(bunyan_layer)
        .with(pretty_layer)
        .try_init()?;

    Ok(())
}
