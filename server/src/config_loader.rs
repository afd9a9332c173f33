use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use metatile_application::error::{AppError, AppResult};
use metatile_application::infrastructure_config::Config;
use std::fs;
use std::path::Path;
use tracing::info;

const ENV_PREFIX: &str = "METATILE_";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;

    let config: Config = figment().extract().map_err(|e| AppError::ConfigError {
        message: format!("Failed to load configuration: {e}"),
    })?;

    config.validate()?;
    Ok(config)
}

/// Defaults, then `config.toml`, then `config.json`, then `METATILE_*` variables.
fn figment() -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if Path::new("config.toml").exists() {
        figment = figment.merge(Toml::file("config.toml"));
    }

    if Path::new("config.json").exists() {
        figment = figment.merge(Json::file("config.json"));
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!("Generated .env from template. Review it before exposing the server.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::definition::UnsetLayerEncoding;
    use figment::Jail;
    use metatile_application::infrastructure_config::LogFormat;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let config = load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.editor.unset_layers, UnsetLayerEncoding::FirstTileset);
            assert_eq!(config.editor.export_file_name, "metatile_definitions.txt");
            Ok(())
        });
    }

    #[test]
    fn toml_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [server]
                port = 4000

                [editor]
                unset_layers = "explicit"

                [logging]
                format = "json"
                "#,
            )?;
            jail.set_env("METATILE_SERVER__PORT", "5000");
            jail.set_env("METATILE_EDITOR__EXPORT_FILE_NAME", "defs.txt");

            let config = load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 5000);
            assert_eq!(config.editor.unset_layers, UnsetLayerEncoding::Explicit);
            assert_eq!(config.editor.export_file_name, "defs.txt");
            assert!(matches!(config.logging.format, LogFormat::Json));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("METATILE_EDITOR__MAX_UPLOAD_BYTES", "0");
            let error = load_config().unwrap_err();
            assert!(matches!(error, AppError::ConfigError { .. }));
            Ok(())
        });
    }

    #[test]
    fn env_template_is_copied_once() {
        Jail::expect_with(|jail| {
            jail.create_file(".env.example", "METATILE_SERVER__PORT=3000\n")?;
            load_config().map_err(|e| e.to_string())?;
            assert!(Path::new(".env").exists());
            Ok(())
        });
    }
}
