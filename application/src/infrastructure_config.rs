use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use domain::definition::UnsetLayerEncoding;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub editor: EditorConfig,
    pub websocket: WebSocketConfig,
    pub logging: LoggingConfig,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub unset_layers: UnsetLayerEncoding,
    pub export_file_name: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketConfig {
    pub broadcast_buffer_size: usize,
    pub max_connections: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            unset_layers: UnsetLayerEncoding::FirstTileset,
            export_file_name: "metatile_definitions.txt".to_string(),
            max_upload_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origin: None,
            },
            editor: EditorConfig::default(),
            websocket: WebSocketConfig {
                broadcast_buffer_size: 256,
                max_connections: None,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
            environment: EnvironmentConfig {
                env: "development".to_string(),
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::ConfigError {
                message: "server port must be greater than 0".to_string(),
            });
        }

        if self.editor.export_file_name.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "export_file_name cannot be empty".to_string(),
            });
        }

        if self.editor.max_upload_bytes == 0 {
            return Err(AppError::ConfigError {
                message: "max_upload_bytes must be greater than 0".to_string(),
            });
        }

        if self.websocket.broadcast_buffer_size == 0 {
            return Err(AppError::ConfigError {
                message: "broadcast_buffer_size must be greater than 0".to_string(),
            });
        }

        if self.websocket.max_connections == Some(0) {
            return Err(AppError::ConfigError {
                message: "max_connections must be greater than 0 when set".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
