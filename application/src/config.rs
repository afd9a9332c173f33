use domain::definition::UnsetLayerEncoding;

use crate::infrastructure_config::EditorConfig;

/// Runtime knobs the editor service reads on every call.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub unset_layers: UnsetLayerEncoding,
    pub export_file_name: String,
    pub max_upload_bytes: usize,
}

impl From<&EditorConfig> for EditorSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            unset_layers: config.unset_layers,
            export_file_name: config.export_file_name.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}
