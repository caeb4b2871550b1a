use crate::factory::FactoryParams;
use crate::io::read_json_file;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct FilamentToolConfig {
    /// JSON array of sheets, each `{ "scale": .., "sections": [..] }`.
    pub input: PathBuf,
    #[serde(default)]
    pub params: FactoryParams,
    pub output: FilamentOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct FilamentOutputConfig {
    pub report_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<FilamentToolConfig, String> {
    read_json_file(path).map_err(|e| format!("Config: {e}"))
}
