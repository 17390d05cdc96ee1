//! Model output

use anyhow::{Context, Result};
use dscs_common::IntermediateModel;
use std::path::{Path, PathBuf};

/// Extension appended to the scene dump's stem when no output path is given
pub const MODEL_EXTENSION: &str = "model.json";

/// `scene.json` -> `scene.model.json`, next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(MODEL_EXTENSION)
}

/// Serialize `model` as pretty-printed JSON
pub fn model_to_json(model: &IntermediateModel) -> Result<String> {
    serde_json::to_string_pretty(model).context("Failed to serialize model")
}

/// Write `model` to `path`, creating parent directories as needed
pub fn write_model(model: &IntermediateModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    let json = model_to_json(model)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write model: {:?}", path))?;
    Ok(())
}
