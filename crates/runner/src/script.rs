use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One scripted key change, applied after frame `frame` is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStep {
    pub frame: u64,
    pub scancode: u8,
    #[serde(default = "pressed_by_default")]
    pub pressed: bool,
}

fn pressed_by_default() -> bool {
    true
}

pub fn parse(text: &str) -> Result<Vec<KeyStep>> {
    serde_json::from_str(text).context("Failed to parse key script")
}

pub fn load(path: &Path) -> Result<Vec<KeyStep>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read key script {}", path.display()))?;
    parse(&text)
}
