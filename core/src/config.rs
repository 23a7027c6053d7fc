//! config.rs
//! Registry configuration: fallback policy, codec levels, frame checksums.
//!
//! Loaded from JSON or built in code; every field has a default so a partial
//! document is valid.

use serde::{Deserialize, Serialize};

use crate::backend::BackendId;
use crate::constants::{
    DEFAULT_LEVEL_DEFLATE, DEFAULT_LEVEL_ZSTD, DEFAULT_LGWIN_BROTLI, DEFAULT_QUALITY_BROTLI,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fallback backend {0} is not built-in")]
    FallbackNotBuiltin(BackendId),

    #[error("{codec} level {have} out of range {min}..={max}")]
    LevelOutOfRange { codec: &'static str, have: i64, min: i64, max: i64 },
}

/// Per-codec tuning. Codecs without a knob (store, lz4) are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecLevels {
    pub zstd: i32,
    pub deflate: u32,
    pub gzip: u32,
    pub brotli_quality: u32,
    pub brotli_lgwin: u32,
}

impl Default for CodecLevels {
    fn default() -> Self {
        Self {
            zstd: DEFAULT_LEVEL_ZSTD,
            deflate: DEFAULT_LEVEL_DEFLATE,
            gzip: DEFAULT_LEVEL_DEFLATE,
            brotli_quality: DEFAULT_QUALITY_BROTLI,
            brotli_lgwin: DEFAULT_LGWIN_BROTLI,
        }
    }
}

impl CodecLevels {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("zstd", self.zstd as i64, 1, 22)?;
        check_range("deflate", self.deflate as i64, 0, 9)?;
        check_range("gzip", self.gzip as i64, 0, 9)?;
        check_range("brotli_quality", self.brotli_quality as i64, 0, 11)?;
        check_range("brotli_lgwin", self.brotli_lgwin as i64, 10, 24)?;
        Ok(())
    }
}

fn check_range(codec: &'static str, have: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if have < min || have > max {
        return Err(ConfigError::LevelOutOfRange { codec, have, min, max });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Built-in used when auto resolution finds no optional backend.
    /// `None` makes auto resolution fail with `NoBackendAvailable`.
    pub fallback: Option<BackendId>,
    pub levels: CodecLevels,
    /// Append a CRC32 of the plaintext to framed payloads.
    pub checksum: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fallback: Some(BackendId::Deflate),
            levels: CodecLevels::default(),
            checksum: true,
        }
    }
}

impl RegistryConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: RegistryConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = self.fallback {
            if !id.is_builtin() {
                return Err(ConfigError::FallbackNotBuiltin(id));
            }
        }
        self.levels.validate()
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback = None;
        self
    }

    pub fn with_fallback(mut self, id: BackendId) -> Self {
        self.fallback = Some(id);
        self
    }
}
