// src/config/advisory.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_ADVISORY_CONFIG_PATH: &str = "config/advisory.json";

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_daily_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    /// "gemini" (case-insensitive)
    pub provider: String,
    /// Model id passed to the provider. Defaults to gemini-2.5-flash.
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-day real-call limit; cache hits are free.
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    /// "ENV" means: read from GEMINI_API_KEY
    pub api_key: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "gemini".to_string(),
            model: default_model(),
            daily_limit: default_daily_limit(),
            api_key: String::new(),
        }
    }
}

impl AdvisoryConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AdvisoryConfig = serde_json::from_str(&data)?;

        // Normalize provider
        cfg.provider = cfg.provider.to_lowercase();

        if cfg.model.trim().is_empty() {
            cfg.model = default_model();
        }

        // Resolve api key if "ENV". Only when enabled: a disabled config
        // must load cleanly on machines without the key.
        if cfg.enabled && cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "gemini" => env::var("GEMINI_API_KEY")
                    .map_err(|_| anyhow::anyhow!("Missing GEMINI_API_KEY env var"))?,
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        Ok(cfg)
    }

    /// Load, falling back to the disabled default when the file is absent
    /// or invalid. The key-resolution error is the one worth logging: an
    /// enabled config with a missing env key silently degrades otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "advisory config unavailable, advisory disabled");
                Self::default()
            }
        }
    }
}
