// Lantern is an open source web search engine.
// Copyright (C) 2026 Lantern contributors

use std::collections::HashMap;
use std::path::Path;

use crate::ranking::signals::SignalEnum;
use crate::ranking::SignalCoefficients;
use crate::Result;

mod defaults {
    pub fn default_num_results() -> usize {
        20
    }

    pub fn max_num_results() -> usize {
        100
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearcherConfig {
    #[serde(default = "defaults::default_num_results")]
    pub default_num_results: usize,

    #[serde(default = "defaults::max_num_results")]
    pub max_num_results: usize,

    /// Deployment-level coefficient overrides, keyed by signal name.
    /// Applied before any per-request optic, so optics still win.
    #[serde(default)]
    pub signal_coefficients: HashMap<String, f64>,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            default_num_results: defaults::default_num_results(),
            max_num_results: defaults::max_num_results(),
            signal_coefficients: HashMap::new(),
        }
    }
}

impl SearcherConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// Unknown signal names are skipped with a warning; a stale config
    /// entry must not take down the searcher.
    pub fn base_coefficients(&self) -> SignalCoefficients {
        let mut coefficients = SignalCoefficients::default();

        for (name, value) in &self.signal_coefficients {
            match SignalEnum::from_name(name) {
                Some(signal) => coefficients.insert(signal, *value),
                None => tracing::warn!(%name, "ignoring coefficient for unknown signal"),
            }
        }

        coefficients
    }
}
