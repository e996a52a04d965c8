use std::any::Any;

use chrono::Duration;
use datagrid_states::{State, state_assign_impl};
use serde::Deserialize;

use crate::grid::{FACET_CAP, LoadingMode};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("record count must be greater than zero")]
    EmptyDataset,
    #[error("page size {size} is not one of {choices:?}")]
    PageSizeNotOffered { size: usize, choices: Vec<usize> },
    #[error("debounce delay {0} ms is out of range (0..=10000)")]
    DebounceOutOfRange(i64),
}

/// Presentation settings shared by the grid widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub page_size: usize,
    pub page_size_choices: Vec<usize>,
    pub debounce: Duration,
    pub facet_cap: usize,
    pub loading_mode: LoadingMode,
    pub empty_message: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            page_size_choices: vec![10, 25, 50, 100],
            debounce: Duration::milliseconds(500),
            facet_cap: FACET_CAP,
            loading_mode: LoadingMode::Skeleton,
            empty_message: String::from("No data available"),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_size_choices.contains(&self.page_size) {
            return Err(ConfigError::PageSizeNotOffered {
                size: self.page_size,
                choices: self.page_size_choices.clone(),
            });
        }
        let millis = self.debounce.num_milliseconds();
        if !(0..=10_000).contains(&millis) {
            return Err(ConfigError::DebounceOutOfRange(millis));
        }
        Ok(())
    }
}

impl State for GridConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Mock dataset settings of the demo page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub record_count: usize,
    pub load_delay: Duration,
    /// Fixed seed for reproducible data. Random when absent.
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            record_count: 20_000,
            load_delay: Duration::milliseconds(4300),
            seed: None,
        }
    }
}

/// `DATAGRID_*` environment variables.
#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    #[serde(default)]
    datagrid: RawDemoConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDemoConfig {
    record_count: Option<usize>,
    load_delay_ms: Option<u64>,
    seed: Option<u64>,
}

impl DemoConfig {
    /// Reads `DATAGRID_RECORD_COUNT`, `DATAGRID_LOAD_DELAY_MS` and `DATAGRID_SEED`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, S>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawEnv = serde_env::from_iter(vars)?;
        let defaults = Self::default();
        let config = Self {
            record_count: raw.datagrid.record_count.unwrap_or(defaults.record_count),
            load_delay: raw
                .datagrid
                .load_delay_ms
                .and_then(|ms| i64::try_from(ms).ok())
                .map(Duration::milliseconds)
                .unwrap_or(defaults.load_delay),
            seed: raw.datagrid.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Environment on native builds, defaults in the browser or when the environment is invalid.
    pub fn load() -> Self {
        if cfg!(target_arch = "wasm32") {
            return Self::default();
        }
        match Self::from_env() {
            Ok(config) => {
                log::info!(
                    "demo config: {} records, {} ms load delay",
                    config.record_count,
                    config.load_delay.num_milliseconds()
                );
                config
            }
            Err(err) => {
                log::warn!("invalid demo config, using defaults: {err}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_count == 0 {
            return Err(ConfigError::EmptyDataset);
        }
        Ok(())
    }
}

impl State for DemoConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
