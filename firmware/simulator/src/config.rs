//! Simulator settings.
//!
//! Built-in defaults, overridden by `BOARD_*` environment variables. Nested
//! board settings use a double underscore, e.g. `BOARD_BOARD__TITLE=Zoo`
//! or `BOARD_BOARD__FONT_FACE=builtin`.

use std::path::PathBuf;
use std::time::Duration;

use board_common::BoardConfig;
use board_common::config::DEFAULT_REFRESH_INTERVAL;
use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};

/// Environment variable prefix.
const ENV_PREFIX: &str = "BOARD_";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub board: BoardConfig,
    /// Window pixels per display pixel.
    pub scale: u32,
    pub refresh_interval_secs: u64,
    /// Raw big-endian RGB565 frame strip for the connectivity icon.
    pub icon_strip: Option<PathBuf>,
    pub icon_frame_width: u32,
    /// Every n-th demo refresh fails (0 = never).
    pub demo_outage_every: u32,
    /// Frames between metrics log lines (0 = never).
    pub metrics_every: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            scale: 1,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            icon_strip: None,
            icon_frame_width: 20,
            demo_outage_every: 5,
            metrics_every: 50,
        }
    }
}

impl SimulatorConfig {
    /// Defaults merged with the environment.
    pub fn load() -> Result<Self, figment::Error> { Self::figment().extract() }

    /// Provider chain behind [`SimulatorConfig::load`]: serialized defaults,
    /// then `BOARD_*` variables split on `__`.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn refresh_interval(&self) -> Duration { Duration::from_secs(self.refresh_interval_secs.max(1)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        figment::Jail::expect_with(|_| {
            let config = SimulatorConfig::load()?;
            assert_eq!(config, SimulatorConfig::default());
            assert_eq!(config.refresh_interval(), Duration::from_secs(15));
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BOARD_SCALE", 2);
            jail.set_env("BOARD_BOARD__TITLE", "Zoo");
            jail.set_env("BOARD_BOARD__TEST_MODE", true);
            let config = SimulatorConfig::load()?;
            assert_eq!(config.scale, 2);
            assert_eq!(config.board.title, "Zoo");
            assert!(config.board.test_mode);
            assert_eq!(config.board.display_width, 800);
            Ok(())
        });
    }

    #[test]
    fn test_figment_reads_single_field() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BOARD_ICON_FRAME_WIDTH", 32);
            let width: u32 = SimulatorConfig::figment().extract_inner("icon_frame_width")?;
            assert_eq!(width, 32);
            Ok(())
        });
    }
}
