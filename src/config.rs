//! Runtime settings: an optional TOML file, overridden by command-line flags.
//!
//! ```toml
//! tick_rate_ms = 16
//! max_frame_delta_ms = 100
//! key_hold_ms = 140
//! start_game = "tetris"
//! log_file = "pixelcade.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::{ArcadeError, Result};
use crate::games::GameId;

#[derive(Debug, Parser)]
#[command(name = "pixelcade")]
#[command(about = "Six classic arcade games in the terminal", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Launch straight into a game instead of the menu
    #[arg(short, long, value_enum)]
    pub game: Option<GameId>,

    /// Milliseconds between frames
    #[arg(long)]
    pub tick_rate: Option<u64>,

    /// Write logs here (filtered by RUST_LOG, default info)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArcadeConfig {
    pub tick_rate_ms: u64,
    /// Upper bound on one frame's delta; 0 disables the cap.
    pub max_frame_delta_ms: u64,
    /// How long a key counts as held after a press when the terminal
    /// cannot report releases.
    pub key_hold_ms: u64,
    pub start_game: Option<GameId>,
    /// Logging is off unless a file is given.
    pub log_file: Option<PathBuf>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            max_frame_delta_ms: 100,
            key_hold_ms: 140,
            start_game: None,
            log_file: None,
        }
    }
}

impl ArcadeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ArcadeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ArcadeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File settings (if any) with the flags applied on top.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(game) = cli.game {
            config.start_game = Some(game);
        }
        if let Some(ms) = cli.tick_rate {
            config.tick_rate_ms = ms;
        }
        if let Some(path) = &cli.log_file {
            config.log_file = Some(path.clone());
        }
        config.tick_rate_ms = config.tick_rate_ms.max(1);
        Ok(config)
    }

    pub fn max_frame_delta(&self) -> Option<f32> {
        (self.max_frame_delta_ms > 0).then_some(self.max_frame_delta_ms as f32)
    }

    pub fn key_hold(&self) -> f32 {
        self.key_hold_ms as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn cli(config: Option<PathBuf>) -> Cli {
        Cli {
            config,
            game: None,
            tick_rate: None,
            log_file: None,
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let file = write_config("start_game = \"space-invaders\"\n");
        let config = ArcadeConfig::load(file.path()).unwrap();
        assert_eq!(config.start_game, Some(GameId::SpaceInvaders));
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(config.max_frame_delta(), Some(100.0));
    }

    #[test]
    fn zero_disables_the_delta_cap() {
        let file = write_config("max_frame_delta_ms = 0\nkey_hold_ms = 90\n");
        let config = ArcadeConfig::load(file.path()).unwrap();
        assert_eq!(config.max_frame_delta(), None);
        assert_eq!(config.key_hold(), 90.0);
    }

    #[test]
    fn flags_override_the_file() {
        let file = write_config("tick_rate_ms = 33\nstart_game = \"pong\"\n");
        let mut args = cli(Some(file.path().to_path_buf()));
        args.game = Some(GameId::Memory);
        let config = ArcadeConfig::from_cli(&args).unwrap();
        assert_eq!(config.start_game, Some(GameId::Memory));
        assert_eq!(config.tick_rate_ms, 33);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let file = write_config("tick_rate_ms = \"fast\"\n");
        let err = ArcadeConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ArcadeError::ConfigParse { .. }));
    }

    #[test]
    fn unknown_game_is_rejected() {
        let file = write_config("start_game = \"pacman\"\n");
        assert!(ArcadeConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ArcadeConfig::load(Path::new("/nonexistent/pixelcade.toml")).unwrap_err();
        assert!(matches!(err, ArcadeError::ConfigRead { .. }));
    }

    #[test]
    fn cli_parses_game_slugs() {
        let args = Cli::parse_from(["pixelcade", "--game", "space-invaders", "--tick-rate", "20"]);
        assert_eq!(args.game, Some(GameId::SpaceInvaders));
        assert_eq!(args.tick_rate, Some(20));
    }
}
