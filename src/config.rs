use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::control::ControlScheme;
use crate::error::ConfigError;
use crate::sim::MAX_PLAYERS;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub control: ControlScheme,
}

impl PlayerConfig {
    pub fn new(name: impl Into<String>, control: ControlScheme) -> Self {
        Self {
            name: name.into(),
            control,
        }
    }

    /// Parses `NAME=SCHEME`, e.g. `Ada=direct-set-B`.
    pub fn parse(arg: &str) -> Result<Self, ConfigError> {
        let (name, scheme) = arg
            .rsplit_once('=')
            .filter(|(name, _)| !name.trim().is_empty())
            .ok_or_else(|| ConfigError::MalformedPlayer(arg.to_string()))?;
        let control = <ControlScheme as clap::ValueEnum>::from_str(scheme.trim(), true)
            .map_err(|_| ConfigError::UnknownScheme(scheme.trim().to_string()))?;
        Ok(Self::new(name.trim(), control))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub players: Vec<PlayerConfig>,
    /// Upper bound (exclusive) of the computer player's re-decision interval.
    pub difficulty: u32,
    pub winning_score: u32,
    pub harmful_food: bool,
    /// Arena width in cells; taken from the terminal when unset.
    pub columns: Option<u16>,
    pub rows: Option<u16>,
    pub top_margin: u16,
    /// Terminal columns per grid cell.
    pub cell_width: u16,
    pub tick_ms: u64,
    pub sound: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: vec![
                PlayerConfig::new("Player 1", ControlScheme::DirectSetA),
                PlayerConfig::new("Player 2", ControlScheme::DirectSetB),
                PlayerConfig::new("Computer", ControlScheme::Autonomous),
            ],
            difficulty: 8,
            winning_score: 10,
            harmful_food: false,
            columns: None,
            rows: None,
            top_margin: 2,
            cell_width: 2,
            tick_ms: 200,
            sound: true,
        }
    }
}

impl GameConfig {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() || self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        if self.winning_score == 0 {
            return Err(ConfigError::ZeroWinningScore);
        }
        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }
        if let Some(columns) = self.columns {
            if u32::from(columns) * u32::from(self.cell_width) > u32::from(u16::MAX) {
                return Err(ConfigError::ArenaTooWide {
                    columns,
                    cell_width: self.cell_width,
                });
            }
        }
        Ok(())
    }

    /// Applies command line overrides on top of this config.
    pub fn merge(mut self, args: &CliArgs) -> Self {
        if !args.players.is_empty() {
            self.players = args.players.clone();
        }
        if let Some(difficulty) = args.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(winning_score) = args.winning_score {
            self.winning_score = winning_score;
        }
        if args.harmful_food {
            self.harmful_food = true;
        }
        if args.columns.is_some() {
            self.columns = args.columns;
        }
        if args.rows.is_some() {
            self.rows = args.rows;
        }
        if let Some(top_margin) = args.top_margin {
            self.top_margin = top_margin;
        }
        if let Some(cell_width) = args.cell_width {
            self.cell_width = cell_width;
        }
        if let Some(tick_ms) = args.tick_ms {
            self.tick_ms = tick_ms;
        }
        if args.no_sound {
            self.sound = false;
        }
        self
    }
}

fn parse_player(arg: &str) -> Result<PlayerConfig, String> {
    PlayerConfig::parse(arg).map_err(|e| e.to_string())
}

#[derive(Debug, Parser)]
#[command(name = "snek-arena", version, about = "Up to three snakes race for food in your terminal")]
pub struct CliArgs {
    /// YAML file with game settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Player as NAME=SCHEME (direct-set-A, direct-set-B, autonomous); repeat up to 3 times
    #[arg(long = "player", value_parser = parse_player)]
    pub players: Vec<PlayerConfig>,

    /// Computer player re-decides at most every N ticks
    #[arg(long)]
    pub difficulty: Option<u32>,

    #[arg(long)]
    pub winning_score: Option<u32>,

    /// Mix in harmful food that costs a point and a segment
    #[arg(long)]
    pub harmful_food: bool,

    #[arg(long)]
    pub columns: Option<u16>,

    #[arg(long)]
    pub rows: Option<u16>,

    #[arg(long)]
    pub top_margin: Option<u16>,

    #[arg(long)]
    pub cell_width: Option<u16>,

    /// Milliseconds between simulation ticks
    #[arg(long)]
    pub tick_ms: Option<u64>,

    #[arg(long)]
    pub no_sound: bool,

    /// Where to write logs; defaults to snek-arena.log in the temp directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Defaults, then the config file if one was given, then flags.
    pub fn resolve(&self) -> Result<GameConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        let config = base.merge(self);
        config.validate()?;
        Ok(config)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("snek-arena.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_arena() {
        let config = GameConfig::default();
        assert_eq!(config.players.len(), 3);
        assert_eq!(config.players[2].control, ControlScheme::Autonomous);
        assert_eq!(config.winning_score, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let yaml = "
players:
  - name: Ada
    control: autonomous
  - name: Bo
    control: direct-set-B
winning_score: 5
harmful_food: true
";
        let config = GameConfig::from_yaml(yaml, Path::new("arena.yaml")).unwrap();
        assert_eq!(
            config.players,
            vec![
                PlayerConfig::new("Ada", ControlScheme::Autonomous),
                PlayerConfig::new("Bo", ControlScheme::DirectSetB),
            ]
        );
        assert_eq!(config.winning_score, 5);
        assert!(config.harmful_food);
        assert_eq!(config.difficulty, 8);
        assert_eq!(config.tick_ms, 200);
    }

    #[test]
    fn yaml_rejects_unknown_scheme() {
        let yaml = "players:\n  - name: Ada\n    control: joystick\n";
        assert!(matches!(
            GameConfig::from_yaml(yaml, Path::new("arena.yaml")),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn player_argument_parsing() {
        assert_eq!(
            PlayerConfig::parse("Ada=direct-set-A").unwrap(),
            PlayerConfig::new("Ada", ControlScheme::DirectSetA)
        );
        assert_eq!(
            PlayerConfig::parse("Mr = X=autonomous").unwrap(),
            PlayerConfig::new("Mr = X", ControlScheme::Autonomous)
        );
        assert!(matches!(
            PlayerConfig::parse("=autonomous"),
            Err(ConfigError::MalformedPlayer(_))
        ));
        assert!(matches!(
            PlayerConfig::parse("Ada"),
            Err(ConfigError::MalformedPlayer(_))
        ));
        assert!(matches!(
            PlayerConfig::parse("Ada=gamepad"),
            Err(ConfigError::UnknownScheme(_))
        ));
    }

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "snek-arena",
            "--player",
            "Ada=autonomous",
            "--difficulty",
            "3",
            "--harmful-food",
            "--no-sound",
            "--columns",
            "30",
        ])
        .unwrap();
        let config = args.resolve().unwrap();
        assert_eq!(config.players, vec![PlayerConfig::new("Ada", ControlScheme::Autonomous)]);
        assert_eq!(config.difficulty, 3);
        assert!(config.harmful_food);
        assert!(!config.sound);
        assert_eq!(config.columns, Some(30));
        assert_eq!(config.rows, None);
    }

    #[test]
    fn resolve_validates() {
        let args = CliArgs::try_parse_from(["snek-arena", "--winning-score", "0"]).unwrap();
        assert!(matches!(args.resolve(), Err(ConfigError::ZeroWinningScore)));

        let args = CliArgs::try_parse_from([
            "snek-arena",
            "--player",
            "a=autonomous",
            "--player",
            "b=autonomous",
            "--player",
            "c=autonomous",
            "--player",
            "d=autonomous",
        ])
        .unwrap();
        assert!(matches!(args.resolve(), Err(ConfigError::PlayerCount(4))));
    }

    #[test]
    fn arena_must_fit_terminal_coordinates() {
        let args = CliArgs::try_parse_from([
            "snek-arena",
            "--columns",
            "1000",
            "--cell-width",
            "100",
        ])
        .unwrap();
        assert!(matches!(
            args.resolve(),
            Err(ConfigError::ArenaTooWide {
                columns: 1000,
                cell_width: 100
            })
        ));

        let config = GameConfig {
            columns: Some(u16::MAX / 2),
            cell_width: 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_file_reports_path() {
        let err = GameConfig::load(Path::new("/nonexistent/arena.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/arena.yaml"));
    }
}
