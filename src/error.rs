use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid of {columns}x{rows} with top margin {top_margin} leaves no room for food")]
    GridTooSmall {
        columns: i32,
        rows: i32,
        top_margin: i32,
    },

    #[error("the arena holds 1 to 3 players, got {0}")]
    PlayerCount(usize),

    #[error("difficulty must be at least 1")]
    ZeroDifficulty,

    #[error("winning score must be at least 1")]
    ZeroWinningScore,

    #[error("cell width must be at least 1")]
    ZeroCellWidth,

    #[error("{columns} columns of width {cell_width} do not fit a terminal row")]
    ArenaTooWide { columns: u16, cell_width: u16 },

    #[error("player must be NAME=SCHEME, got `{0}`")]
    MalformedPlayer(String),

    #[error("unknown control scheme `{0}` (expected direct-set-A, direct-set-B or autonomous)")]
    UnknownScheme(String),

    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
