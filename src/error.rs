//! Error taxonomy, one `thiserror` enum per subsystem, matching the
//! teacher's `engine/errors.rs` convention of a dedicated error type per
//! concern rather than one catch-all.

use thiserror::Error;

use crate::tile::Tile;

#[derive(Error, Debug)]
pub enum HandError {
    #[error("tile {0} is not present in the closed hand")]
    TileNotInHand(Tile),

    #[error("no triplet meld of {0} exists to upgrade to a quad")]
    NoTripletToUpgrade(Tile),
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("hand has {0} tiles; decomposition requires 13 or 14")]
    WrongHandSize(usize),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
