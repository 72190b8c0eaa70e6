use std::path::PathBuf;

use crate::game::PlayerMark;

/// Errors from applying a move to a board or controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} does not exist")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("player mark {0:?} cannot occupy a cell")]
    UnsupportedPlayerMark(PlayerMark),

    #[error("cell at column {column}, row {row} is already occupied")]
    CellOccupied { column: usize, row: usize },

    #[error("the game is over")]
    GameOver,

    #[error("it is not the local player's turn")]
    NotYourTurn,
}

/// Errors from parsing a text board fixture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("board text has no cells")]
    Empty,

    #[error("row {row} does not have {expected} columns")]
    Ragged { row: usize, expected: usize },

    #[error("unknown symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// Errors from the move exchange with a remote peer.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed move byte 0x{0:02x} from peer")]
    Malformed(u8),

    #[error("column {0} cannot be encoded as a single digit")]
    ColumnOutOfRange(usize),

    #[error("peer closed the connection")]
    Disconnected,

    #[error("no connection established")]
    NotConnected,
}

/// Errors from driving a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("illegal move: {0}")]
    Move(#[from] MoveError),

    #[error("connection failure: {0}")]
    Network(#[from] NetworkError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors from reading or writing the persisted settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("difficulty {0} is not a tier (expected 0-3)")]
    InvalidDifficulty(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(MoveError::ColumnFull(3).to_string(), "column 3 is full");
        assert_eq!(
            MoveError::UnsupportedPlayerMark(PlayerMark::Empty).to_string(),
            "player mark Empty cannot occupy a cell"
        );
    }

    #[test]
    fn test_network_error_display() {
        assert_eq!(
            NetworkError::Malformed(b'x').to_string(),
            "malformed move byte 0x78 from peer"
        );
        let err = GameError::from(NetworkError::Disconnected);
        assert_eq!(err.to_string(), "connection failure: peer closed the connection");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("network.port must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: network.port must be > 0"
        );
    }

    #[test]
    fn test_settings_error_display() {
        assert_eq!(
            SettingsError::InvalidDifficulty(7).to_string(),
            "difficulty 7 is not a tier (expected 0-3)"
        );
    }
}
