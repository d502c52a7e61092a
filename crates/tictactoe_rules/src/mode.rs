//! Classic and Endless rule variants.

use serde::{Deserialize, Serialize};

/// Rule variant for a game.
///
/// Stored in the `games.game_mode` column as `CLASSIC` or `ENDLESS`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum GameMode {
    /// Ends on a line or a full board (draw).
    #[default]
    Classic,
    /// Ends only on a line; a full board is partially cleared instead.
    Endless,
}

impl GameMode {
    /// Whether a full board without a winner ends the game as a draw.
    pub fn full_board_is_draw(self) -> bool {
        matches!(self, GameMode::Classic)
    }
}
