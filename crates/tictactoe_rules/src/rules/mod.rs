//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Cleared positions read as
//! empty, so a line through a cleared cell never counts.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{check_winner, winning_line};
