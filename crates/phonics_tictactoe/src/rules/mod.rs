//! Game rules for phonics tic-tac-toe.
//!
//! Pure functions over board snapshots. Rules are kept apart from round
//! state so the same detector serves real scoring and hypothetical
//! block checks.

pub mod block;
pub mod win;

pub use block::blocked_opponents;
pub use win::{find_lines, new_lines, new_lines_through};
