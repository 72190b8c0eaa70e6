//! The bot: difficulty tiers, the pure move evaluator and the agent wrapper
//! the game controller drives.

mod agent;
mod difficulty;
pub mod evaluator;

pub use agent::{Agent, BotAgent};
pub use difficulty::Difficulty;
pub use evaluator::choose_move;
