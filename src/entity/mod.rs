pub mod online;
pub mod player;
pub mod stat;
pub mod xp;

pub use stat::StatType;
