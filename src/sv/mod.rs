pub mod players;
pub mod stats;

pub use players::Players;
pub use stats::{Recorded, Stats};
