pub mod catalogue;
pub mod playlist;

pub use catalogue::*;
pub use playlist::*;
