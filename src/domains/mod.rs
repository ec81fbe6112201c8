pub mod logger;
pub mod map;
pub mod projection;
pub mod simulation;

pub use logger::*;
pub use map::*;
pub use projection::*;
pub use simulation::*;
