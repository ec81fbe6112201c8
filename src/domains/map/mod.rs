pub mod exit_door;
pub mod footprint;
pub mod ports;
pub mod records;

pub use exit_door::*;
pub use footprint::*;
pub use ports::*;
pub use records::*;
