pub mod agents;
pub mod alert;
pub mod sampler;
pub mod state;
pub mod step;

pub use agents::*;
pub use alert::*;
pub use sampler::*;
pub use state::*;
pub use step::*;
