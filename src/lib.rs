//! Pedestrian evacuation simulation over building footprints taken from an
//! OpenStreetMap extract. People spawn at building exit doors, take random
//! steps that never bring two of them closer than twice the person radius,
//! and bias their heading while a tsunami alert is active.

pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use application::{EvacuationService, PersonView};
pub use config::Config;

pub use common::*;
pub use domains::*;
