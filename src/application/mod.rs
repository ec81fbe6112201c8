pub mod evacuation_service;

pub use evacuation_service::*;
