pub mod challenge;
pub mod config;
pub mod game;
pub mod id_generator;
pub mod identifiers;
pub mod logger;
pub mod provider;
pub mod rng;
pub mod score;

pub use identifiers::*;
pub use rng::SessionRng;
