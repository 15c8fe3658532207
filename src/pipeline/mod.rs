//! Pipelines.
//!
//! [Deck] is the deck generation pipeline. Its steps live in their own modules
//! so that they can be used on their own, and the module
//! provides a light [pipeline::Pipeline] trait for running pipelines.
pub mod audio;
mod deck;
pub mod join;
pub mod pipeline;

pub use audio::{AudioMaterializer, AudioSource};
pub use deck::{Deck, DeckConfig, Summary};
pub use join::join;
pub use pipeline::Pipeline;
