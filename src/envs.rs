//! Gridworld environments
//!
//! The Four Rooms domain (Sutton, Precup & Singh, 1999) in the adapted form of
//! Botvinick, Niv & Barto (2009), plus text rendering and the hand-made
//! example decomposition used to check model evidence computations.

pub mod example_regions;
pub mod four_rooms;
pub mod render;

pub use example_regions::example_regions;
pub use four_rooms::{FourRoomsEnv, Observation, StepResult};
pub use render::GridRenderer;
