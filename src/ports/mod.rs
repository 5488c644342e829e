//! Ports (trait boundaries) for external dependencies.
//!
//! These traits are owned by the domain and implemented by adapters: learners
//! and observers plug into the training pipeline, repositories store learned
//! options.

pub mod learner;
pub mod observer;
pub mod repository;

pub use learner::Learner;
pub use observer::Observer;
pub use repository::OptionRepository;
