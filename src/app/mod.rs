//! Application layer with a dependency injection container.
//!
//! ```text
//!   App ──owns──▶ OptionRepository (MsgPack / in-memory)
//!    │
//!    └─creates──▶ GeneticSearch, OptionSet
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use oporto::app::{App, SearchConfig};
//! use oporto::envs::FourRoomsEnv;
//! use oporto::graphs::transition_graph;
//!
//! let app = App::new();
//! let graph = transition_graph(&FourRoomsEnv::new());
//! let mut search = app.create_search(SearchConfig::new(4).with_seed(42), graph)?;
//! let results = search.run()?;
//! println!("best LME {}", results.lme);
//! # Ok::<(), oporto::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::{LearningConfig, SearchConfig};
pub use container::{App, AppBuilder};
