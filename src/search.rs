//! Genetic search for the option set with the highest model evidence
//!
//! Candidate agents are encoded as bit strings over the directed edges of the
//! state graph. A bit is set when the edge stays inside one region, so the
//! regions of a genome are the connected components of its set edges.

pub mod encoding;
pub mod fitness;
pub mod genetic;
pub mod results;

pub use encoding::{decode_agent, encode_agent};
pub use fitness::FitnessEvaluator;
pub use genetic::{GenerationStats, GeneticSearch};
pub use results::{SearchResults, find_results};
