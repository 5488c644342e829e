//! Error types for the oporto crate

use thiserror::Error;

/// Main error type for the oporto crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("location ({x}, {y}) is not a valid cell (wall or out of bounds)")]
    InvalidLocation { x: i32, y: i32 },

    #[error("start and goal must differ, both are ({x}, {y})")]
    TrivialTask { x: i32, y: i32 },

    #[error("action index {index} is out of range (expected 0-8)")]
    InvalidAction { index: usize },

    #[error("environment has no task; call reset() or set_task() first")]
    NoTask,

    #[error("episode is over; call reset() before stepping again")]
    EpisodeOver,

    #[error("vertex {vertex} is out of range for a graph with {size} vertices")]
    VertexOutOfRange { vertex: usize, size: usize },

    #[error("graph has no vertices")]
    EmptyGraph,

    #[error("graph has no edges to sample")]
    NoEdges,

    #[error("vertex {vertex} has no neighbors")]
    IsolatedVertex { vertex: usize },

    #[error("graph is not connected; a spanning tree does not exist")]
    DisconnectedGraph,

    #[error("{requested} is an invalid number of components for a graph with {size} vertices")]
    InvalidComponentCount { requested: usize, size: usize },

    #[error("decomposition into {expected} components produced {got}")]
    ComponentCountMismatch { expected: usize, got: usize },

    #[error("{labels} region labels given for a graph with {size} vertices")]
    LabelCountMismatch { labels: usize, size: usize },

    #[error("vertex {vertex} at ({x}, {y}) did not receive a region label")]
    UnlabeledVertex { vertex: usize, x: i32, y: i32 },

    #[error("region {region} does not exist (only {count} regions)")]
    UnknownRegion { region: usize, count: usize },

    #[error("no path from vertex {start} to goal vertex {goal}")]
    Unreachable { start: usize, goal: usize },

    #[error("path is empty")]
    EmptyPath,

    #[error("path step {from} -> {to} is not an edge of the state graph")]
    InvalidPathStep { from: usize, to: usize },

    #[error("behavior dataset is empty")]
    EmptyBehaviors,

    #[error("encoding has {got} genes but the state graph requires {expected}")]
    EncodingLength { expected: usize, got: usize },

    #[error("gene {index} has value {value} (genes must be 0 or 1)")]
    InvalidGene { index: usize, value: u8 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid coordinate '{input}' (expected 'x,y')")]
    ParseCoordinate { input: String },

    #[error("invalid feature set '{input}'. Expected one of: {expected}")]
    ParseFeatureSet { input: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
