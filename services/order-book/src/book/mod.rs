//! Order book infrastructure module
//!
//! Contains the classification axes, the generic classified index, the
//! per-agent index and the state that ties them together.

pub mod axis;
pub mod classified_index;
pub mod agent_index;
pub mod state;

pub use axis::ClassificationAxis;
pub use classified_index::ClassifiedIndex;
pub use agent_index::AgentIndex;
pub use state::{BookState, BookStats};
