//! In-memory directed graph and the editing operations behind the canvas.
//!
//! Nothing in here touches the DOM: the view turns pointer and keyboard input
//! into [`GraphEvent`]s and [`EditorState::apply`] does the rest.

mod data;
mod editor;
mod error;
mod model;
mod selection;
mod types;

pub use data::{GraphData, generate_sample, sample_graph};
pub use editor::{EditorState, GraphEvent};
pub use error::GraphDataError;
pub use model::{DeletedNode, GraphModel};
pub use selection::Selection;
pub use types::{Edge, EdgeKey, EdgeType, Node, NodeKey, NodeSubtype, NodeType, Point};
