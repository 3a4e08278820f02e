use thiserror::Error;

use super::types::NodeKey;

/// Failure to turn a graph description into a [`GraphModel`](super::GraphModel).
#[derive(Error, Debug)]
pub enum GraphDataError {
	/// The description is not valid JSON or does not have the expected shape.
	#[error("malformed graph description: {0}")]
	Parse(#[from] serde_json::Error),

	/// Two nodes share an identity key.
	#[error("duplicate node key `{0}`")]
	DuplicateNodeKey(NodeKey),
}
