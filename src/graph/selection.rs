use std::collections::BTreeSet;

use super::model::GraphModel;
use super::types::{EdgeKey, NodeKey};

/// The user's currently chosen nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	nodes: BTreeSet<NodeKey>,
	edges: BTreeSet<EdgeKey>,
}

impl Selection {
	/// A selection holding a single node.
	pub fn node(key: NodeKey) -> Self {
		Self {
			nodes: BTreeSet::from([key]),
			edges: BTreeSet::new(),
		}
	}

	/// A selection holding a single edge.
	pub fn edge(key: EdgeKey) -> Self {
		Self {
			nodes: BTreeSet::new(),
			edges: BTreeSet::from([key]),
		}
	}

	/// Build a selection from explicit key sets.
	pub fn from_keys(
		nodes: impl IntoIterator<Item = NodeKey>,
		edges: impl IntoIterator<Item = EdgeKey>,
	) -> Self {
		Self {
			nodes: nodes.into_iter().collect(),
			edges: edges.into_iter().collect(),
		}
	}

	/// Selected node keys.
	pub fn nodes(&self) -> &BTreeSet<NodeKey> {
		&self.nodes
	}

	/// Selected edge keys.
	pub fn edges(&self) -> &BTreeSet<EdgeKey> {
		&self.edges
	}

	/// Whether nothing is selected.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}

	/// Whether `key` is a selected node.
	pub fn contains_node(&self, key: &NodeKey) -> bool {
		self.nodes.contains(key)
	}

	/// Whether `key` is a selected edge.
	pub fn contains_edge(&self, key: &EdgeKey) -> bool {
		self.edges.contains(key)
	}

	/// The selected edge, when exactly one edge and no node is selected.
	pub fn single_edge(&self) -> Option<&EdgeKey> {
		match (self.nodes.len(), self.edges.len()) {
			(0, 1) => self.edges.iter().next(),
			_ => None,
		}
	}

	/// Add `key` if absent, remove it otherwise.
	pub fn toggle_node(&mut self, key: NodeKey) {
		if !self.nodes.remove(&key) {
			self.nodes.insert(key);
		}
	}

	/// Add `key` if absent, remove it otherwise.
	pub fn toggle_edge(&mut self, key: EdgeKey) {
		if !self.edges.remove(&key) {
			self.edges.insert(key);
		}
	}

	/// Forget keys that no longer resolve in `graph`.
	pub fn retain_existing(&mut self, graph: &GraphModel) {
		self.nodes.retain(|key| graph.contains_node(key));
		self.edges.retain(|key| graph.edge_index(key).is_some());
	}

	/// Empty the selection.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
	}
}
