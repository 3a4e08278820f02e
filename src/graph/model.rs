use std::collections::HashMap;

use log::debug;

use super::selection::Selection;
use super::types::{Edge, EdgeKey, EdgeType, Node, NodeKey, NodeType, Point};

/// A node removed from the graph together with the edges that went with it.
#[derive(Clone, Debug, PartialEq)]
pub struct DeletedNode {
	/// The removed node.
	pub node: Node,
	/// Incident edges removed by the cascade, in their original order.
	pub edges: Vec<Edge>,
}

/// Mutable collection of nodes and edges with the editing operations the
/// graph view needs.
///
/// Lookups are linear scans over the ordered node and edge lists. Operations
/// that reference something absent, or would break an invariant, leave the
/// graph untouched and report it through their return value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	next_id: u64,
}

impl GraphModel {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Assemble a graph from lists that already satisfy the key and endpoint
	/// invariants.
	pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		Self {
			nodes,
			edges,
			next_id: 0,
		}
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Look up a node by key.
	pub fn node(&self, key: &NodeKey) -> Option<&Node> {
		self.nodes.iter().find(|node| &node.key == key)
	}

	/// Position of the node with `key` in [`nodes`](Self::nodes).
	pub fn node_index(&self, key: &NodeKey) -> Option<usize> {
		self.nodes.iter().position(|node| &node.key == key)
	}

	/// Position of the first edge matching `key` in [`edges`](Self::edges).
	pub fn edge_index(&self, key: &EdgeKey) -> Option<usize> {
		self.edges.iter().position(|edge| edge.matches(key))
	}

	/// Whether a node with `key` exists.
	pub fn contains_node(&self, key: &NodeKey) -> bool {
		self.node_index(key).is_some()
	}

	/// Append an untitled node at `at` and return its generated key.
	pub fn insert_node(&mut self, at: Point, node_type: NodeType) -> NodeKey {
		let key = self.fresh_key(None);
		self.nodes.push(Node {
			key: key.clone(),
			title: String::new(),
			node_type,
			subtype: None,
			x: at.x,
			y: at.y,
		});
		debug!("inserted node {key} at ({}, {})", at.x, at.y);
		key
	}

	/// Put a special "Node A" at the origin, ahead of every other node.
	pub fn insert_start_node(&mut self) -> NodeKey {
		let key = self.fresh_key(None);
		self.nodes.insert(
			0,
			Node {
				key: key.clone(),
				title: "Node A".into(),
				node_type: NodeType::Special,
				subtype: None,
				x: 0.0,
				y: 0.0,
			},
		);
		key
	}

	/// Delete the first node, cascading to its edges.
	pub fn remove_start_node(&mut self) -> Option<DeletedNode> {
		let key = self.nodes.first()?.key.clone();
		self.delete_node(&key)
	}

	/// Move a node, typically after it was dragged. Returns `false` when the
	/// key is unknown.
	pub fn update_node(&mut self, key: &NodeKey, at: Point) -> bool {
		match self.nodes.iter_mut().find(|node| &node.key == key) {
			Some(node) => {
				node.x = at.x;
				node.y = at.y;
				true
			}
			None => false,
		}
	}

	/// Remove a node and every edge that starts or ends at it.
	pub fn delete_node(&mut self, key: &NodeKey) -> Option<DeletedNode> {
		let idx = self.node_index(key)?;
		let node = self.nodes.remove(idx);
		let (removed, kept): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut self.edges)
			.into_iter()
			.partition(|edge| edge.touches(key));
		self.edges = kept;
		debug!("deleted node {key} and {} incident edges", removed.len());
		Some(DeletedNode {
			node,
			edges: removed,
		})
	}

	/// Append an edge from `source` to `target`.
	///
	/// Self-loops and edges to unknown nodes are declined. Parallel edges
	/// between the same pair are allowed.
	pub fn insert_edge(
		&mut self,
		source: &NodeKey,
		target: &NodeKey,
		edge_type: EdgeType,
	) -> Option<EdgeKey> {
		if !self.valid_endpoints(source, target) {
			debug!("declined edge {source}_{target}");
			return None;
		}
		let edge = Edge {
			source: source.clone(),
			target: target.clone(),
			edge_type,
		};
		let key = edge.key();
		self.edges.push(edge);
		Some(key)
	}

	/// Point the edge identified by `old` at new endpoints, keeping its
	/// position and type. Returns the edge's new key.
	pub fn retarget_edge(
		&mut self,
		old: &EdgeKey,
		source: &NodeKey,
		target: &NodeKey,
	) -> Option<EdgeKey> {
		if !self.valid_endpoints(source, target) {
			return None;
		}
		let idx = self.edge_index(old)?;
		let edge = &mut self.edges[idx];
		edge.source = source.clone();
		edge.target = target.clone();
		debug!("retargeted edge {old} to {source}_{target}");
		Some(edge.key())
	}

	/// Remove the first edge matching `key`.
	pub fn delete_edge(&mut self, key: &EdgeKey) -> Option<Edge> {
		let idx = self.edge_index(key)?;
		Some(self.edges.remove(idx))
	}

	/// Copy the selected nodes and the selected edges between them.
	///
	/// The copies keep their relative layout, with the top-left corner of the
	/// selection's bounding box placed at `at`. Every copy gets a fresh key;
	/// selected edges whose endpoints were not both copied are dropped.
	/// Returns a selection of the new items, empty when no node was selected.
	pub fn duplicate_selection(&mut self, selection: &Selection, at: Point) -> Selection {
		let copied: Vec<Node> = self
			.nodes
			.iter()
			.filter(|node| selection.contains_node(&node.key))
			.cloned()
			.collect();
		if copied.is_empty() {
			return Selection::default();
		}

		let corner_x = copied.iter().map(|node| node.x).fold(f64::INFINITY, f64::min);
		let corner_y = copied.iter().map(|node| node.y).fold(f64::INFINITY, f64::min);

		let mut new_keys: HashMap<NodeKey, NodeKey> = HashMap::with_capacity(copied.len());
		for node in copied {
			let key = self.fresh_key(Some(&node.key));
			new_keys.insert(node.key.clone(), key.clone());
			self.nodes.push(Node {
				key,
				x: at.x + (node.x - corner_x),
				y: at.y + (node.y - corner_y),
				..node
			});
		}

		let new_edges: Vec<Edge> = selection
			.edges()
			.iter()
			.filter_map(|key| {
				let edge = &self.edges[self.edge_index(key)?];
				Some(Edge {
					source: new_keys.get(&edge.source)?.clone(),
					target: new_keys.get(&edge.target)?.clone(),
					edge_type: edge.edge_type,
				})
			})
			.collect();
		let edge_keys: Vec<EdgeKey> = new_edges.iter().map(Edge::key).collect();
		self.edges.extend(new_edges);

		debug!(
			"pasted {} nodes and {} edges at ({}, {})",
			new_keys.len(),
			edge_keys.len(),
			at.x,
			at.y
		);
		Selection::from_keys(new_keys.into_values(), edge_keys)
	}

	fn valid_endpoints(&self, source: &NodeKey, target: &NodeKey) -> bool {
		source != target && self.contains_node(source) && self.contains_node(target)
	}

	/// Next unused key, `n<id>` or `<base>_<id>` for copies.
	fn fresh_key(&mut self, base: Option<&NodeKey>) -> NodeKey {
		loop {
			self.next_id += 1;
			let key = NodeKey::from(match base {
				Some(base) => format!("{base}_{}", self.next_id),
				None => format!("n{}", self.next_id),
			});
			if !self.contains_node(&key) {
				return key;
			}
		}
	}
}
