//! Node and edge records held by [`GraphModel`](super::GraphModel).

use std::fmt;

use serde::Deserialize;

/// Identity key of a node. Unique within one graph.
///
/// Input data may carry either strings or integers; both are held as text.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "RawKey")]
pub struct NodeKey(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
	Text(String),
	Int(i64),
}

impl From<RawKey> for NodeKey {
	fn from(raw: RawKey) -> Self {
		match raw {
			RawKey::Text(s) => Self(s),
			RawKey::Int(n) => Self(n.to_string()),
		}
	}
}

impl From<String> for NodeKey {
	fn from(s: String) -> Self {
		Self(s)
	}
}

impl From<&str> for NodeKey {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

impl NodeKey {
	/// Borrow the key text.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for NodeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Shape tag of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
	/// Plain circle.
	#[default]
	#[serde(alias = "EMPTY_TYPE")]
	Empty,
	/// Diamond, used for entry points.
	#[serde(alias = "SPECIAL_TYPE")]
	Special,
	/// Wide, flat box sized for long titles.
	#[serde(alias = "SKINNY_TYPE")]
	Skinny,
	/// Hexagon.
	#[serde(alias = "POLY_TYPE")]
	Poly,
	/// Circle with an outer ring.
	#[serde(alias = "COMPLEX_CIRCLE_TYPE")]
	ComplexCircle,
}

impl NodeType {
	/// Every node type, in palette order.
	pub const ALL: [NodeType; 5] = [
		NodeType::Empty,
		NodeType::Special,
		NodeType::Skinny,
		NodeType::Poly,
		NodeType::ComplexCircle,
	];
}

/// Secondary shape drawn underneath a node's main shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeSubtype {
	/// Faint halo marking a child of a special node.
	#[serde(alias = "SPECIAL_CHILD_SUBTYPE")]
	SpecialChild,
}

/// Style tag of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum EdgeType {
	/// Plain edge.
	#[default]
	#[serde(rename = "emptyEdge", alias = "EMPTY_EDGE_TYPE")]
	Empty,
	/// Animated edge leaving a special node.
	#[serde(rename = "specialEdge", alias = "SPECIAL_EDGE_TYPE")]
	Special,
}

impl EdgeType {
	/// Type given to a new edge drawn out of a node of type `source`.
	pub fn for_source(source: NodeType) -> Self {
		match source {
			NodeType::Special => EdgeType::Special,
			_ => EdgeType::Empty,
		}
	}
}

/// A position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Build a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A graph vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Identity key.
	pub key: NodeKey,
	/// Display title; empty for freshly drawn nodes.
	pub title: String,
	/// Shape tag.
	pub node_type: NodeType,
	/// Optional underlay shape.
	pub subtype: Option<NodeSubtype>,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
}

impl Node {
	/// Position as a point.
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// Composite key of an edge: its `(source, target)` pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey {
	/// Source node key.
	pub source: NodeKey,
	/// Target node key.
	pub target: NodeKey,
}

impl EdgeKey {
	/// Build a key from its endpoints.
	pub fn new(source: impl Into<NodeKey>, target: impl Into<NodeKey>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

impl fmt::Display for EdgeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}_{}", self.source, self.target)
	}
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Edge {
	/// Source node key.
	pub source: NodeKey,
	/// Target node key.
	pub target: NodeKey,
	/// Style tag.
	#[serde(rename = "type", default)]
	pub edge_type: EdgeType,
}

impl Edge {
	/// The `(source, target)` key of this edge.
	pub fn key(&self) -> EdgeKey {
		EdgeKey {
			source: self.source.clone(),
			target: self.target.clone(),
		}
	}

	/// Whether this edge matches `key`.
	pub fn matches(&self, key: &EdgeKey) -> bool {
		self.source == key.source && self.target == key.target
	}

	/// Whether `node` is either endpoint.
	pub fn touches(&self, node: &NodeKey) -> bool {
		&self.source == node || &self.target == node
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_key_accepts_strings_and_integers() {
		let keys: Vec<NodeKey> = serde_json::from_str(r#"["a1", 42]"#).unwrap();
		assert_eq!(keys, vec![NodeKey::from("a1"), NodeKey::from("42")]);
	}

	#[test]
	fn type_tags_accept_constant_names() {
		let node: NodeType = serde_json::from_str(r#""SKINNY_TYPE""#).unwrap();
		assert_eq!(node, NodeType::Skinny);
		let node: NodeType = serde_json::from_str(r#""complexCircle""#).unwrap();
		assert_eq!(node, NodeType::ComplexCircle);
		let edge: EdgeType = serde_json::from_str(r#""EMPTY_EDGE_TYPE""#).unwrap();
		assert_eq!(edge, EdgeType::Empty);
		let edge: EdgeType = serde_json::from_str(r#""specialEdge""#).unwrap();
		assert_eq!(edge, EdgeType::Special);
	}

	#[test]
	fn edge_key_displays_as_source_underscore_target() {
		assert_eq!(EdgeKey::new("a", "b").to_string(), "a_b");
	}

	#[test]
	fn special_sources_draw_special_edges() {
		assert_eq!(EdgeType::for_source(NodeType::Special), EdgeType::Special);
		assert_eq!(EdgeType::for_source(NodeType::Skinny), EdgeType::Empty);
	}
}
