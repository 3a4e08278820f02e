//! Static graph descriptions: the bundled sample, JSON input, and generated
//! grids for stress testing the view.

use std::collections::HashSet;

use log::{info, warn};
use serde::Deserialize;

use super::error::GraphDataError;
use super::model::GraphModel;
use super::types::{Edge, EdgeType, Node, NodeKey, NodeSubtype, NodeType};

const SAMPLE_GRAPH: &str = include_str!("../../assets/sample-graph.json");

/// Nodes per row in a generated graph.
const GENERATED_ROW_LEN: usize = 20;
/// Distance between neighbouring generated nodes.
const GENERATED_SPACING: f64 = 200.0;

#[derive(Debug, Deserialize)]
struct NodeRecord {
	id: NodeKey,
	#[serde(default)]
	title: String,
	#[serde(rename = "type", default)]
	node_type: Option<NodeType>,
	#[serde(default)]
	subtype: Option<NodeSubtype>,
	#[serde(default)]
	x: f64,
	#[serde(default)]
	y: f64,
}

/// A graph description as found in the input JSON.
#[derive(Debug, Default, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	nodes: Vec<NodeRecord>,
	#[serde(default)]
	edges: Vec<Edge>,
}

impl GraphData {
	/// Parse a `{ "nodes": [...], "edges": [...] }` document.
	pub fn from_json(json: &str) -> Result<Self, GraphDataError> {
		Ok(serde_json::from_str(json)?)
	}
}

impl TryFrom<GraphData> for GraphModel {
	type Error = GraphDataError;

	/// Untyped nodes become [`NodeType::Skinny`]. Edges that loop or point at
	/// unknown nodes are dropped.
	fn try_from(data: GraphData) -> Result<Self, Self::Error> {
		let mut seen = HashSet::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());
		for record in data.nodes {
			if !seen.insert(record.id.clone()) {
				return Err(GraphDataError::DuplicateNodeKey(record.id));
			}
			nodes.push(Node {
				key: record.id,
				title: record.title,
				node_type: record.node_type.unwrap_or(NodeType::Skinny),
				subtype: record.subtype,
				x: record.x,
				y: record.y,
			});
		}

		let edges: Vec<Edge> = data
			.edges
			.into_iter()
			.filter(|edge| {
				let keep = edge.source != edge.target
					&& seen.contains(&edge.source)
					&& seen.contains(&edge.target);
				if !keep {
					warn!("dropping edge {} from graph data", edge.key());
				}
				keep
			})
			.collect();

		info!("loaded graph with {} nodes and {} edges", nodes.len(), edges.len());
		Ok(GraphModel::from_parts(nodes, edges))
	}
}

impl GraphModel {
	/// Parse and validate a JSON graph description.
	pub fn from_json(json: &str) -> Result<Self, GraphDataError> {
		GraphData::from_json(json)?.try_into()
	}
}

/// The graph bundled with the application.
pub fn sample_graph() -> Result<GraphModel, GraphDataError> {
	GraphModel::from_json(SAMPLE_GRAPH)
}

/// A grid of `n` nodes named `a1..an`, 20 per row, chained `a1 -> a2 -> ...`.
pub fn generate_sample(n: usize) -> GraphModel {
	let (mut col, mut row) = (0usize, 0usize);
	let nodes: Vec<Node> = (1..=n)
		.map(|i| {
			if i % GENERATED_ROW_LEN == 0 {
				row += 1;
				col = 0;
			} else {
				col += 1;
			}
			Node {
				key: NodeKey::from(format!("a{i}")),
				title: format!("Node {i}"),
				node_type: NodeType::ALL[pick(i, NodeType::ALL.len())],
				subtype: None,
				x: GENERATED_SPACING * col as f64,
				y: GENERATED_SPACING * row as f64,
			}
		})
		.collect();

	let edge_types = [EdgeType::Empty, EdgeType::Special];
	let edges: Vec<Edge> = (1..n)
		.map(|i| Edge {
			source: NodeKey::from(format!("a{i}")),
			target: NodeKey::from(format!("a{}", i + 1)),
			edge_type: edge_types[pick(i + n, edge_types.len())],
		})
		.collect();

	info!("generated graph with {} nodes", nodes.len());
	GraphModel::from_parts(nodes, edges)
}

/// Simple pseudo-random number in `[0, 1)` (deterministic for consistency).
pub(crate) fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn pick(seed: usize, len: usize) -> usize {
	((rand_simple(seed) * len as f64) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::graph::types::{EdgeKey, Point};

	#[test]
	fn bundled_sample_loads() {
		let graph = sample_graph().unwrap();
		assert!(!graph.nodes().is_empty());
		assert!(!graph.edges().is_empty());
		for edge in graph.edges() {
			assert!(graph.contains_node(&edge.source));
			assert!(graph.contains_node(&edge.target));
		}
	}

	#[test]
	fn untyped_nodes_load_as_skinny() {
		let graph = GraphModel::from_json(
			r#"{
				"nodes": [
					{ "id": "1", "title": "root", "x": 10, "y": 0 },
					{ "id": 2, "title": "leaf", "type": "POLY_TYPE", "subtype": "specialChild", "x": 10, "y": 100 }
				],
				"edges": [{ "source": "1", "target": "2", "type": "EMPTY_EDGE_TYPE" }]
			}"#,
		)
		.unwrap();

		let root = graph.node(&"1".into()).unwrap();
		assert_eq!(root.node_type, NodeType::Skinny);
		assert_eq!(root.position(), Point::new(10.0, 0.0));
		let leaf = graph.node(&"2".into()).unwrap();
		assert_eq!(leaf.node_type, NodeType::Poly);
		assert_eq!(leaf.subtype, Some(NodeSubtype::SpecialChild));
		assert_eq!(graph.edges()[0].key(), EdgeKey::new("1", "2"));
	}

	#[test]
	fn dangling_and_looping_edges_are_dropped() {
		let graph = GraphModel::from_json(
			r#"{
				"nodes": [{ "id": "a" }, { "id": "b" }],
				"edges": [
					{ "source": "a", "target": "b" },
					{ "source": "a", "target": "a" },
					{ "source": "b", "target": "missing" }
				]
			}"#,
		)
		.unwrap();
		assert_eq!(graph.edges().len(), 1);
		assert_eq!(graph.edges()[0].edge_type, EdgeType::Empty);
	}

	#[test]
	fn duplicate_keys_are_rejected() {
		let err = GraphModel::from_json(r#"{ "nodes": [{ "id": "a" }, { "id": "a" }] }"#)
			.unwrap_err();
		assert!(matches!(err, GraphDataError::DuplicateNodeKey(key) if key.as_str() == "a"));
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		let err = GraphModel::from_json("{ nodes: ").unwrap_err();
		assert!(matches!(err, GraphDataError::Parse(_)));
	}

	#[test]
	fn generated_graph_is_a_chain_on_a_grid() {
		let graph = generate_sample(45);
		assert_eq!(graph.nodes().len(), 45);
		assert_eq!(graph.edges().len(), 44);

		let pos = |key: &str| graph.node(&key.into()).unwrap().position();
		assert_eq!(pos("a1"), Point::new(200.0, 0.0));
		assert_eq!(pos("a19"), Point::new(3800.0, 0.0));
		assert_eq!(pos("a20"), Point::new(0.0, 200.0));
		assert_eq!(pos("a41"), Point::new(200.0, 400.0));
		assert_eq!(graph.edges()[0].key(), EdgeKey::new("a1", "a2"));
		assert_eq!(graph.node(&"a1".into()).unwrap().title, "Node 1");
	}

	#[test]
	fn generating_zero_nodes_gives_an_empty_graph() {
		assert_eq!(generate_sample(0), GraphModel::new());
	}
}
