use std::collections::{HashMap, HashSet, VecDeque};

use crate::graph::{GraphModel, NodeKey, Point};

/// Grid pitch used by [`LayoutEngine::SnapToGrid`].
pub const GRID_SPACING: f64 = 10.0;
/// Horizontal gap between siblings in a vertical tree.
const TREE_SPACING_X: f64 = 180.0;
/// Vertical gap between tree levels.
const TREE_SPACING_Y: f64 = 150.0;

/// How node coordinates map to where nodes are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutEngine {
	/// Draw nodes where the model puts them.
	None,
	/// Round positions to the grid.
	SnapToGrid,
	/// Stack nodes in levels below their roots.
	#[default]
	VerticalTree,
}

impl LayoutEngine {
	/// Every layout, in selector order.
	pub const ALL: [LayoutEngine; 3] = [
		LayoutEngine::None,
		LayoutEngine::SnapToGrid,
		LayoutEngine::VerticalTree,
	];

	/// Value used in the `<select>` element.
	pub fn value(&self) -> &'static str {
		match self {
			LayoutEngine::None => "None",
			LayoutEngine::SnapToGrid => "SnapToGrid",
			LayoutEngine::VerticalTree => "VerticalTree",
		}
	}

	/// Text shown to the user.
	pub fn label(&self) -> &'static str {
		match self {
			LayoutEngine::None => "None",
			LayoutEngine::SnapToGrid => "Snap to Grid",
			LayoutEngine::VerticalTree => "Vertical Tree",
		}
	}

	/// Parse a `<select>` value; anything unknown means no layout.
	pub fn from_value(value: &str) -> Self {
		Self::ALL
			.into_iter()
			.find(|engine| engine.value() == value)
			.unwrap_or(LayoutEngine::None)
	}

	/// Where each node of `graph` is drawn.
	pub fn positions(&self, graph: &GraphModel) -> Positions {
		let mut positions = Positions::default();
		match self {
			LayoutEngine::None => {
				for node in graph.nodes() {
					positions.insert(node.key.clone(), node.position());
				}
			}
			LayoutEngine::SnapToGrid => {
				for node in graph.nodes() {
					positions.insert(node.key.clone(), snap(node.position()));
				}
			}
			LayoutEngine::VerticalTree => {
				let levels = tree_levels(graph);
				for (depth, level) in levels.iter().enumerate() {
					let offset = (level.len() as f64 - 1.0) / 2.0;
					for (i, key) in level.iter().enumerate() {
						positions.insert(
							key.clone(),
							Point::new(
								(i as f64 - offset) * TREE_SPACING_X,
								depth as f64 * TREE_SPACING_Y,
							),
						);
					}
				}
			}
		}
		positions
	}
}

/// Display position of every node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Positions {
	points: HashMap<NodeKey, Point>,
}

impl Positions {
	fn insert(&mut self, key: NodeKey, point: Point) {
		self.points.insert(key, point);
	}

	/// Display position of `key`.
	pub fn get(&self, key: &NodeKey) -> Option<Point> {
		self.points.get(key).copied()
	}
}

fn snap(p: Point) -> Point {
	Point::new(
		(p.x / GRID_SPACING).round() * GRID_SPACING,
		(p.y / GRID_SPACING).round() * GRID_SPACING,
	)
}

/// Breadth-first levels starting from nodes without incoming edges. Nodes only
/// reachable through cycles start a new tree at level zero.
fn tree_levels(graph: &GraphModel) -> Vec<Vec<NodeKey>> {
	let mut children: HashMap<&NodeKey, Vec<&NodeKey>> = HashMap::new();
	let mut has_parent: HashSet<&NodeKey> = HashSet::new();
	for edge in graph.edges() {
		children.entry(&edge.source).or_default().push(&edge.target);
		has_parent.insert(&edge.target);
	}

	let roots = graph
		.nodes()
		.iter()
		.map(|node| &node.key)
		.filter(|key| !has_parent.contains(key));
	let rest = graph.nodes().iter().map(|node| &node.key);

	let mut levels: Vec<Vec<NodeKey>> = Vec::new();
	let mut visited: HashSet<&NodeKey> = HashSet::new();
	let mut queue: VecDeque<(&NodeKey, usize)> = VecDeque::new();

	for start in roots.chain(rest) {
		if !visited.insert(start) {
			continue;
		}
		queue.push_back((start, 0));
		while let Some((key, depth)) = queue.pop_front() {
			if levels.len() <= depth {
				levels.resize_with(depth + 1, Vec::new);
			}
			levels[depth].push(key.clone());
			for &child in children.get(key).into_iter().flatten() {
				if visited.insert(child) {
					queue.push_back((child, depth + 1));
				}
			}
		}
	}
	levels
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn graph() -> GraphModel {
		GraphModel::from_json(
			r#"{
				"nodes": [
					{ "id": "root", "x": 12.4, "y": -3.6 },
					{ "id": "left", "x": 0, "y": 0 },
					{ "id": "right", "x": 0, "y": 0 },
					{ "id": "leaf", "x": 0, "y": 0 },
					{ "id": "loop1", "x": 0, "y": 0 },
					{ "id": "loop2", "x": 0, "y": 0 }
				],
				"edges": [
					{ "source": "root", "target": "left" },
					{ "source": "root", "target": "right" },
					{ "source": "left", "target": "leaf" },
					{ "source": "right", "target": "leaf" },
					{ "source": "loop1", "target": "loop2" },
					{ "source": "loop2", "target": "loop1" }
				]
			}"#,
		)
		.unwrap()
	}

	#[test]
	fn no_layout_keeps_model_positions() {
		let positions = LayoutEngine::None.positions(&graph());
		assert_eq!(positions.get(&"root".into()), Some(Point::new(12.4, -3.6)));
		assert_eq!(positions.get(&"loop2".into()), Some(Point::new(0.0, 0.0)));
		assert_eq!(positions.get(&"missing".into()), None);
	}

	#[test]
	fn snap_rounds_to_the_grid() {
		let positions = LayoutEngine::SnapToGrid.positions(&graph());
		assert_eq!(positions.get(&"root".into()), Some(Point::new(10.0, 0.0)));
	}

	#[test]
	fn tree_levels_follow_edges() {
		let levels = tree_levels(&graph());
		let names: Vec<Vec<&str>> = levels
			.iter()
			.map(|level| level.iter().map(NodeKey::as_str).collect())
			.collect();
		assert_eq!(
			names,
			vec![vec!["root", "loop1"], vec!["left", "right", "loop2"], vec!["leaf"]]
		);
	}

	#[test]
	fn tree_centres_each_level() {
		let positions = LayoutEngine::VerticalTree.positions(&graph());
		assert_eq!(positions.get(&"leaf".into()), Some(Point::new(0.0, 300.0)));
		assert_eq!(positions.get(&"left".into()), Some(Point::new(-180.0, 150.0)));
		assert_eq!(positions.get(&"loop2".into()), Some(Point::new(180.0, 150.0)));
	}

	#[test]
	fn unknown_select_values_mean_no_layout() {
		assert_eq!(LayoutEngine::from_value("SnapToGrid"), LayoutEngine::SnapToGrid);
		assert_eq!(LayoutEngine::from_value(""), LayoutEngine::None);
	}
}
