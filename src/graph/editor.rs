use log::{debug, warn};

use super::data::rand_simple;
use super::model::GraphModel;
use super::selection::Selection;
use super::types::{EdgeKey, EdgeType, NodeKey, NodeType, Point};

/// Share of user-drawn nodes that come out as [`NodeType::Special`].
const SPECIAL_NODE_RATIO: f64 = 0.25;

/// An interaction reported by the graph view.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// Background was shift-clicked at `at`.
	CreateNode {
		/// Graph-space click position.
		at: Point,
	},
	/// A node was dropped at `at` after a drag.
	UpdateNode {
		/// Dragged node.
		key: NodeKey,
		/// Graph-space drop position.
		at: Point,
	},
	/// Delete a single node.
	DeleteNode(NodeKey),
	/// Delete everything currently selected. A selected edge key removes the
	/// first matching edge only, so one of a pair of parallel edges survives.
	DeleteSelected,
	/// An edge was drawn from `source` to `target`.
	CreateEdge {
		/// Node the drag started on.
		source: NodeKey,
		/// Node the drag ended on.
		target: NodeKey,
	},
	/// An edge endpoint was dragged onto another node.
	SwapEdge {
		/// The edge before the change.
		edge: EdgeKey,
		/// New source.
		source: NodeKey,
		/// New target.
		target: NodeKey,
	},
	/// Delete a single edge.
	DeleteEdge(EdgeKey),
	/// A node was clicked.
	SelectNode {
		/// Clicked node.
		key: NodeKey,
		/// Add to the selection instead of replacing it.
		additive: bool,
	},
	/// An edge was clicked.
	SelectEdge {
		/// Clicked edge.
		key: EdgeKey,
		/// Add to the selection instead of replacing it.
		additive: bool,
	},
	/// The background was clicked.
	ClearSelection,
	/// Copy shortcut.
	Copy,
	/// Paste shortcut, with the pointer position.
	Paste {
		/// Graph-space pointer position.
		at: Point,
	},
	/// Undo shortcut.
	Undo,
}

/// The graph being edited and what is selected in it.
///
/// Every interaction goes through [`apply`](Self::apply), so the whole editing
/// flow can be driven without a browser.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
	graph: GraphModel,
	selection: Selection,
	allow_multiselect: bool,
	created: usize,
}

impl EditorState {
	/// Start editing `graph` with nothing selected and multiselect enabled.
	pub fn new(graph: GraphModel) -> Self {
		Self {
			graph,
			selection: Selection::default(),
			allow_multiselect: true,
			created: 0,
		}
	}

	/// Enable or disable additive selection.
	pub fn with_multiselect(mut self, allow: bool) -> Self {
		self.allow_multiselect = allow;
		self
	}

	/// The graph being edited.
	pub fn graph(&self) -> &GraphModel {
		&self.graph
	}

	/// The current selection.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Swap in a different graph, dropping the selection.
	pub fn replace_graph(&mut self, graph: GraphModel) {
		self.graph = graph;
		self.selection.clear();
	}

	/// Prepend the special start node.
	pub fn add_start_node(&mut self) -> NodeKey {
		self.graph.insert_start_node()
	}

	/// Remove the first node and its edges.
	pub fn delete_start_node(&mut self) -> bool {
		let removed = self.graph.remove_start_node().is_some();
		if removed {
			self.selection.retain_existing(&self.graph);
		}
		removed
	}

	/// Handle one interaction. Returns whether the graph or selection changed.
	pub fn apply(&mut self, event: GraphEvent) -> bool {
		debug!("graph event: {event:?}");
		match event {
			GraphEvent::CreateNode { at } => {
				let node_type = self.next_node_type();
				self.graph.insert_node(at, node_type);
				true
			}
			GraphEvent::UpdateNode { key, at } => self.graph.update_node(&key, at),
			GraphEvent::DeleteNode(key) => {
				let removed = self.graph.delete_node(&key).is_some();
				if removed {
					self.selection.retain_existing(&self.graph);
				}
				removed
			}
			GraphEvent::DeleteSelected => self.delete_selected(),
			GraphEvent::CreateEdge { source, target } => {
				let Some(source_type) = self.graph.node(&source).map(|node| node.node_type) else {
					return false;
				};
				match self
					.graph
					.insert_edge(&source, &target, EdgeType::for_source(source_type))
				{
					Some(key) => {
						self.selection = Selection::edge(key);
						true
					}
					None => false,
				}
			}
			GraphEvent::SwapEdge {
				edge,
				source,
				target,
			} => match self.graph.retarget_edge(&edge, &source, &target) {
				Some(key) => {
					self.selection = Selection::edge(key);
					true
				}
				None => false,
			},
			GraphEvent::DeleteEdge(key) => {
				let removed = self.graph.delete_edge(&key).is_some();
				if removed {
					self.selection.clear();
				}
				removed
			}
			GraphEvent::SelectNode { key, additive } => {
				if !self.graph.contains_node(&key) {
					return false;
				}
				if additive && self.allow_multiselect {
					self.selection.toggle_node(key);
				} else {
					self.selection = Selection::node(key);
				}
				true
			}
			GraphEvent::SelectEdge { key, additive } => {
				if self.graph.edge_index(&key).is_none() {
					return false;
				}
				if additive && self.allow_multiselect {
					self.selection.toggle_edge(key);
				} else {
					self.selection = Selection::edge(key);
				}
				true
			}
			GraphEvent::ClearSelection => {
				let changed = !self.selection.is_empty();
				self.selection.clear();
				changed
			}
			GraphEvent::Copy => {
				debug!(
					"copied {} nodes and {} edges",
					self.selection.nodes().len(),
					self.selection.edges().len()
				);
				false
			}
			GraphEvent::Paste { at } => {
				let pasted = self.graph.duplicate_selection(&self.selection, at);
				if pasted.is_empty() {
					return false;
				}
				self.selection = pasted;
				true
			}
			GraphEvent::Undo => {
				warn!("undo is not implemented");
				false
			}
		}
	}

	fn delete_selected(&mut self) -> bool {
		if self.selection.is_empty() {
			return false;
		}
		let selection = std::mem::take(&mut self.selection);
		let mut removed = false;
		for key in selection.nodes() {
			removed |= self.graph.delete_node(key).is_some();
		}
		for key in selection.edges() {
			removed |= self.graph.delete_edge(key).is_some();
		}
		removed
	}

	fn next_node_type(&mut self) -> NodeType {
		let roll = rand_simple(self.created);
		self.created += 1;
		if roll < SPECIAL_NODE_RATIO {
			NodeType::Special
		} else {
			NodeType::Empty
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::graph::types::{Edge, Node};

	fn editor() -> EditorState {
		let node = |key: &str, node_type, x, y| Node {
			key: key.into(),
			title: key.into(),
			node_type,
			subtype: None,
			x,
			y,
		};
		let edge = |source: &str, target: &str| Edge {
			source: source.into(),
			target: target.into(),
			edge_type: EdgeType::Empty,
		};
		EditorState::new(GraphModel::from_parts(
			vec![
				node("s", NodeType::Special, 0.0, 0.0),
				node("a", NodeType::Empty, 0.0, 100.0),
				node("b", NodeType::Skinny, 100.0, 100.0),
			],
			vec![edge("s", "a"), edge("a", "b")],
		))
	}

	#[test]
	fn created_edges_take_their_type_from_the_source_and_are_selected() {
		let mut state = editor();
		assert!(state.apply(GraphEvent::CreateEdge {
			source: "s".into(),
			target: "b".into(),
		}));
		let key = EdgeKey::new("s", "b");
		assert_eq!(state.selection(), &Selection::edge(key.clone()));
		let idx = state.graph().edge_index(&key).unwrap();
		assert_eq!(state.graph().edges()[idx].edge_type, EdgeType::Special);

		assert!(state.apply(GraphEvent::CreateEdge {
			source: "a".into(),
			target: "s".into(),
		}));
		assert_eq!(state.graph().edges().last().unwrap().edge_type, EdgeType::Empty);
	}

	#[test]
	fn self_loop_events_change_nothing() {
		let mut state = editor();
		assert!(!state.apply(GraphEvent::CreateEdge {
			source: "a".into(),
			target: "a".into(),
		}));
		assert_eq!(state, editor());
	}

	#[test]
	fn created_nodes_are_mostly_empty() {
		let mut state = editor();
		for i in 0..20 {
			assert!(state.apply(GraphEvent::CreateNode {
				at: Point::new(i as f64, 0.0),
			}));
		}
		let types: Vec<NodeType> = state.graph().nodes()[3..]
			.iter()
			.map(|node| node.node_type)
			.collect();
		assert_eq!(types.len(), 20);
		assert!(types.iter().all(|t| matches!(t, NodeType::Empty | NodeType::Special)));
		assert!(types.contains(&NodeType::Empty));
	}

	#[test]
	fn additive_selection_respects_multiselect() {
		let mut state = editor();
		state.apply(GraphEvent::SelectNode {
			key: "a".into(),
			additive: false,
		});
		state.apply(GraphEvent::SelectNode {
			key: "b".into(),
			additive: true,
		});
		assert_eq!(state.selection().nodes().len(), 2);

		let mut single = editor().with_multiselect(false);
		single.apply(GraphEvent::SelectNode {
			key: "a".into(),
			additive: false,
		});
		single.apply(GraphEvent::SelectNode {
			key: "b".into(),
			additive: true,
		});
		assert_eq!(single.selection(), &Selection::node("b".into()));
	}

	#[test]
	fn selecting_unknown_items_is_ignored() {
		let mut state = editor();
		assert!(!state.apply(GraphEvent::SelectNode {
			key: "zz".into(),
			additive: false,
		}));
		assert!(!state.apply(GraphEvent::SelectEdge {
			key: EdgeKey::new("b", "a"),
			additive: false,
		}));
		assert!(state.selection().is_empty());
	}

	#[test]
	fn delete_selected_cascades_and_clears() {
		let mut state = editor();
		state.apply(GraphEvent::SelectNode {
			key: "a".into(),
			additive: false,
		});
		assert!(state.apply(GraphEvent::DeleteSelected));
		assert!(state.selection().is_empty());
		assert_eq!(state.graph().nodes().len(), 2);
		assert!(state.graph().edges().is_empty());
		assert!(!state.apply(GraphEvent::DeleteSelected));
	}

	#[test]
	fn delete_selected_removes_only_the_selected_edges() {
		let mut state = editor();
		state.apply(GraphEvent::SelectEdge {
			key: EdgeKey::new("a", "b"),
			additive: false,
		});
		assert!(state.apply(GraphEvent::DeleteSelected));
		assert!(state.selection().is_empty());
		assert_eq!(state.graph().nodes().len(), 3);
		let keys: Vec<EdgeKey> = state.graph().edges().iter().map(Edge::key).collect();
		assert_eq!(keys, vec![EdgeKey::new("s", "a")]);
	}

	#[test]
	fn delete_selected_reports_stale_keys_as_unchanged() {
		let mut state = editor();
		state.apply(GraphEvent::SelectEdge {
			key: EdgeKey::new("a", "b"),
			additive: false,
		});
		state.graph.delete_edge(&EdgeKey::new("a", "b"));
		assert!(!state.apply(GraphEvent::DeleteSelected));
		assert!(state.selection().is_empty());
		assert_eq!(state.graph().edges().len(), 1);
	}

	#[test]
	fn delete_edge_clears_the_selection() {
		let mut state = editor();
		state.apply(GraphEvent::SelectNode {
			key: "s".into(),
			additive: false,
		});
		assert!(state.apply(GraphEvent::DeleteEdge(EdgeKey::new("s", "a"))));
		assert!(state.selection().is_empty());
		assert_eq!(state.graph().edges().len(), 1);
		assert_eq!(state.graph().edges()[0].key(), EdgeKey::new("a", "b"));
	}

	#[test]
	fn deleting_a_missing_edge_changes_nothing() {
		let mut state = editor();
		state.apply(GraphEvent::SelectNode {
			key: "s".into(),
			additive: false,
		});
		let before = state.clone();
		assert!(!state.apply(GraphEvent::DeleteEdge(EdgeKey::new("b", "a"))));
		assert_eq!(state, before);
	}

	#[test]
	fn clearing_an_empty_selection_reports_no_change() {
		let mut state = editor();
		assert!(!state.apply(GraphEvent::ClearSelection));
		state.apply(GraphEvent::SelectNode {
			key: "a".into(),
			additive: false,
		});
		assert!(state.apply(GraphEvent::ClearSelection));
		assert!(state.selection().is_empty());
	}

	#[test]
	fn deleting_a_node_drops_it_from_the_selection() {
		let mut state = editor();
		state.apply(GraphEvent::SelectEdge {
			key: EdgeKey::new("a", "b"),
			additive: false,
		});
		state.apply(GraphEvent::SelectNode {
			key: "s".into(),
			additive: true,
		});
		assert!(state.apply(GraphEvent::DeleteNode("b".into())));
		assert_eq!(state.selection(), &Selection::node("s".into()));
	}

	#[test]
	fn swap_edge_selects_the_retargeted_edge() {
		let mut state = editor();
		assert!(state.apply(GraphEvent::SwapEdge {
			edge: EdgeKey::new("a", "b"),
			source: "a".into(),
			target: "s".into(),
		}));
		assert_eq!(state.selection(), &Selection::edge(EdgeKey::new("a", "s")));
		assert_eq!(state.graph().edges()[0].key(), EdgeKey::new("s", "a"));
	}

	#[test]
	fn paste_duplicates_the_live_selection() {
		let mut state = editor();
		assert!(!state.apply(GraphEvent::Paste {
			at: Point::new(5.0, 5.0),
		}));

		state.apply(GraphEvent::SelectNode {
			key: "a".into(),
			additive: false,
		});
		state.apply(GraphEvent::SelectNode {
			key: "b".into(),
			additive: true,
		});
		state.apply(GraphEvent::SelectEdge {
			key: EdgeKey::new("a", "b"),
			additive: true,
		});
		assert!(!state.apply(GraphEvent::Copy));
		assert!(state.apply(GraphEvent::Paste {
			at: Point::new(500.0, 500.0),
		}));

		assert_eq!(state.graph().nodes().len(), 5);
		assert_eq!(state.graph().edges().len(), 3);
		assert_eq!(state.selection().nodes().len(), 2);
		assert_eq!(state.selection().edges().len(), 1);
		assert!(!state.selection().contains_node(&"a".into()));
	}

	#[test]
	fn undo_is_a_no_op() {
		let mut state = editor();
		assert!(!state.apply(GraphEvent::Undo));
		assert_eq!(state, editor());
	}

	#[test]
	fn start_node_round_trip() {
		let mut state = editor();
		let key = state.add_start_node();
		state.apply(GraphEvent::SelectNode {
			key: key.clone(),
			additive: false,
		});
		assert!(state.delete_start_node());
		assert!(state.selection().is_empty());
		assert!(!state.graph().contains_node(&key));
	}
}
