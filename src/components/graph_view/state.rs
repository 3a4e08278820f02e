use crate::graph::{EdgeKey, GraphModel, NodeKey, NodeType, Point};

use super::layout::Positions;

/// Radius of round node shapes, in graph units.
pub const NODE_RADIUS: f64 = 22.0;
/// Screen-space slack when picking edges and the edge handle.
pub const EDGE_HIT_PX: f64 = 6.0;
pub const HANDLE_RADIUS: f64 = 7.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Half width and half height of a node's main shape.
pub fn node_half_extent(node_type: NodeType) -> (f64, f64) {
	match node_type {
		NodeType::Skinny => (75.0, 16.0),
		NodeType::Special => (26.0, 26.0),
		_ => (NODE_RADIUS, NODE_RADIUS),
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeKey>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
	pub current: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// An edge being drawn, or an existing edge whose target is being moved.
#[derive(Clone, Debug)]
pub struct EdgeDraft {
	pub source: NodeKey,
	pub replacing: Option<EdgeKey>,
	pub cursor: Point,
}

pub struct ViewState {
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub draft: Option<EdgeDraft>,
	pub hover: Option<NodeKey>,
	/// Last pointer position in graph space, used as the paste target.
	pub pointer: Point,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl ViewState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 4.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			draft: None,
			hover: None,
			pointer: Point::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Where `key` is drawn right now: the drag preview wins over the layout.
	pub fn display_point(&self, key: &NodeKey, positions: &Positions) -> Option<Point> {
		if self.drag.moved && self.drag.node.as_ref() == Some(key) {
			return Some(self.drag.current);
		}
		positions.get(key)
	}

	/// Topmost node under the screen point.
	pub fn node_at_position(
		&self,
		graph: &GraphModel,
		positions: &Positions,
		sx: f64,
		sy: f64,
	) -> Option<NodeKey> {
		let p = self.screen_to_graph(sx, sy);
		graph
			.nodes()
			.iter()
			.rev()
			.find(|node| {
				let Some(c) = self.display_point(&node.key, positions) else {
					return false;
				};
				let (hw, hh) = node_half_extent(node.node_type);
				(p.x - c.x).abs() <= hw && (p.y - c.y).abs() <= hh
			})
			.map(|node| node.key.clone())
	}

	/// Topmost edge passing within a few pixels of the screen point.
	pub fn edge_at_position(
		&self,
		graph: &GraphModel,
		positions: &Positions,
		sx: f64,
		sy: f64,
	) -> Option<EdgeKey> {
		let p = self.screen_to_graph(sx, sy);
		let slack = EDGE_HIT_PX / self.transform.k;
		graph
			.edges()
			.iter()
			.rev()
			.find(|edge| {
				match (
					self.display_point(&edge.source, positions),
					self.display_point(&edge.target, positions),
				) {
					(Some(a), Some(b)) => distance_to_segment(p, a, b) <= slack,
					_ => false,
				}
			})
			.map(|edge| edge.key())
	}

	/// Whether the screen point is on the target handle of `edge`.
	pub fn on_edge_handle(
		&self,
		graph: &GraphModel,
		positions: &Positions,
		edge: &EdgeKey,
		sx: f64,
		sy: f64,
	) -> bool {
		let Some(handle) = self.edge_handle(graph, positions, edge) else {
			return false;
		};
		let p = self.screen_to_graph(sx, sy);
		let (dx, dy) = (p.x - handle.x, p.y - handle.y);
		(dx * dx + dy * dy).sqrt() <= (HANDLE_RADIUS + EDGE_HIT_PX) / self.transform.k
	}

	/// The point where `edge` meets its target's outline.
	pub fn edge_handle(
		&self,
		graph: &GraphModel,
		positions: &Positions,
		edge: &EdgeKey,
	) -> Option<Point> {
		let a = self.display_point(&edge.source, positions)?;
		let b = self.display_point(&edge.target, positions)?;
		let target_type = graph.node(&edge.target)?.node_type;
		Some(boundary_point(b, a, target_type))
	}

	/// Center the viewport on `p`.
	pub fn center_on(&mut self, p: Point) {
		self.transform.x = self.width / 2.0 - p.x * self.transform.k;
		self.transform.y = self.height / 2.0 - p.y * self.transform.k;
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn end_gestures(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.draft = None;
	}
}

/// Where the ray from `center` towards `toward` leaves a node's outline.
pub fn boundary_point(center: Point, toward: Point, node_type: NodeType) -> Point {
	let (dx, dy) = (toward.x - center.x, toward.y - center.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return center;
	}
	let (hw, hh) = node_half_extent(node_type);
	let t = match node_type {
		NodeType::Skinny => (hw / dx.abs().max(0.001)).min(hh / dy.abs().max(0.001)),
		_ => hw / dist,
	};
	let t = t.min(1.0);
	Point::new(center.x + dx * t, center.y + dy * t)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
	let (vx, vy) = (b.x - a.x, b.y - a.y);
	let len2 = vx * vx + vy * vy;
	let t = if len2 < f64::EPSILON {
		0.0
	} else {
		(((p.x - a.x) * vx + (p.y - a.y) * vy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + vx * t - p.x, a.y + vy * t - p.y);
	(cx * cx + cy * cy).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::layout::LayoutEngine;

	fn graph() -> GraphModel {
		GraphModel::from_json(
			r#"{
				"nodes": [
					{ "id": "a", "type": "empty", "x": 0, "y": 0 },
					{ "id": "b", "type": "empty", "x": 200, "y": 0 }
				],
				"edges": [{ "source": "a", "target": "b" }]
			}"#,
		)
		.unwrap()
	}

	fn view() -> ViewState {
		let mut view = ViewState::new(800.0, 600.0);
		view.transform = ViewTransform {
			x: 100.0,
			y: 100.0,
			k: 2.0,
		};
		view
	}

	#[test]
	fn picks_nodes_through_the_transform() {
		let graph = graph();
		let positions = LayoutEngine::None.positions(&graph);
		let view = view();
		assert_eq!(
			view.node_at_position(&graph, &positions, 510.0, 110.0),
			Some("b".into())
		);
		assert_eq!(view.node_at_position(&graph, &positions, 300.0, 100.0), None);
	}

	#[test]
	fn picks_edges_between_nodes() {
		let graph = graph();
		let positions = LayoutEngine::None.positions(&graph);
		let view = view();
		assert_eq!(
			view.edge_at_position(&graph, &positions, 300.0, 105.0),
			Some(EdgeKey::new("a", "b"))
		);
		assert_eq!(view.edge_at_position(&graph, &positions, 300.0, 140.0), None);
	}

	#[test]
	fn drag_preview_overrides_layout() {
		let graph = graph();
		let positions = LayoutEngine::None.positions(&graph);
		let mut view = view();
		view.drag.node = Some("a".into());
		view.drag.moved = true;
		view.drag.current = Point::new(50.0, 50.0);
		assert_eq!(view.display_point(&"a".into(), &positions), Some(Point::new(50.0, 50.0)));
		assert_eq!(view.display_point(&"b".into(), &positions), Some(Point::new(200.0, 0.0)));
	}

	#[test]
	fn handle_sits_on_the_target_outline() {
		let graph = graph();
		let positions = LayoutEngine::None.positions(&graph);
		let view = view();
		let key = EdgeKey::new("a", "b");
		let handle = view.edge_handle(&graph, &positions, &key).unwrap();
		assert!((handle.x - (200.0 - NODE_RADIUS)).abs() < 1e-9);
		assert!(handle.y.abs() < 1e-9);
		let sx = 100.0 + (200.0 - NODE_RADIUS) * 2.0;
		assert!(view.on_edge_handle(&graph, &positions, &key, sx, 100.0));
	}

	#[test]
	fn zoom_is_clamped_and_keeps_the_anchor() {
		let mut view = view();
		let before = view.screen_to_graph(400.0, 300.0);
		view.zoom_at(400.0, 300.0, 100.0);
		assert_eq!(view.transform.k, MAX_ZOOM);
		let after = view.screen_to_graph(400.0, 300.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);
	}
}
