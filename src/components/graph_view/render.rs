use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::graph::{EdgeType, EditorState, Node, NodeSubtype, NodeType, Point};

use super::layout::{GRID_SPACING, LayoutEngine, Positions};
use super::state::{HANDLE_RADIUS, NODE_RADIUS, ViewState, boundary_point, node_half_extent};

const BACKGROUND: &str = "#1a1a2e";
const SELECTED: &str = "#ffd166";
const EDGE: &str = "rgba(100, 180, 255, 0.7)";

fn node_color(node_type: NodeType) -> &'static str {
	match node_type {
		NodeType::Empty => "#1f77b4",
		NodeType::Special => "#d62728",
		NodeType::Skinny => "#2ca02c",
		NodeType::Poly => "#9467bd",
		NodeType::ComplexCircle => "#ff7f0e",
	}
}

pub fn render(
	view: &ViewState,
	editor: &EditorState,
	positions: &Positions,
	layout: LayoutEngine,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, view.width, view.height);
	ctx.save();
	let _ = ctx.translate(view.transform.x, view.transform.y);
	let _ = ctx.scale(view.transform.k, view.transform.k);
	if layout == LayoutEngine::SnapToGrid {
		draw_grid(view, ctx);
	}
	draw_edges(view, editor, positions, ctx);
	draw_draft(view, positions, ctx);
	draw_nodes(view, editor, positions, ctx);
	ctx.restore();
}

fn draw_grid(view: &ViewState, ctx: &CanvasRenderingContext2d) {
	let step = GRID_SPACING * 5.0;
	let top_left = view.screen_to_graph(0.0, 0.0);
	let bottom_right = view.screen_to_graph(view.width, view.height);
	// Too dense to be useful when zoomed far out.
	if (bottom_right.x - top_left.x) / step > 400.0 {
		return;
	}

	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.05)");
	ctx.set_line_width(1.0 / view.transform.k);
	ctx.begin_path();
	let mut x = (top_left.x / step).floor() * step;
	while x <= bottom_right.x {
		ctx.move_to(x, top_left.y);
		ctx.line_to(x, bottom_right.y);
		x += step;
	}
	let mut y = (top_left.y / step).floor() * step;
	while y <= bottom_right.y {
		ctx.move_to(top_left.x, y);
		ctx.line_to(bottom_right.x, y);
		y += step;
	}
	ctx.stroke();
}

fn draw_edges(
	view: &ViewState,
	editor: &EditorState,
	positions: &Positions,
	ctx: &CanvasRenderingContext2d,
) {
	let graph = editor.graph();
	let k = view.transform.k;
	let (line_width, dash, gap, arrow_size) = (1.5 / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(view.flow_time * 30.0) % (dash + gap);

	for edge in graph.edges() {
		let (Some(a), Some(b)) = (
			view.display_point(&edge.source, positions),
			view.display_point(&edge.target, positions),
		) else {
			continue;
		};
		let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
		else {
			continue;
		};
		let start = boundary_point(a, b, source.node_type);
		let tip = boundary_point(b, a, target.node_type);
		let (dx, dy) = (tip.x - start.x, tip.y - start.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let key = edge.key();
		let selected = editor.selection().contains_edge(&key);
		let color = if selected { SELECTED } else { EDGE };

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(if selected { line_width * 2.0 } else { line_width });
		if edge.edge_type == EdgeType::Special {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(start.x, start.y);
		ctx.line_to(tip.x - ux * arrow_size, tip.y - uy * arrow_size);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(color);
		let (back_x, back_y) = (tip.x - ux * arrow_size, tip.y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if selected && editor.selection().single_edge() == Some(&key) {
			ctx.begin_path();
			let _ = ctx.arc(tip.x, tip.y, HANDLE_RADIUS / k, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("white");
			ctx.fill();
			ctx.set_stroke_style_str(SELECTED);
			ctx.set_line_width(line_width);
			ctx.stroke();
		}
	}
}

fn draw_draft(view: &ViewState, positions: &Positions, ctx: &CanvasRenderingContext2d) {
	let Some(draft) = &view.draft else {
		return;
	};
	let Some(from) = view.display_point(&draft.source, positions) else {
		return;
	};
	let k = view.transform.k;
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
	ctx.set_line_width(1.5 / k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0 / k),
		&JsValue::from_f64(4.0 / k),
	));
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(draft.cursor.x, draft.cursor.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(
	view: &ViewState,
	editor: &EditorState,
	positions: &Positions,
	ctx: &CanvasRenderingContext2d,
) {
	let k = view.transform.k;
	for node in editor.graph().nodes() {
		let Some(c) = view.display_point(&node.key, positions) else {
			continue;
		};
		let selected = editor.selection().contains_node(&node.key);
		let hovered = view.hover.as_ref() == Some(&node.key);

		if hovered || selected {
			draw_glow(ctx, c, node.node_type, selected);
		}
		if node.subtype == Some(NodeSubtype::SpecialChild) {
			ctx.set_global_alpha(0.35);
			ctx.begin_path();
			let _ = ctx.arc(c.x, c.y, NODE_RADIUS * 1.45, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(node_color(NodeType::Special));
			ctx.fill();
			ctx.set_global_alpha(1.0);
		}

		trace_shape(ctx, c, node.node_type);
		ctx.set_fill_style_str(node_color(node.node_type));
		ctx.fill();
		ctx.set_stroke_style_str(if selected {
			SELECTED
		} else {
			"rgba(255, 255, 255, 0.5)"
		});
		ctx.set_line_width(if selected { 3.0 / k } else { 1.0 / k });
		ctx.stroke();

		if node.node_type == NodeType::ComplexCircle {
			ctx.begin_path();
			let _ = ctx.arc(c.x, c.y, NODE_RADIUS * 0.6, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_title(ctx, node, c, k);
	}
}

fn draw_glow(ctx: &CanvasRenderingContext2d, c: Point, node_type: NodeType, selected: bool) {
	let (hw, hh) = node_half_extent(node_type);
	let glow_radius = hw.max(hh) * 1.6;
	let Ok(gradient) = ctx.create_radial_gradient(c.x, c.y, hh * 0.3, c.x, c.y, glow_radius)
	else {
		return;
	};
	let alpha = if selected { 0.35 } else { 0.2 };
	let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
	let _ = gradient.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
	let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
	ctx.begin_path();
	let _ = ctx.arc(c.x, c.y, glow_radius, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn trace_shape(ctx: &CanvasRenderingContext2d, c: Point, node_type: NodeType) {
	let (hw, hh) = node_half_extent(node_type);
	ctx.begin_path();
	match node_type {
		NodeType::Special => {
			ctx.move_to(c.x, c.y - hh);
			ctx.line_to(c.x + hw, c.y);
			ctx.line_to(c.x, c.y + hh);
			ctx.line_to(c.x - hw, c.y);
			ctx.close_path();
		}
		NodeType::Skinny => {
			ctx.rect(c.x - hw, c.y - hh, hw * 2.0, hh * 2.0);
		}
		NodeType::Poly => {
			for i in 0..6 {
				let angle = PI / 3.0 * i as f64;
				let (x, y) = (c.x + hw * angle.cos(), c.y + hh * angle.sin());
				if i == 0 {
					ctx.move_to(x, y);
				} else {
					ctx.line_to(x, y);
				}
			}
			ctx.close_path();
		}
		NodeType::Empty | NodeType::ComplexCircle => {
			let _ = ctx.arc(c.x, c.y, hw, 0.0, 2.0 * PI);
		}
	}
}

fn draw_title(ctx: &CanvasRenderingContext2d, node: &Node, c: Point, k: f64) {
	if node.title.is_empty() {
		return;
	}
	ctx.set_fill_style_str("white");
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let (hw, hh) = node_half_extent(node.node_type);
	// Skinny titles sit inside the box; the rest go underneath.
	let _ = match node.node_type {
		NodeType::Skinny => ctx.fill_text_with_max_width(&node.title, c.x, c.y, hw * 2.0 - 8.0),
		_ => ctx.fill_text(&node.title, c.x, c.y + hh + 10.0),
	};
}
