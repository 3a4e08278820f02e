use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use crate::graph::{EditorState, GraphEvent, NodeKey, Point};

use super::layout::LayoutEngine;
use super::render;
use super::state::{DragState, EdgeDraft, PanState, ViewState};

const FRAME_DT: f64 = 0.016;
/// Pointer travel before a press turns into a drag.
const DRAG_THRESHOLD_PX: f64 = 3.0;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas that draws the editor's graph and reports interactions as
/// [`GraphEvent`]s. It never changes the graph itself.
#[component]
pub fn GraphView(
	#[prop(into)] editor: Signal<EditorState>,
	#[prop(into)] layout: Signal<LayoutEngine>,
	#[prop(into)] pan_to: Signal<Option<NodeKey>>,
	#[prop(into)] on_event: Callback<GraphEvent>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ViewState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let positions = Memo::new(move |_| {
		let engine = layout.get();
		editor.with(|editor| engine.positions(editor.graph()))
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("graph view mounted without a window");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};
		*state_init.borrow_mut() = Some(ViewState::new(w, h));
		debug!("graph view sized {w}x{h}");

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(FRAME_DT);
				let engine = layout.get_untracked();
				let _ = positions.try_with_untracked(|positions| {
					editor.try_with_untracked(|editor| {
						render::render(s, editor, positions, engine, &ctx)
					})
				});
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_pan = state.clone();
	Effect::new(move |_| {
		let Some(key) = pan_to.get() else {
			return;
		};
		let Some(point) = positions.with_untracked(|positions| positions.get(&key)) else {
			return;
		};
		if let Some(ref mut s) = *state_pan.borrow_mut() {
			s.center_on(point);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(canvas) = canvas_ref.get_untracked() {
			let _ = canvas.focus();
		}
		let (additive, shift) = (ev.ctrl_key() || ev.meta_key(), ev.shift_key());

		let event = {
			let mut guard = state_md.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let pointer = s.screen_to_graph(x, y);
			positions.with_untracked(|positions| {
				editor.with_untracked(|editor| {
					let graph = editor.graph();

					if let Some(edge) = editor.selection().single_edge() {
						if s.on_edge_handle(graph, positions, edge, x, y) {
							s.draft = Some(EdgeDraft {
								source: edge.source.clone(),
								replacing: Some(edge.clone()),
								cursor: pointer,
							});
							return None;
						}
					}

					if let Some(key) = s.node_at_position(graph, positions, x, y) {
						if shift {
							s.draft = Some(EdgeDraft {
								source: key,
								replacing: None,
								cursor: pointer,
							});
							return None;
						}
						let node_start = s.display_point(&key, positions).unwrap_or(pointer);
						s.drag = DragState {
							active: true,
							node: Some(key.clone()),
							moved: false,
							start_x: x,
							start_y: y,
							node_start,
							current: node_start,
						};
						return Some(GraphEvent::SelectNode { key, additive });
					}

					if let Some(key) = s.edge_at_position(graph, positions, x, y) {
						return Some(GraphEvent::SelectEdge { key, additive });
					}

					if shift {
						return Some(GraphEvent::CreateNode { at: pointer });
					}

					s.pan = PanState {
						active: true,
						moved: false,
						start_x: x,
						start_y: y,
						transform_start_x: s.transform.x,
						transform_start_y: s.transform.y,
					};
					None
				})
			})
		};
		if let Some(event) = event {
			on_event.run(event);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_mm.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		let pointer = s.screen_to_graph(x, y);
		s.pointer = pointer;
		if let Some(draft) = s.draft.as_mut() {
			draft.cursor = pointer;
		}

		if s.drag.active {
			let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
			if s.drag.moved || dx.hypot(dy) >= DRAG_THRESHOLD_PX {
				let k = s.transform.k;
				s.drag.moved = true;
				s.drag.current = Point::new(s.drag.node_start.x + dx / k, s.drag.node_start.y + dy / k);
			}
		} else if s.pan.active {
			let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
			if s.pan.moved || dx.hypot(dy) >= DRAG_THRESHOLD_PX {
				s.pan.moved = true;
				s.transform.x = s.pan.transform_start_x + dx;
				s.transform.y = s.pan.transform_start_y + dy;
			}
		} else if s.draft.is_none() {
			let hovered = positions.with_untracked(|positions| {
				editor.with_untracked(|editor| s.node_at_position(editor.graph(), positions, x, y))
			});
			s.hover = hovered;
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let point = canvas_point(canvas_ref, &ev);
		let event = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let event = if let Some(draft) = s.draft.take() {
				point
					.and_then(|(x, y)| {
						positions.with_untracked(|positions| {
							editor.with_untracked(|editor| {
								s.node_at_position(editor.graph(), positions, x, y)
							})
						})
					})
					.map(|target| match draft.replacing {
						Some(edge) => GraphEvent::SwapEdge {
							edge,
							source: draft.source,
							target,
						},
						None => GraphEvent::CreateEdge {
							source: draft.source,
							target,
						},
					})
			} else if s.drag.active && s.drag.moved {
				s.drag.node.clone().map(|key| GraphEvent::UpdateNode {
					key,
					at: s.drag.current,
				})
			} else if s.pan.active && !s.pan.moved {
				Some(GraphEvent::ClearSelection)
			} else {
				None
			};
			s.end_gestures();
			event
		};
		if let Some(event) = event {
			on_event.run(event);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_gestures();
			s.hover = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let modifier = ev.ctrl_key() || ev.meta_key();
		let event = match (modifier, ev.key().as_str()) {
			(_, "Delete" | "Backspace") => GraphEvent::DeleteSelected,
			(true, "c" | "C") => GraphEvent::Copy,
			(true, "v" | "V") => {
				let at = state_kd
					.borrow()
					.as_ref()
					.map(|s| s.pointer)
					.unwrap_or_default();
				GraphEvent::Paste { at }
			}
			(true, "z" | "Z") => GraphEvent::Undo,
			_ => return,
		};
		ev.prevent_default();
		on_event.run(event);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-view-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:keydown=on_keydown
			style="display: block; cursor: crosshair; outline: none;"
		/>
	}
}
