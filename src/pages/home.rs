use leptos::prelude::*;

use crate::components::graph_view::{GraphView, LayoutEngine};
use crate::graph::{EditorState, GraphEvent, GraphModel, NodeKey, generate_sample, sample_graph};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{sample_graph().map(|graph| view! { <GraphEditor graph=graph /> })}
		</ErrorBoundary>
	}
}

/// Controls above the canvas plus the canvas itself, all editing one graph.
#[component]
fn GraphEditor(graph: GraphModel) -> impl IntoView {
	let editor = RwSignal::new(EditorState::new(graph));
	let layout = RwSignal::new(LayoutEngine::default());
	let pan_to = RwSignal::new(None::<NodeKey>);

	let on_event = Callback::new(move |event: GraphEvent| {
		editor.maybe_update(|state| state.apply(event));
	});
	let node_count = move || editor.with(|state| state.graph().nodes().len());

	view! {
		<div class="graph-page">
			<div class="graph-header">
				<h1>"Graph Editor"</h1>
				<p class="subtitle">
					"Shift+click to add a node. Shift+drag from one node to another to connect them. "
					"Drag the handle of a selected edge onto another node to retarget it. "
					"Delete removes the selection; Ctrl+C then Ctrl+V duplicates it at the pointer."
				</p>
				<p class="subtitle">"To move nodes around, set the layout to None."</p>

				<div class="layout-engine">
					<span>"Layout Engine: "</span>
					<select on:change=move |ev| {
						layout.set(LayoutEngine::from_value(&event_target_value(&ev)))
					}>
						{LayoutEngine::ALL
							.into_iter()
							.map(|engine| {
								view! {
									<option
										value=engine.value()
										selected={engine == LayoutEngine::default()}
									>
										{engine.label()}
									</option>
								}
							})
							.collect_view()}
					</select>
				</div>

				<div class="pan-list">
					<span>"Pan To: "</span>
					<select on:change=move |ev| {
						pan_to.set(Some(NodeKey::from(event_target_value(&ev))))
					}>
						{move || {
							editor
								.with(|state| {
									state
										.graph()
										.nodes()
										.iter()
										.map(|node| {
											let label = if node.title.is_empty() {
												node.key.to_string()
											} else {
												node.title.clone()
											};
											(node.key.to_string(), label)
										})
										.collect::<Vec<_>>()
								})
								.into_iter()
								.map(|(key, title)| view! { <option value=key>{title}</option> })
								.collect_view()
						}}
					</select>
				</div>

				<div class="graph-controls">
					<span>"Nodes: "</span>
					<input
						type="number"
						min="0"
						prop:value=move || node_count().to_string()
						on:change=move |ev| {
							let n = event_target_value(&ev).parse::<usize>().unwrap_or(0);
							editor.update(|state| state.replace_graph(generate_sample(n)));
						}
					/>
					<button on:click=move |_| {
						editor.update(|state| {
							state.add_start_node();
						})
					}>"Add start node"</button>
					<button on:click=move |_| {
						editor.maybe_update(|state| state.delete_start_node());
					}>"Delete start node"</button>
				</div>
			</div>

			<div class="graph-container">
				<GraphView editor=editor layout=layout pan_to=pan_to on_event=on_event />
			</div>
		</div>
	}
}
