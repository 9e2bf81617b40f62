use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, DragEvent, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{CanvasState, Gesture, HOBBY_DROP_RADIUS};
use super::types::GraphData;

type Shared = Rc<RefCell<Option<CanvasState>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Animation frame loop and window resize listener of one mounted canvas.
#[derive(Default)]
struct FrameLoop {
	animate: FrameCallback,
	resize: RefCell<Option<Closure<dyn FnMut()>>>,
	frame: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
	/// Cancels the pending frame, detaches the resize listener and drops both
	/// closures. The animate closure refers to its own cell, so dropping it
	/// here is what frees it.
	fn stop(&self) {
		let window = web_sys::window();
		if let (Some(id), Some(win)) = (self.frame.take(), &window) {
			let _ = win.cancel_animation_frame(id);
		}
		if let Some(cb) = self.resize.borrow_mut().take() {
			if let Some(win) = &window {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas rendering of the user graph with drag, connect, pan and zoom.
///
/// Gestures that need the service are reported through the callbacks; the
/// canvas itself never talks to the API.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] selected: Signal<Option<String>>,
	on_select: Callback<String>,
	on_connect: Callback<(String, String)>,
	/// Receives the id of the node a hobby was dropped on, or `None` if the
	/// drop missed every node.
	on_hobby_drop: Callback<Option<String>>,
	/// Set while a node drag or connector is in progress.
	#[prop(optional)]
	connecting: Option<RwSignal<bool>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Shared = Rc::new(RefCell::new(None));
	let frames = Rc::new(FrameLoop::default());
	let physics = RwSignal::new(false);
	let (state_init, frames_init) = (state.clone(), frames.clone());

	// Stop drawing once the component is disposed.
	let teardown = StoredValue::new_local(frames);
	on_cleanup(move || {
		teardown.try_with_value(|frames| frames.stop());
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("canvas 2d context unavailable");
				return;
			}
		};
		let mut initial = CanvasState::new(w, h);
		initial.sync(&data.get_untracked());
		initial.set_selected(selected.get_untracked().as_deref());
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*frames_init.resize.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *frames_init.resize.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, frame_inner) = (
			state_init.clone(),
			frames_init.animate.clone(),
			frames_init.frame.clone(),
		);
		*frames_init.animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *frames_init.animate.borrow() {
			frames_init
				.frame
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	// Keep the scene in step with the store.
	let state_sync = state.clone();
	Effect::new(move |_| {
		let data = data.get();
		if let Some(ref mut s) = *state_sync.borrow_mut() {
			s.sync(&data);
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let selected = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.set_selected(selected.as_deref());
		}
	});

	let set_connecting = move |live: bool| {
		if let Some(signal) = connecting {
			if signal.get_untracked() != live {
				signal.set(live);
			}
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let live = match *state_mm.borrow_mut() {
			Some(ref mut s) => {
				s.pointer_move(x, y);
				s.connecting()
			}
			None => false,
		};
		set_connecting(live);
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		// Release the borrow before the callbacks touch the stores.
		let gesture = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.release(x, y));
		set_connecting(false);
		match gesture {
			Some(Gesture::Select(id)) => on_select.run(id),
			Some(Gesture::Connect { source, target }) => on_connect.run((source, target)),
			None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel();
		}
		set_connecting(false);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_dp = state.clone();
	let on_drop = move |ev: DragEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let target = state_dp
			.borrow()
			.as_ref()
			.and_then(|s| s.node_near(x, y, HOBBY_DROP_RADIUS));
		on_hobby_drop.run(target);
	};

	let view_action = {
		let state = state.clone();
		move |f: fn(&mut CanvasState)| {
			if let Some(ref mut s) = *state.borrow_mut() {
				f(s);
			}
		}
	};
	let (zoom_in, zoom_out, fit) = (view_action.clone(), view_action.clone(), view_action);
	let state_phys = state.clone();
	let toggle_physics = move |_| {
		let on = !physics.get_untracked();
		physics.set(on);
		if let Some(ref mut s) = *state_phys.borrow_mut() {
			s.set_physics(on);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dragover=|ev: DragEvent| ev.prevent_default()
			on:drop=on_drop
		/>
		<div class="graph-controls">
			<button title="Zoom in" on:click=move |_| zoom_in(|s| s.zoom_by(1.2))>"+"</button>
			<button title="Zoom out" on:click=move |_| zoom_out(|s| s.zoom_by(1.0 / 1.2))>
				"\u{2212}"
			</button>
			<button title="Fit view" on:click=move |_| fit(CanvasState::fit_view)>"\u{2922}"</button>
			<button
				title="Auto-arrange"
				class:active=move || physics.get()
				on:click=toggle_physics
			>
				"\u{269B}"
			</button>
		</div>
	}
}
