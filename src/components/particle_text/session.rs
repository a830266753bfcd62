//! Browser half of the animation driver.
//!
//! [`AnimationSession`] owns everything that touches the DOM: the canvas
//! size, the event listeners, and the `requestAnimationFrame` loop. All
//! simulation state lives in a shared [`Scene`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement,
	MouseEvent, TouchEvent, Window,
};

use super::config::FieldConfig;
use super::render::{self, CanvasTextSampler};
use super::scene::Scene;
use crate::error::{AnimatorError, Result};

/// Frame scheduling bookkeeping, kept separate from the DOM handles so the
/// stop semantics can be exercised natively.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
	stopped: bool,
	pending: Option<i32>,
}

impl FrameGate {
	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	pub fn pending(&self) -> Option<i32> {
		self.pending
	}

	/// Records a scheduled frame. Returns false once stopped; the caller
	/// must then cancel `id` itself.
	pub fn schedule(&mut self, id: i32) -> bool {
		if self.stopped {
			return false;
		}
		self.pending = Some(id);
		true
	}

	/// The pending frame started running.
	pub fn fired(&mut self) {
		self.pending = None;
	}

	/// Marks the gate stopped. Returns the frame to cancel on the first call
	/// only.
	pub fn stop(&mut self) -> Option<i32> {
		if self.stopped {
			return None;
		}
		self.stopped = true;
		self.pending.take()
	}
}

struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

/// A running animation bound to one canvas.
///
/// Dropping the session stops it.
pub struct AnimationSession {
	window: Window,
	scene: Rc<RefCell<Scene>>,
	gate: Rc<RefCell<FrameGate>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	listeners: Vec<Listener>,
}

impl AnimationSession {
	/// Sizes `canvas` to the window, seeds the field, wires input and starts
	/// the frame loop.
	pub fn start(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<Self> {
		let window = web_sys::window().ok_or(AnimatorError::NoWindow)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or(AnimatorError::NoContext)?
			.dyn_into()
			.map_err(|_| AnimatorError::NoContext)?;

		let touch_capable =
			js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
		let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
		let text = config.text.clone();

		let scene = Scene::new(
			config,
			Box::new(CanvasTextSampler::new(ctx.clone())),
			touch_capable,
			seed,
		);

		let mut session = Self {
			window: window.clone(),
			scene: Rc::new(RefCell::new(scene)),
			gate: Rc::new(RefCell::new(FrameGate::default())),
			animate: Rc::new(RefCell::new(None)),
			listeners: Vec::new(),
		};

		let (w, h) = viewport_size(&window);
		fit_canvas(&canvas, w, h);
		session.scene.borrow_mut().resize(w, h);

		session.wire_input(&window, &canvas)?;
		session.run(ctx)?;

		info!(
			"particle-text: started \"{}\" ({} particles, touch: {})",
			text,
			session.scene.borrow().field().len(),
			touch_capable
		);
		Ok(session)
	}

	/// Cancels the pending frame and detaches every listener. Safe to call
	/// any number of times.
	pub fn stop(&mut self) {
		if self.gate.borrow().is_stopped() {
			return;
		}
		if let Some(id) = self.gate.borrow_mut().stop() {
			let _ = self.window.cancel_animation_frame(id);
		}

		for listener in self.listeners.drain(..) {
			let _ = listener.target.remove_event_listener_with_callback(
				listener.event,
				listener.callback.as_ref().unchecked_ref(),
			);
		}
		// Breaks the closure's reference to itself.
		drop(self.animate.borrow_mut().take());
		info!("particle-text: stopped");
	}

	fn listen(
		&mut self,
		target: &EventTarget,
		event: &'static str,
		passive: Option<bool>,
		handler: impl FnMut(Event) + 'static,
	) -> Result<()> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		match passive {
			Some(passive) => {
				let options = AddEventListenerOptions::new();
				options.set_passive(passive);
				target.add_event_listener_with_callback_and_add_event_listener_options(
					event,
					callback.as_ref().unchecked_ref(),
					&options,
				)?;
			}
			None => {
				target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?
			}
		}
		self.listeners.push(Listener {
			target: target.clone(),
			event,
			callback,
		});
		Ok(())
	}

	fn wire_input(&mut self, window: &Window, canvas: &HtmlCanvasElement) -> Result<()> {
		let surface: &EventTarget = canvas.as_ref();
		let viewport: &EventTarget = window.as_ref();

		let (scene, canvas_resize, win) = (self.scene.clone(), canvas.clone(), window.clone());
		self.listen(viewport, "resize", None, move |_| {
			let (w, h) = viewport_size(&win);
			fit_canvas(&canvas_resize, w, h);
			if let Ok(mut scene) = scene.try_borrow_mut() {
				scene.resize(w, h);
			}
		})?;

		let (scene, canvas_mm) = (self.scene.clone(), canvas.clone());
		self.listen(surface, "mousemove", None, move |ev| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let (x, y) = local_point(&canvas_mm, ev.client_x(), ev.client_y());
			if let Ok(mut scene) = scene.try_borrow_mut() {
				scene.pointer_mut().mouse_move(x, y);
			}
		})?;

		let scene = self.scene.clone();
		self.listen(surface, "mouseleave", None, move |_| {
			if let Ok(mut scene) = scene.try_borrow_mut() {
				scene.pointer_mut().mouse_leave();
			}
		})?;

		let (scene, canvas_ts) = (self.scene.clone(), canvas.clone());
		self.listen(surface, "touchstart", None, move |ev| {
			let position = first_touch(&canvas_ts, &ev);
			if let Ok(mut scene) = scene.try_borrow_mut() {
				scene.pointer_mut().touch_start(position);
			}
		})?;

		// Non-passive so the page does not scroll while dragging particles.
		let (scene, canvas_tm) = (self.scene.clone(), canvas.clone());
		self.listen(surface, "touchmove", Some(false), move |ev| {
			ev.prevent_default();
			let Some((x, y)) = first_touch(&canvas_tm, &ev) else {
				return;
			};
			if let Ok(mut scene) = scene.try_borrow_mut() {
				scene.pointer_mut().touch_move(x, y);
			}
		})?;

		for event in ["touchend", "touchcancel"] {
			let scene = self.scene.clone();
			self.listen(surface, event, None, move |_| {
				if let Ok(mut scene) = scene.try_borrow_mut() {
					scene.pointer_mut().touch_end();
				}
			})?;
		}
		Ok(())
	}

	fn run(&mut self, ctx: CanvasRenderingContext2d) -> Result<()> {
		let (scene, gate, animate_inner, window) = (
			self.scene.clone(),
			self.gate.clone(),
			self.animate.clone(),
			self.window.clone(),
		);

		*self.animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut gate = gate.borrow_mut();
				if gate.is_stopped() {
					return;
				}
				gate.fired();
			}

			// Skip the frame rather than panic if an event handler holds it.
			if let Ok(mut scene) = scene.try_borrow_mut() {
				let frame = scene.frame();
				render::paint(&ctx, &frame);
			}

			if let Some(ref cb) = *animate_inner.borrow() {
				match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					Ok(id) => {
						if !gate.borrow_mut().schedule(id) {
							let _ = window.cancel_animation_frame(id);
						}
					}
					Err(e) => warn!("particle-text: failed to schedule frame: {:?}", e),
				}
			}
		}));

		if let Some(ref cb) = *self.animate.borrow() {
			let id = self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref())?;
			self.gate.borrow_mut().schedule(id);
		}
		Ok(())
	}
}

impl Drop for AnimationSession {
	fn drop(&mut self) {
		self.stop();
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let read = |v: std::result::Result<JsValue, JsValue>| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
	};
	(read(window.inner_width()), read(window.inner_height()))
}

fn fit_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64) {
	canvas.set_width(width.max(0.0) as u32);
	canvas.set_height(height.max(0.0) as u32);
}

fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn first_touch(canvas: &HtmlCanvasElement, ev: &Event) -> Option<(f64, f64)> {
	let touch = ev.dyn_ref::<TouchEvent>()?.touches().get(0)?;
	Some(local_point(canvas, touch.client_x(), touch.client_y()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stop_is_idempotent() {
		let mut gate = FrameGate::default();
		assert!(gate.schedule(7));
		assert_eq!(gate.stop(), Some(7));
		assert!(gate.is_stopped());
		assert_eq!(gate.stop(), None);
		assert_eq!(gate.stop(), None);
	}

	#[test]
	fn no_frame_is_scheduled_after_stop() {
		let mut gate = FrameGate::default();
		gate.schedule(1);
		gate.fired();
		assert_eq!(gate.pending(), None);
		assert_eq!(gate.stop(), None);
		assert!(!gate.schedule(2));
		assert_eq!(gate.pending(), None);
	}
}
