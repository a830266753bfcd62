//! Mouse and touch input folded into a single pointer state.
//!
//! On devices without touch support, mouse presence alone (no button press)
//! scatters particles. On touch-capable devices only an ongoing touch does;
//! the synthetic mouse events browsers emit after a tap move the position but
//! never activate it.

/// Pointer position in canvas pixels and whether it currently influences
/// the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
	pub x: f64,
	pub y: f64,
	pub active: bool,
}

impl PointerState {
	/// Parked at the origin, influencing nothing.
	pub const INERT: PointerState = PointerState {
		x: 0.0,
		y: 0.0,
		active: false,
	};
}

impl Default for PointerState {
	fn default() -> Self {
		Self::INERT
	}
}

/// Tracks raw input events and exposes the resulting [`PointerState`].
#[derive(Clone, Debug)]
pub struct PointerTracker {
	touch_capable: bool,
	surface_ready: bool,
	x: f64,
	y: f64,
	hovering: bool,
	touching: bool,
}

impl PointerTracker {
	/// `touch_capable` is probed once by the host and never re-evaluated.
	pub fn new(touch_capable: bool) -> Self {
		Self {
			touch_capable,
			surface_ready: false,
			x: 0.0,
			y: 0.0,
			hovering: false,
			touching: false,
		}
	}

	/// Records the drawing surface size. Events are ignored until it is
	/// non-zero.
	pub fn set_surface(&mut self, width: f64, height: f64) {
		self.surface_ready = width > 0.0 && height > 0.0;
		if !self.surface_ready {
			self.reset();
		}
	}

	fn reset(&mut self) {
		self.x = 0.0;
		self.y = 0.0;
		self.hovering = false;
		self.touching = false;
	}

	pub fn mouse_move(&mut self, x: f64, y: f64) {
		if !self.surface_ready {
			return;
		}
		self.x = x;
		self.y = y;
		if !self.touch_capable {
			self.hovering = true;
		}
	}

	/// Pointer left the canvas. Touch devices keep their state: a finger
	/// sliding off mid-gesture is still engaged until it lifts.
	pub fn mouse_leave(&mut self) {
		if !self.touch_capable {
			self.reset();
		}
	}

	/// Finger down. The position is taken from the first touch when known.
	pub fn touch_start(&mut self, position: Option<(f64, f64)>) {
		if !self.surface_ready {
			return;
		}
		self.touching = true;
		if let Some((x, y)) = position {
			self.x = x;
			self.y = y;
		}
	}

	pub fn touch_move(&mut self, x: f64, y: f64) {
		if !self.surface_ready {
			return;
		}
		self.x = x;
		self.y = y;
	}

	/// Finger lifted or the gesture was cancelled: particles relax home.
	pub fn touch_end(&mut self) {
		self.reset();
	}

	pub fn state(&self) -> PointerState {
		PointerState {
			x: self.x,
			y: self.y,
			active: self.touching || self.hovering,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ready(touch_capable: bool) -> PointerTracker {
		let mut tracker = PointerTracker::new(touch_capable);
		tracker.set_surface(800.0, 600.0);
		tracker
	}

	#[test]
	fn mouse_presence_activates_without_touch_support() {
		let mut tracker = ready(false);
		tracker.mouse_move(120.0, 80.0);
		assert_eq!(
			tracker.state(),
			PointerState {
				x: 120.0,
				y: 80.0,
				active: true
			}
		);

		tracker.mouse_leave();
		assert_eq!(tracker.state(), PointerState::INERT);
	}

	#[test]
	fn mouse_alone_is_inert_on_touch_devices() {
		let mut tracker = ready(true);
		tracker.mouse_move(120.0, 80.0);
		let state = tracker.state();
		assert!(!state.active);
		assert_eq!((state.x, state.y), (120.0, 80.0));
	}

	#[test]
	fn touch_gesture_lifecycle() {
		let mut tracker = ready(true);
		tracker.touch_start(Some((10.0, 20.0)));
		assert!(tracker.state().active);

		tracker.touch_move(30.0, 40.0);
		assert_eq!(
			tracker.state(),
			PointerState {
				x: 30.0,
				y: 40.0,
				active: true
			}
		);

		// Leaving the canvas mid-gesture does not force relaxation.
		tracker.mouse_leave();
		assert!(tracker.state().active);

		tracker.touch_end();
		assert_eq!(tracker.state(), PointerState::INERT);
	}

	#[test]
	fn events_before_layout_are_ignored() {
		let mut tracker = PointerTracker::new(false);
		tracker.mouse_move(5.0, 5.0);
		tracker.touch_start(Some((5.0, 5.0)));
		assert_eq!(tracker.state(), PointerState::INERT);

		tracker.set_surface(100.0, 100.0);
		tracker.mouse_move(5.0, 5.0);
		assert!(tracker.state().active);

		tracker.set_surface(0.0, 100.0);
		assert_eq!(tracker.state(), PointerState::INERT);
	}
}
