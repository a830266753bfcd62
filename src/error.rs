//! Error type for animator setup and mask sampling.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced while wiring the animation to the host page.
///
/// Per-frame conditions (a zero-sized surface, an exhausted spawn budget,
/// pointer events before layout) are never errors; they degrade to no-ops.
#[derive(Debug, Error)]
pub enum AnimatorError {
	/// `web_sys::window()` returned nothing (not running in a browser).
	#[error("no global window available")]
	NoWindow,
	/// The canvas refused to hand out a 2D rendering context.
	#[error("canvas has no 2d rendering context")]
	NoContext,
	/// A JS call threw; the payload is the debug rendering of the exception.
	#[error("javascript error: {0}")]
	Js(String),
	/// The sampler produced a buffer that does not match the surface.
	#[error("mask buffer holds {actual} bytes, expected {expected}")]
	MaskSize {
		/// Byte count implied by the surface dimensions.
		expected: usize,
		/// Byte count actually returned.
		actual: usize,
	},
}

impl From<JsValue> for AnimatorError {
	fn from(value: JsValue) -> Self {
		Self::Js(format!("{value:?}"))
	}
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnimatorError>;
