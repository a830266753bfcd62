//! Text opacity masks.
//!
//! A mask is the per-pixel alpha of a string rendered centered on a surface
//! the size of the canvas. Particles may only be anchored on lit pixels.
//! Rendering is delegated to a [`TextMaskSampler`]: the browser build reads
//! back a canvas, headless hosts use the built-in block font.

use log::debug;

use super::config::FontConfig;
use crate::error::{AnimatorError, Result};

/// Alpha strictly above this value counts as lit.
pub const LIT_THRESHOLD: u8 = 128;

/// Read-only alpha buffer covering the whole surface, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct OpacityMask {
	width: u32,
	height: u32,
	alpha: Vec<u8>,
}

impl OpacityMask {
	/// Wraps a single-channel alpha buffer.
	pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self> {
		let expected = width as usize * height as usize;
		if alpha.len() != expected {
			return Err(AnimatorError::MaskSize {
				expected,
				actual: alpha.len(),
			});
		}
		Ok(Self {
			width,
			height,
			alpha,
		})
	}

	/// Extracts the alpha channel of an RGBA buffer (as returned by
	/// `getImageData`).
	pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
		let expected = width as usize * height as usize * 4;
		if rgba.len() != expected {
			return Err(AnimatorError::MaskSize {
				expected,
				actual: rgba.len(),
			});
		}
		Self::new(width, height, rgba.chunks_exact(4).map(|px| px[3]).collect())
	}

	/// Builds a mask by evaluating `f(x, y)` for every pixel.
	pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
		let mut alpha = Vec::with_capacity(width as usize * height as usize);
		for y in 0..height {
			for x in 0..width {
				alpha.push(f(x, y));
			}
		}
		Self {
			width,
			height,
			alpha,
		}
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Alpha at `(x, y)`; zero outside the surface.
	pub fn alpha(&self, x: u32, y: u32) -> u8 {
		if x >= self.width || y >= self.height {
			return 0;
		}
		self.alpha[y as usize * self.width as usize + x as usize]
	}

	pub fn is_lit(&self, x: u32, y: u32) -> bool {
		self.alpha(x, y) > LIT_THRESHOLD
	}

	pub fn lit_count(&self) -> usize {
		self.alpha.iter().filter(|&&a| a > LIT_THRESHOLD).count()
	}
}

/// Renders text into an [`OpacityMask`].
///
/// Text is centered horizontally on the surface and vertically on
/// `height / 2 + font.offset_y`, filled fully opaque.
pub trait TextMaskSampler {
	/// Rasterizes `text` at `font_px`. Called only with non-zero dimensions.
	fn build_mask(
		&self,
		text: &str,
		font: &FontConfig,
		font_px: f64,
		width: u32,
		height: u32,
	) -> Result<OpacityMask>;
}

/// Builds a mask, or returns `None` when the surface has not been laid out
/// yet. The caller retries on the next resize.
pub fn sample_text(
	sampler: &dyn TextMaskSampler,
	text: &str,
	font: &FontConfig,
	font_px: f64,
	width: u32,
	height: u32,
) -> Result<Option<OpacityMask>> {
	if width == 0 || height == 0 {
		debug!("mask: surface is {width}x{height}, deferring until resize");
		return Ok(None);
	}
	sampler
		.build_mask(text, font, font_px, width, height)
		.map(Some)
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Solid;

	impl TextMaskSampler for Solid {
		fn build_mask(&self, _: &str, _: &FontConfig, _: f64, w: u32, h: u32) -> Result<OpacityMask> {
			Ok(OpacityMask::from_fn(w, h, |_, _| 255))
		}
	}

	#[test]
	fn threshold_is_strict() {
		let mask = OpacityMask::new(3, 1, vec![128, 129, 255]).unwrap();
		assert!(!mask.is_lit(0, 0));
		assert!(mask.is_lit(1, 0));
		assert!(mask.is_lit(2, 0));
		assert_eq!(mask.lit_count(), 2);
	}

	#[test]
	fn out_of_bounds_reads_unlit() {
		let mask = OpacityMask::from_fn(2, 2, |_, _| 255);
		assert!(mask.is_lit(1, 1));
		assert!(!mask.is_lit(2, 0));
		assert!(!mask.is_lit(0, 2));
	}

	#[test]
	fn rgba_keeps_only_alpha() {
		let rgba = [255, 255, 255, 0, 255, 255, 255, 200];
		let mask = OpacityMask::from_rgba(2, 1, &rgba).unwrap();
		assert!(!mask.is_lit(0, 0));
		assert!(mask.is_lit(1, 0));
	}

	#[test]
	fn mismatched_buffer_is_rejected() {
		assert!(matches!(
			OpacityMask::from_rgba(2, 2, &[0; 12]),
			Err(AnimatorError::MaskSize {
				expected: 16,
				actual: 12
			})
		));
	}

	#[test]
	fn zero_sized_surface_is_deferred() {
		let font = FontConfig::default();
		assert!(sample_text(&Solid, "X", &font, 10.0, 0, 100).unwrap().is_none());
		assert!(sample_text(&Solid, "X", &font, 10.0, 100, 0).unwrap().is_none());
		assert!(sample_text(&Solid, "X", &font, 10.0, 4, 4).unwrap().is_some());
	}
}
