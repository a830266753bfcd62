//! Viewport-dependent parameters.
//!
//! Centralizes everything that changes with the canvas size: which
//! breakpoint applies, the font size used for the mask, and the target
//! population. Recomputed on every resize and passed down to the sampler
//! and the field.

use super::config::FieldConfig;

/// Area the density figures are calibrated for.
pub const REFERENCE_AREA: f64 = 1920.0 * 1080.0;

/// Upper bound on the target population, whatever the configuration asks.
pub const MAX_TARGET: usize = 100_000;

/// Breakpoint class of the current viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportClass {
	/// Narrower than the configured breakpoint (phones, small tablets).
	Compact,
	Wide,
}

/// Size-derived values for one canvas size.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportMetrics {
	pub width: u32,
	pub height: u32,
	pub class: ViewportClass,
	/// Font size for the text mask, in pixels.
	pub font_px: f64,
	/// Steady-state particle count.
	pub target: usize,
}

impl ViewportMetrics {
	pub fn new(config: &FieldConfig, width: f64, height: f64) -> Self {
		let (width, height) = (width.max(0.0).floor(), height.max(0.0).floor());
		let class = if width < config.breakpoint {
			ViewportClass::Compact
		} else {
			ViewportClass::Wide
		};

		let (font_px, base_target) = match class {
			ViewportClass::Compact => (config.font.compact_px, config.density.compact),
			ViewportClass::Wide => (config.font.wide_px, config.density.wide),
		};

		let target = if config.density.scale_with_area {
			(base_target as f64 * (width * height / REFERENCE_AREA).sqrt()).floor() as usize
		} else {
			base_target
		}
		.min(MAX_TARGET);

		Self {
			width: width as u32,
			height: height as u32,
			class,
			font_px,
			target,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn breakpoint_selects_font_and_density() {
		let config = FieldConfig::horizon();

		let wide = ViewportMetrics::new(&config, 1920.0, 1080.0);
		assert_eq!(wide.class, ViewportClass::Wide);
		assert_eq!((wide.font_px, wide.target), (140.0, 12000));

		let compact = ViewportMetrics::new(&config, 390.0, 844.0);
		assert_eq!(compact.class, ViewportClass::Compact);
		assert_eq!((compact.font_px, compact.target), (80.0, 8000));

		assert_eq!(
			ViewportMetrics::new(&config, 768.0, 600.0).class,
			ViewportClass::Wide
		);
	}

	#[test]
	fn area_scaling_follows_sqrt_of_area_ratio() {
		let config = FieldConfig::landing();
		assert_eq!(ViewportMetrics::new(&config, 1920.0, 1080.0).target, 7000);
		// A quarter of the reference area halves the count.
		assert_eq!(ViewportMetrics::new(&config, 960.0, 540.0).target, 3500);
		assert_eq!(ViewportMetrics::new(&config, 0.0, 540.0).target, 0);
	}

	#[test]
	fn fractional_sizes_floor_to_pixels() {
		let metrics = ViewportMetrics::new(&FieldConfig::horizon(), 1280.7, 719.9);
		assert_eq!((metrics.width, metrics.height), (1280, 719));
		assert!(!metrics.is_empty());
		assert!(ViewportMetrics::new(&FieldConfig::horizon(), 0.0, 10.0).is_empty());
	}

	#[test]
	fn oversized_density_is_capped() {
		let mut config = FieldConfig::horizon();
		config.density.wide = 1_000_000_000;
		assert_eq!(ViewportMetrics::new(&config, 1920.0, 1080.0).target, MAX_TARGET);

		config.density.scale_with_area = true;
		assert_eq!(ViewportMetrics::new(&config, 3840.0, 2160.0).target, MAX_TARGET);
	}
}
