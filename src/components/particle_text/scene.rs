//! Host-independent half of the animation driver.
//!
//! A [`Scene`] ties the mask sampler, the particle field and the pointer
//! tracker to a surface size. The browser session forwards resize and input
//! events into it and paints whatever [`Scene::frame`] returns; tests drive
//! it directly with the block-font sampler.

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{FieldConfig, Shape};
use super::field::{ParticleField, Sprite};
use super::mask::{TextMaskSampler, sample_text};
use super::pointer::PointerTracker;
use super::theme::{Color, Theme};
use super::viewport::ViewportMetrics;

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct Frame<'a> {
	pub width: f64,
	pub height: f64,
	pub theme: &'a Theme,
	pub shape: Shape,
	pub sprites: &'a [Sprite],
}

impl Frame<'_> {
	pub fn background(&self) -> Color {
		self.theme.background
	}
}

/// Sampler, field and pointer bound to one surface.
pub struct Scene {
	config: FieldConfig,
	sampler: Box<dyn TextMaskSampler>,
	field: ParticleField,
	pointer: PointerTracker,
	metrics: Option<ViewportMetrics>,
}

impl Scene {
	/// Creates an empty scene; nothing is seeded until the first
	/// [`resize`](Self::resize).
	pub fn new(
		config: FieldConfig,
		sampler: Box<dyn TextMaskSampler>,
		touch_capable: bool,
		seed: u64,
	) -> Self {
		Self {
			field: ParticleField::new(config.clone(), SmallRng::seed_from_u64(seed)),
			config,
			sampler,
			pointer: PointerTracker::new(touch_capable),
			metrics: None,
		}
	}

	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	pub fn field(&self) -> &ParticleField {
		&self.field
	}

	pub fn pointer(&self) -> &PointerTracker {
		&self.pointer
	}

	pub fn pointer_mut(&mut self) -> &mut PointerTracker {
		&mut self.pointer
	}

	pub fn metrics(&self) -> Option<&ViewportMetrics> {
		self.metrics.as_ref()
	}

	/// Rebuilds the mask for the new surface size and reseeds the field from
	/// scratch. A zero-sized surface leaves the field empty until the next
	/// resize; a sampling failure is logged and does the same.
	pub fn resize(&mut self, width: f64, height: f64) {
		let metrics = ViewportMetrics::new(&self.config, width, height);
		self.pointer
			.set_surface(metrics.width as f64, metrics.height as f64);

		let mask = sample_text(
			self.sampler.as_ref(),
			&self.config.text,
			&self.config.font,
			metrics.font_px,
			metrics.width,
			metrics.height,
		);

		match mask {
			Ok(Some(mask)) => {
				let seeded = self.field.reseed(mask, metrics.target);
				debug!(
					"scene: {}x{} ({:?}, {}px font) seeded {} particles",
					metrics.width, metrics.height, metrics.class, metrics.font_px, seeded
				);
			}
			Ok(None) => self.field.clear(),
			Err(e) => {
				warn!("scene: failed to build text mask: {}", e);
				self.field.clear();
			}
		}
		self.metrics = Some(metrics);
	}

	/// Advances the simulation one frame.
	pub fn frame(&mut self) -> Frame<'_> {
		let pointer = self.pointer.state();
		let (width, height) = self
			.metrics
			.as_ref()
			.map_or((0.0, 0.0), |m| (m.width as f64, m.height as f64));

		Frame {
			width,
			height,
			theme: &self.config.theme,
			shape: self.config.shape,
			sprites: self.field.advance(&pointer),
		}
	}
}
