//! Field configuration: the immutable parameters of one animation instance.
//!
//! Two presets reproduce the two pages the animator was built for; page
//! supplied JSON picks a preset and overrides individual fields.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::theme::Theme;

/// Named starting points for a configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
	/// Dense sparkling field with spacing constraint.
	#[default]
	Horizon,
	/// Sparse square dust, density scaled with the viewport area.
	Landing,
}

/// An inclusive-exclusive `[min, max)` range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Span {
	pub min: f64,
	pub max: f64,
}

impl Span {
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// Uniform sample. A degenerate span (`max <= min`) always yields `min`.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
		if self.max <= self.min {
			return self.min;
		}
		self.min + rng.random::<f64>() * (self.max - self.min)
	}

	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value < self.max
	}
}

/// Font used to rasterize the mask.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FontConfig {
	pub family: String,
	/// CSS weight keyword prefixed to the font shorthand (`"bold"`, `""`).
	pub weight: String,
	/// Font size below the breakpoint.
	pub compact_px: f64,
	/// Font size at or above the breakpoint.
	pub wide_px: f64,
	/// Vertical offset of the text center from the canvas center.
	pub offset_y: f64,
}

impl Default for FontConfig {
	fn default() -> Self {
		Self {
			family: "Arial".into(),
			weight: "bold".into(),
			compact_px: 80.0,
			wide_px: 140.0,
			offset_y: -50.0,
		}
	}
}

/// Target particle counts.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DensityConfig {
	pub compact: usize,
	pub wide: usize,
	/// Scale the count by `sqrt(area / 1920x1080)`.
	pub scale_with_area: bool,
}

impl Default for DensityConfig {
	fn default() -> Self {
		Self {
			compact: 8000,
			wide: 12000,
			scale_with_area: false,
		}
	}
}

/// What happens to a particle whose life ran out and no replacement fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
	/// Drop it; the population shrinks until replenishment finds room.
	Remove,
	/// Keep the slot: snap home and draw fresh life and sparkle values.
	Respawn,
}

/// Particle footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
	/// Filled circle with diameter `size`.
	Circle,
	/// Filled square with edge `size`, anchored at the top-left corner.
	Square,
}

/// Sinusoidal brightness flicker.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SparkleConfig {
	/// Phase advance per frame, in radians.
	pub speed: f64,
	pub amplitude: f64,
	/// Intensity center: `sin(phase) * amplitude + offset`.
	pub offset: f64,
	pub brightness: Span,
	/// Opacity above which the glow shadow is drawn.
	pub glow_threshold: f64,
}

impl Default for SparkleConfig {
	fn default() -> Self {
		Self {
			speed: 0.08,
			amplitude: 0.3,
			offset: 0.9,
			brightness: Span::new(0.9, 1.2),
			glow_threshold: 0.8,
		}
	}
}

/// Complete configuration of one particle field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
	pub text: String,
	pub font: FontConfig,
	pub density: DensityConfig,
	/// Viewport width (px) below which the compact variant applies.
	pub breakpoint: f64,
	/// Pointer influence radius in pixels.
	pub influence_radius: f64,
	/// Fraction of the remaining gap closed per frame while homing.
	pub homing: f64,
	/// Maximum scatter displacement in pixels (at zero pointer distance).
	pub scatter: f64,
	/// Life span in frames.
	pub life: Span,
	pub size: Span,
	/// Minimum distance between base positions.
	pub spacing: Option<f64>,
	/// Rejection-sampling attempts per particle creation.
	pub attempts: u32,
	pub expiry: ExpiryPolicy,
	pub shape: Shape,
	pub sparkle: Option<SparkleConfig>,
	pub theme: Theme,
}

impl FieldConfig {
	pub fn horizon() -> Self {
		Self {
			text: "HORIZON".into(),
			font: FontConfig::default(),
			density: DensityConfig::default(),
			breakpoint: 768.0,
			influence_radius: 150.0,
			homing: 0.08,
			scatter: 40.0,
			life: Span::new(300.0, 600.0),
			size: Span::new(1.5, 3.5),
			spacing: Some(2.5),
			attempts: 500,
			expiry: ExpiryPolicy::Respawn,
			shape: Shape::Circle,
			sparkle: Some(SparkleConfig::default()),
			theme: Theme::horizon(),
		}
	}

	pub fn landing() -> Self {
		Self {
			text: "POTD 5".into(),
			font: FontConfig {
				family: "Arial, sans-serif".into(),
				weight: String::new(),
				compact_px: 60.0,
				wide_px: 120.0,
				offset_y: 0.0,
			},
			density: DensityConfig {
				compact: 7000,
				wide: 7000,
				scale_with_area: true,
			},
			breakpoint: 768.0,
			influence_radius: 240.0,
			homing: 0.1,
			scatter: 60.0,
			life: Span::new(50.0, 150.0),
			size: Span::new(0.5, 1.5),
			spacing: None,
			attempts: 100,
			expiry: ExpiryPolicy::Remove,
			shape: Shape::Square,
			sparkle: None,
			theme: Theme::landing(),
		}
	}

	pub fn preset(preset: Preset) -> Self {
		match preset {
			Preset::Horizon => Self::horizon(),
			Preset::Landing => Self::landing(),
		}
	}

	/// Parses page-supplied JSON. An optional `"preset"` key selects the base
	/// configuration; every other key overrides the preset field by field.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		let mut overrides: Value = serde_json::from_str(json)?;
		let preset = match overrides.as_object_mut().and_then(|o| o.remove("preset")) {
			Some(p) => serde_json::from_value(p)?,
			None => Preset::default(),
		};

		let mut merged = serde_json::to_value(Self::preset(preset))?;
		merge(&mut merged, overrides);
		serde_json::from_value(merged)
	}
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self::horizon()
	}
}

/// Recursively overlays `overrides` onto `base`. Objects merge key by key;
/// anything else replaces.
fn merge(base: &mut Value, overrides: Value) {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) => {
			for (key, value) in overrides {
				match base.get_mut(&key) {
					Some(slot) => merge(slot, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(slot, value) => *slot = value,
	}
}
