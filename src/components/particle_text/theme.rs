//! Colors for the particle field.
//!
//! Colors deserialize from CSS strings so page-supplied configuration can use
//! the same notation as the stylesheet.

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const BLACK: Color = Color::rgb(0, 0, 0);
	pub const WHITE: Color = Color::rgb(255, 255, 255);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Neutral gray at `level` (0.0 = black, 1.0 = white), clamped.
	pub fn gray(level: f64) -> Self {
		let v = (255.0 * level.clamp(0.0, 1.0)).floor() as u8;
		Self::rgb(v, v, v)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Self> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			if hex.len() != 6 {
				return None;
			}
			let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
			return Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?));
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let nums: Vec<&str> = body.split(',').map(str::trim).collect();
		let (r, g, b) = (
			nums.first()?.parse().ok()?,
			nums.get(1)?.parse().ok()?,
			nums.get(2)?.parse().ok()?,
		);
		let a = match nums.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(r, g, b, a))
	}
}

impl TryFrom<String> for Color {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value).ok_or_else(|| format!("unrecognized color `{value}`"))
	}
}

impl From<Color> for String {
	fn from(color: Color) -> Self {
		color.to_css()
	}
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
	/// Solid fill painted behind the particles every frame.
	pub background: Color,
	/// Particles resting at (or easing back to) their base position.
	pub home: Color,
	/// Particles displaced by the pointer.
	pub scattered: Color,
	/// Shadow color for bright sparkling particles.
	pub glow: Color,
	/// Shadow blur radius in pixels (0 disables the glow pass).
	pub glow_blur: f64,
}

impl Theme {
	/// White particles on black, cyan when scattered, soft white glow.
	pub fn horizon() -> Self {
		Self {
			background: Color::BLACK,
			home: Color::WHITE,
			scattered: Color::rgb(0, 220, 255),
			glow: Color::WHITE,
			glow_blur: 3.0,
		}
	}

	/// Same palette without glow.
	pub fn landing() -> Self {
		Self {
			glow_blur: 0.0,
			..Self::horizon()
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::horizon()
	}
}
