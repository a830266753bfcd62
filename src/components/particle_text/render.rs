//! Canvas 2D backend: text rasterization for the mask and per-frame painting.
//!
//! Painting order each frame:
//! 1. Clear, then fill the theme background
//! 2. One filled circle or square per sprite, glow shadow where flagged

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::config::{FontConfig, Shape};
use super::field::Sprite;
use super::mask::{OpacityMask, TextMaskSampler};
use super::scene::Frame;
use super::theme::Color;
use crate::error::Result;

/// CSS font shorthand, e.g. `"bold 140px Arial"`.
pub fn css_font(font: &FontConfig, font_px: f64) -> String {
	let weight = font.weight.trim();
	if weight.is_empty() {
		format!("{}px {}", font_px, font.family)
	} else {
		format!("{} {}px {}", weight, font_px, font.family)
	}
}

/// Rasterizes text with the canvas' own font engine and reads the alpha
/// channel back. The drawing buffer is cleared right after sampling so the
/// text never shows up on screen.
pub struct CanvasTextSampler {
	ctx: CanvasRenderingContext2d,
}

impl CanvasTextSampler {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl TextMaskSampler for CanvasTextSampler {
	fn build_mask(
		&self,
		text: &str,
		font: &FontConfig,
		font_px: f64,
		width: u32,
		height: u32,
	) -> Result<OpacityMask> {
		let ctx = &self.ctx;
		let (w, h) = (width as f64, height as f64);

		ctx.save();
		ctx.set_fill_style_str("white");
		ctx.set_font(&css_font(font, font_px));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let drawn = ctx.fill_text(text, w / 2.0, h / 2.0 + font.offset_y);
		ctx.restore();
		drawn?;

		let image = ctx.get_image_data(0.0, 0.0, w, h);
		ctx.clear_rect(0.0, 0.0, w, h);
		let image = image?;
		let data = image.data();
		OpacityMask::from_rgba(image.width(), image.height(), &data)
	}
}

/// Paints one frame.
pub fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame<'_>) {
	ctx.clear_rect(0.0, 0.0, frame.width, frame.height);
	ctx.set_fill_style_str(&frame.background().to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	let glow_css = frame.theme.glow.to_css();
	let mut fill: Option<Color> = None;
	let mut glowing = false;

	for sprite in frame.sprites {
		// Style changes are comparatively expensive; only push them when
		// they differ from the previous sprite.
		if fill != Some(sprite.color) {
			ctx.set_fill_style_str(&sprite.color.to_css());
			fill = Some(sprite.color);
		}
		if sprite.glow != glowing {
			glowing = sprite.glow;
			if glowing {
				ctx.set_shadow_color(&glow_css);
				ctx.set_shadow_blur(frame.theme.glow_blur);
			} else {
				ctx.set_shadow_color("transparent");
				ctx.set_shadow_blur(0.0);
			}
		}
		draw_sprite(ctx, frame.shape, sprite);
	}

	ctx.set_global_alpha(1.0);
	if glowing {
		ctx.set_shadow_color("transparent");
		ctx.set_shadow_blur(0.0);
	}
}

fn draw_sprite(ctx: &CanvasRenderingContext2d, shape: Shape, sprite: &Sprite) {
	ctx.set_global_alpha(sprite.alpha);
	match shape {
		Shape::Circle => {
			ctx.begin_path();
			let _ = ctx.arc(sprite.x, sprite.y, sprite.size / 2.0, 0.0, TAU);
			ctx.fill();
		}
		Shape::Square => ctx.fill_rect(sprite.x, sprite.y, sprite.size, sprite.size),
	}
}
