//! Headless block-font text sampler.
//!
//! Each glyph is a 5x7 bitmap scaled so its height equals the font size.
//! Used wherever no canvas is available (native tests, offline tooling); the
//! layout rules match [`CanvasTextSampler`](super::render::CanvasTextSampler).

use super::config::FontConfig;
use super::mask::{OpacityMask, TextMaskSampler};
use crate::error::Result;

const GLYPH_COLS: i64 = 5;
const GLYPH_ROWS: i64 = 7;
/// Glyph width plus one blank column.
const ADVANCE_COLS: i64 = GLYPH_COLS + 1;

/// Bitmap rows for `c`, top to bottom, bit 4 = leftmost column.
/// Lowercase folds to uppercase; unsupported characters render blank.
fn glyph(c: char) -> [u8; 7] {
	match c.to_ascii_uppercase() {
		'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
		'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
		'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
		'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
		'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
		'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
		'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
		'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
		'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
		'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
		'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
		'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
		'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
		'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
		'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
		'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
		'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
		'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
		'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
		'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
		'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
		'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
		'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
		'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
		'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
		'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
		'0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
		'1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
		'2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
		'3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
		'4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
		'5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
		'6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
		'7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
		'8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
		'9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
		'-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
		'.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
		'!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
		_ => [0; 7],
	}
}

/// Rasterizes text with a built-in 5x7 block font. Font family and weight
/// are ignored; only the size and vertical offset apply.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockFontSampler;

impl TextMaskSampler for BlockFontSampler {
	fn build_mask(
		&self,
		text: &str,
		font: &FontConfig,
		font_px: f64,
		width: u32,
		height: u32,
	) -> Result<OpacityMask> {
		let glyphs: Vec<[u8; 7]> = text.chars().map(glyph).collect();
		if glyphs.is_empty() || font_px <= 0.0 {
			return Ok(OpacityMask::from_fn(width, height, |_, _| 0));
		}

		let cell = font_px / GLYPH_ROWS as f64;
		let total_cols = glyphs.len() as i64 * ADVANCE_COLS - 1;
		let left = width as f64 / 2.0 - total_cols as f64 * cell / 2.0;
		let top = height as f64 / 2.0 + font.offset_y - GLYPH_ROWS as f64 * cell / 2.0;

		Ok(OpacityMask::from_fn(width, height, |x, y| {
			// Sample at the pixel center.
			let col = ((x as f64 + 0.5 - left) / cell).floor() as i64;
			let row = ((y as f64 + 0.5 - top) / cell).floor() as i64;
			if col < 0 || col >= total_cols || !(0..GLYPH_ROWS).contains(&row) {
				return 0;
			}
			let within = col % ADVANCE_COLS;
			if within == GLYPH_COLS {
				return 0;
			}
			let bits = glyphs[(col / ADVANCE_COLS) as usize][row as usize];
			if (bits >> (GLYPH_COLS - 1 - within)) & 1 == 1 {
				255
			} else {
				0
			}
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn font() -> FontConfig {
		FontConfig {
			offset_y: 0.0,
			..FontConfig::default()
		}
	}

	#[test]
	fn text_is_centered() {
		let mask = BlockFontSampler.build_mask("I", &font(), 70.0, 200, 100).unwrap();
		// "I" is lit along its center column (cell = 10px, glyph spans 75..125).
		assert!(mask.is_lit(100, 50));
		assert!(mask.is_lit(100, 20));
		assert!(!mask.is_lit(100, 10));
		assert!(!mask.is_lit(70, 50));
		assert!(!mask.is_lit(130, 50));
	}

	#[test]
	fn offset_moves_text_vertically() {
		let shifted = FontConfig {
			offset_y: -30.0,
			..font()
		};
		let mask = BlockFontSampler.build_mask("I", &shifted, 70.0, 200, 100).unwrap();
		assert!(mask.is_lit(100, 20));
		assert!(!mask.is_lit(100, 60));
	}

	#[test]
	fn lowercase_matches_uppercase() {
		let upper = BlockFontSampler.build_mask("HI", &font(), 35.0, 120, 60).unwrap();
		let lower = BlockFontSampler.build_mask("hi", &font(), 35.0, 120, 60).unwrap();
		assert_eq!(upper, lower);
		assert!(upper.lit_count() > 0);
	}

	#[test]
	fn blank_text_produces_empty_mask() {
		for text in ["", "   ", "@@"] {
			let mask = BlockFontSampler.build_mask(text, &font(), 70.0, 50, 50).unwrap();
			assert_eq!(mask.lit_count(), 0);
		}
	}

	#[test]
	fn mask_covers_whole_surface() {
		let mask = BlockFontSampler.build_mask("HORIZON", &font(), 140.0, 1920, 1080).unwrap();
		assert_eq!((mask.width(), mask.height()), (1920, 1080));
		assert!(mask.lit_count() > 20_000);
	}
}
