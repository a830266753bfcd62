//! Particles and the rejection-sampling factory that places them on a mask.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::{FieldConfig, SparkleConfig, Span};
use super::mask::OpacityMask;
use super::spacing::SpacingGrid;

/// A single particle anchored to a lit mask pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Home anchor. Fixed for the particle's whole life.
	pub base_x: f64,
	pub base_y: f64,
	pub x: f64,
	pub y: f64,
	pub size: f64,
	/// Frames left before recycling. Zero marks a slot awaiting removal.
	pub life: u32,
	/// Sparkle oscillator phase, radians.
	pub phase: f64,
	/// Peak opacity of the sparkle oscillation.
	pub brightness: f64,
	/// Opacity for the current frame.
	pub opacity: f64,
}

impl Particle {
	pub fn distance_to_base(&self) -> f64 {
		(self.x - self.base_x).hypot(self.y - self.base_y)
	}
}

/// Creates particles at random lit positions.
#[derive(Clone, Debug)]
pub struct ParticleFactory {
	attempts: u32,
	size: Span,
	life: Span,
	sparkle: Option<SparkleConfig>,
}

impl ParticleFactory {
	pub fn new(config: &FieldConfig) -> Self {
		Self {
			attempts: config.attempts,
			size: config.size,
			life: config.life,
			sparkle: config.sparkle.clone(),
		}
	}

	/// Tries up to `attempts` uniformly random pixels and returns a particle on
	/// the first one that is lit and, when `spacing` is given, has room.
	///
	/// `None` means the mask has no free spot reachable within the budget; the
	/// caller should stop growing the population for now.
	pub fn create<R: Rng>(
		&self,
		mask: &OpacityMask,
		spacing: Option<&SpacingGrid>,
		rng: &mut R,
	) -> Option<Particle> {
		let (width, height) = (mask.width(), mask.height());
		if width == 0 || height == 0 {
			return None;
		}

		for _ in 0..self.attempts {
			let (x, y) = (rng.random_range(0..width), rng.random_range(0..height));
			if !mask.is_lit(x, y) {
				continue;
			}
			let (bx, by) = (x as f64, y as f64);
			if spacing.is_some_and(|grid| !grid.has_room(bx, by)) {
				continue;
			}
			return Some(self.spawn(bx, by, rng));
		}
		None
	}

	fn spawn<R: Rng>(&self, base_x: f64, base_y: f64, rng: &mut R) -> Particle {
		let mut particle = Particle {
			base_x,
			base_y,
			x: base_x,
			y: base_y,
			size: self.size.sample(rng),
			life: 0,
			phase: 0.0,
			brightness: 1.0,
			opacity: 1.0,
		};
		self.respawn(&mut particle, rng);
		particle
	}

	/// Restarts a particle in its own slot: fresh life and sparkle values,
	/// snapped back to its base.
	pub fn respawn<R: Rng>(&self, particle: &mut Particle, rng: &mut R) {
		particle.life = self.life.sample(rng).max(1.0) as u32;
		particle.x = particle.base_x;
		particle.y = particle.base_y;
		if let Some(sparkle) = &self.sparkle {
			particle.phase = rng.random::<f64>() * TAU;
			particle.brightness = sparkle.brightness.sample(rng);
			particle.opacity = particle.brightness;
		}
	}
}
