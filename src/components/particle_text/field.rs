//! The live particle population and its per-frame dynamics.
//!
//! Each frame every particle either scatters away from an active pointer
//! inside the influence radius, or eases back toward its base. Lives count
//! down; an expired slot is refilled in place within the same frame, and
//! slots that cannot be refilled are either dropped (mark, then sweep after
//! the pass) or restarted in place, depending on [`ExpiryPolicy`]. After
//! the pass the population is topped back up toward its target.
//!
//! The field produces one [`Sprite`] per particle per frame; painting them is
//! the renderer's job.

use log::debug;
use rand::rngs::SmallRng;

use super::config::{ExpiryPolicy, FieldConfig};
use super::mask::OpacityMask;
use super::particles::{Particle, ParticleFactory};
use super::pointer::PointerState;
use super::spacing::SpacingGrid;
use super::theme::Color;

/// Consecutive failed creations after which replenishment gives up for the
/// current frame.
pub const REPLENISH_MISS_LIMIT: u32 = 8;

/// Linear falloff of the pointer's push: 1 at the pointer, 0 at `radius`.
pub fn repulsion_force(distance: f64, radius: f64) -> f64 {
	if radius <= 0.0 {
		return 0.0;
	}
	((radius - distance) / radius).clamp(0.0, 1.0)
}

/// Paint command for one particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub color: Color,
	pub alpha: f64,
	/// Draw with the theme's glow shadow.
	pub glow: bool,
	pub scattered: bool,
}

/// Owns the particle population for one mask.
pub struct ParticleField {
	config: FieldConfig,
	factory: ParticleFactory,
	particles: Vec<Particle>,
	spacing: Option<SpacingGrid>,
	mask: Option<OpacityMask>,
	target: usize,
	rng: SmallRng,
	sprites: Vec<Sprite>,
	/// Bases of particles removed this frame; released from the spacing grid
	/// once the frame ends.
	vacated: Vec<(f64, f64)>,
}

impl ParticleField {
	pub fn new(config: FieldConfig, rng: SmallRng) -> Self {
		Self {
			factory: ParticleFactory::new(&config),
			config,
			particles: Vec::new(),
			spacing: None,
			mask: None,
			target: 0,
			rng,
			sprites: Vec::new(),
			vacated: Vec::new(),
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn target(&self) -> usize {
		self.target
	}

	pub fn mask(&self) -> Option<&OpacityMask> {
		self.mask.as_ref()
	}

	/// Drops every particle and the mask.
	pub fn clear(&mut self) {
		self.particles.clear();
		self.sprites.clear();
		self.vacated.clear();
		self.spacing = None;
		self.mask = None;
		self.target = 0;
	}

	/// Discards the population and seeds a new one on `mask`, making `target`
	/// creation attempts. Returns the resulting population size.
	pub fn reseed(&mut self, mask: OpacityMask, target: usize) -> usize {
		self.clear();
		self.spacing = self
			.config
			.spacing
			.map(|gap| SpacingGrid::new(gap, mask.width(), mask.height()));
		self.target = target;
		self.particles
			.reserve(target.min(mask.lit_count()));

		for _ in 0..target {
			if let Some(p) = self
				.factory
				.create(&mask, self.spacing.as_ref(), &mut self.rng)
			{
				if let Some(grid) = self.spacing.as_mut() {
					grid.insert(p.base_x, p.base_y);
				}
				self.particles.push(p);
			}
		}
		self.mask = Some(mask);

		debug!(
			"field: seeded {}/{} particles on {} lit pixels",
			self.particles.len(),
			target,
			self.mask.as_ref().map_or(0, OpacityMask::lit_count)
		);
		self.particles.len()
	}

	/// Advances every particle one frame and returns the paint commands.
	pub fn advance(&mut self, pointer: &PointerState) -> &[Sprite] {
		let Self {
			config,
			factory,
			particles,
			spacing,
			mask,
			target,
			rng,
			sprites,
			vacated,
		} = self;
		sprites.clear();

		let Some(mask) = mask.as_ref() else {
			return sprites.as_slice();
		};

		let radius = config.influence_radius;
		let theme = &config.theme;
		let mut removed = 0;

		for i in 0..particles.len() {
			let p = &mut particles[i];

			let mut opacity = 1.0;
			let mut glow = false;
			if let Some(sparkle) = &config.sparkle {
				p.phase += sparkle.speed;
				p.opacity = p.brightness * (p.phase.sin() * sparkle.amplitude + sparkle.offset);
				opacity = p.opacity;
				glow = theme.glow_blur > 0.0 && opacity > sparkle.glow_threshold;
			}

			let (dx, dy) = (pointer.x - p.x, pointer.y - p.y);
			let distance = dx.hypot(dy);
			let scattered = pointer.active && distance < radius;

			let color = if scattered {
				let force = repulsion_force(distance, radius);
				let angle = dy.atan2(dx);
				p.x = p.base_x - angle.cos() * force * config.scatter;
				p.y = p.base_y - angle.sin() * force * config.scatter;
				theme.scattered
			} else {
				p.x += (p.base_x - p.x) * config.homing;
				p.y += (p.base_y - p.y) * config.homing;
				if config.sparkle.is_some() {
					Color::gray(opacity)
				} else {
					theme.home
				}
			};

			sprites.push(Sprite {
				x: p.x,
				y: p.y,
				size: p.size,
				color,
				alpha: opacity.min(1.0),
				glow,
				scattered,
			});

			p.life = p.life.saturating_sub(1);
			if p.life > 0 {
				continue;
			}

			// Expired: the old particle still occupies its spot while a
			// replacement is sought.
			let (old_x, old_y) = (p.base_x, p.base_y);
			match factory.create(mask, spacing.as_ref(), rng) {
				Some(fresh) => {
					if let Some(grid) = spacing.as_mut() {
						grid.remove(old_x, old_y);
						grid.insert(fresh.base_x, fresh.base_y);
					}
					particles[i] = fresh;
				}
				None => {
					match config.expiry {
						ExpiryPolicy::Respawn => factory.respawn(&mut particles[i], rng),
						ExpiryPolicy::Remove => {
							if spacing.is_some() {
								vacated.push((old_x, old_y));
							}
							// life == 0 marks the slot for the sweep below.
							removed += 1;
						}
					}
				}
			}
		}

		if removed > 0 {
			particles.retain(|p| p.life > 0);
		}

		let mut misses = 0;
		while particles.len() < *target && misses < REPLENISH_MISS_LIMIT {
			match factory.create(mask, spacing.as_ref(), rng) {
				Some(p) => {
					misses = 0;
					if let Some(grid) = spacing.as_mut() {
						grid.insert(p.base_x, p.base_y);
					}
					particles.push(p);
				}
				None => misses += 1,
			}
		}

		// A removed particle's spot opens up from the next frame on.
		if let Some(grid) = spacing.as_mut() {
			for (x, y) in vacated.drain(..) {
				grid.remove(x, y);
			}
		}

		sprites.as_slice()
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;
	use crate::components::particle_text::config::Span;

	fn block_mask(width: u32, height: u32) -> OpacityMask {
		OpacityMask::from_fn(width, height, |x, y| {
			if (10..width - 10).contains(&x) && (10..height - 10).contains(&y) {
				255
			} else {
				0
			}
		})
	}

	fn field(config: FieldConfig) -> ParticleField {
		ParticleField::new(config, SmallRng::seed_from_u64(42))
	}

	fn long_lived(mut config: FieldConfig) -> FieldConfig {
		config.life = Span::new(10_000.0, 10_001.0);
		config
	}

	#[test]
	fn force_is_linear_and_clamped() {
		assert_eq!(repulsion_force(0.0, 150.0), 1.0);
		assert_eq!(repulsion_force(75.0, 150.0), 0.5);
		assert_eq!(repulsion_force(150.0, 150.0), 0.0);
		assert_eq!(repulsion_force(400.0, 150.0), 0.0);
		assert_eq!(repulsion_force(0.0, 0.0), 0.0);
	}

	#[test]
	fn advance_without_mask_is_a_no_op() {
		let mut field = field(FieldConfig::horizon());
		assert!(field.advance(&PointerState::INERT).is_empty());
		assert!(field.is_empty());
	}

	#[test]
	fn reseed_respects_target_and_bounds() {
		let mut field = field(FieldConfig::landing());
		let mask = block_mask(120, 80);
		let count = field.reseed(mask.clone(), 300);

		assert_eq!(count, 300);
		assert_eq!(field.target(), 300);
		for p in field.particles() {
			assert!(p.base_x >= 0.0 && p.base_x < 120.0);
			assert!(p.base_y >= 0.0 && p.base_y < 80.0);
			assert!(mask.is_lit(p.base_x as u32, p.base_y as u32));
		}
	}

	#[test]
	fn pointer_on_base_pushes_with_full_force() {
		let mut config = long_lived(FieldConfig::horizon());
		config.influence_radius = 150.0;
		let mut field = field(config.clone());
		field.reseed(block_mask(200, 200), 1);

		let p = field.particles()[0].clone();
		let pointer = PointerState {
			x: p.base_x,
			y: p.base_y,
			active: true,
		};
		let sprite = field.advance(&pointer)[0].clone();

		assert!(sprite.scattered);
		assert_eq!(sprite.color, config.theme.scattered);
		let moved = &field.particles()[0];
		assert!((moved.distance_to_base() - config.scatter).abs() < 1e-9);
	}

	#[test]
	fn scatter_points_away_from_pointer_and_is_bounded() {
		let config = long_lived(FieldConfig::landing());
		let mut field = field(config.clone());
		field.reseed(block_mask(200, 200), 200);

		let pointer = PointerState {
			x: 100.0,
			y: 100.0,
			active: true,
		};
		let before = field.particles().to_vec();
		field.advance(&pointer);

		for (p, old) in field.particles().iter().zip(&before) {
			let to_pointer = (pointer.x - old.base_x, pointer.y - old.base_y);
			if to_pointer.0.hypot(to_pointer.1) >= config.influence_radius {
				continue;
			}
			let displacement = (p.x - p.base_x, p.y - p.base_y);
			assert!(p.distance_to_base() <= config.scatter + 1e-9);
			assert!(displacement.0 * to_pointer.0 + displacement.1 * to_pointer.1 <= 1e-9);
		}
	}

	#[test]
	fn homing_converges_monotonically() {
		let config = long_lived(FieldConfig::horizon());
		let mut field = field(config);
		field.reseed(block_mask(300, 200), 400);

		let pointer = PointerState {
			x: 150.0,
			y: 100.0,
			active: true,
		};
		field.advance(&pointer);
		assert!(field.particles().iter().any(|p| p.distance_to_base() > 1.0));

		let mut last: Vec<f64> = field.particles().iter().map(Particle::distance_to_base).collect();
		for _ in 0..80 {
			field.advance(&PointerState::INERT);
			for (p, prev) in field.particles().iter().zip(last.iter_mut()) {
				let d = p.distance_to_base();
				assert!(d <= *prev + 1e-9);
				*prev = d;
			}
		}
		assert!(last.iter().all(|&d| d < 0.5));
	}

	#[test]
	fn sparkle_modulates_home_color() {
		let mut field = field(long_lived(FieldConfig::horizon()));
		field.reseed(block_mask(100, 100), 50);
		let sprites = field.advance(&PointerState::INERT);

		for s in sprites {
			assert!(!s.scattered);
			assert_eq!(s.color.r, s.color.g);
			assert_eq!(s.color.g, s.color.b);
			assert!(s.alpha > 0.0 && s.alpha <= 1.0);
		}
	}

	#[test]
	fn square_variant_paints_home_color() {
		let config = long_lived(FieldConfig::landing());
		let mut field = field(config.clone());
		field.reseed(block_mask(100, 100), 50);
		for s in field.advance(&PointerState::INERT) {
			assert_eq!(s.color, config.theme.home);
			assert_eq!(s.alpha, 1.0);
			assert!(!s.glow);
		}
	}

	#[test]
	fn expired_particles_are_replaced_the_same_frame() {
		let mut config = FieldConfig::landing();
		config.life = Span::new(1.0, 1.0);
		let mut field = field(config);
		field.reseed(block_mask(100, 100), 100);
		let before: Vec<(f64, f64)> = field.particles().iter().map(|p| (p.base_x, p.base_y)).collect();

		field.advance(&PointerState::INERT);

		assert_eq!(field.len(), 100);
		assert!(field.particles().iter().all(|p| p.life == 1));
		let after: Vec<(f64, f64)> = field.particles().iter().map(|p| (p.base_x, p.base_y)).collect();
		assert_ne!(before, after);
	}

	#[test]
	fn respawn_policy_keeps_population_when_saturated() {
		// A single lit pixel: the one particle blocks its own replacement.
		let mut config = FieldConfig::horizon();
		config.life = Span::new(1.0, 1.0);
		let mut field = field(config);
		field.reseed(OpacityMask::from_fn(8, 8, |x, y| if (x, y) == (3, 3) { 255 } else { 0 }), 5);
		assert_eq!(field.len(), 1);

		field.advance(&PointerState::INERT);

		assert_eq!(field.len(), 1);
		let p = &field.particles()[0];
		assert_eq!((p.base_x, p.base_y), (3.0, 3.0));
		assert_eq!(p.life, 1);
	}

	#[test]
	fn removal_on_saturated_mask_drops_exactly_one() {
		let mut config = FieldConfig::landing();
		config.spacing = Some(1.0);
		config.life = Span::new(1.0, 1.0);
		config.attempts = 1000;
		let mut field = field(config);
		field.reseed(OpacityMask::from_fn(8, 8, |x, y| if (x, y) == (3, 3) { 255 } else { 0 }), 1);
		assert_eq!(field.len(), 1);

		// The only lit pixel is held by the expiring particle itself.
		field.advance(&PointerState::INERT);
		assert_eq!(field.len(), 0);

		// Its spot is free again on the following frame.
		field.advance(&PointerState::INERT);
		assert_eq!(field.len(), 1);
	}

	#[test]
	fn remove_policy_refills_to_target_every_frame() {
		let mut config = FieldConfig::landing();
		config.life = Span::new(1.0, 1.0);
		config.attempts = 2;
		let mut field = field(config);
		field.reseed(block_mask(100, 100), 400);

		for _ in 0..20 {
			field.advance(&PointerState::INERT);
			assert_eq!(field.len(), 400);
		}
	}
}
