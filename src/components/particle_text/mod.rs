//! Text-to-particle field animation.
//!
//! Renders a string as a cloud of particles anchored on the lit pixels of
//! the rasterized text:
//! - Particles ease back to their anchor and scatter away from the pointer
//! - Lives expire; expired particles are replaced somewhere else on the text
//! - Density and font size follow the viewport breakpoint
//!
//! The simulation ([`Scene`] and below) is plain Rust and runs anywhere;
//! [`AnimationSession`] and [`ParticleTextCanvas`] bind it to a browser
//! canvas.
//!
//! # Example
//!
//! ```ignore
//! use horizon_particles::{FieldConfig, ParticleTextCanvas};
//!
//! let config = FieldConfig::landing();
//! view! { <ParticleTextCanvas config=Signal::derive(move || config.clone()) /> }
//! ```

mod component;
pub mod config;
pub mod field;
pub mod glyphs;
pub mod mask;
pub mod particles;
pub mod pointer;
mod render;
pub mod scene;
pub mod session;
pub mod spacing;
pub mod theme;
pub mod viewport;

pub use component::ParticleTextCanvas;
pub use config::{FieldConfig, Preset};
pub use scene::Scene;
pub use session::AnimationSession;
pub use theme::Theme;
