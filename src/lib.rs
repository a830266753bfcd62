//! horizon-particles: Interactive text-to-particle field animation.
//!
//! This crate provides a WASM-based canvas component that renders a string
//! as a field of particles which scatter away from the pointer and drift
//! back into the letterforms.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;

pub use components::particle_text::{
	AnimationSession, FieldConfig, ParticleTextCanvas, Preset, Scene, Theme,
};
pub use error::AnimatorError;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("horizon-particles: logging initialized");
}

/// Load the field configuration from a script element with
/// id="particle-config".
/// Expected format: JSON with an optional "preset" key plus field overrides.
fn load_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match FieldConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"horizon-particles: loaded config for \"{}\" ({:?} expiry, {:?})",
				config.text, config.expiry, config.shape
			);
			Some(config)
		}
		Err(e) => {
			warn!("horizon-particles: failed to parse particle config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the configuration from the DOM and renders the particle canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let title = config.text.clone();
	let config_signal = Signal::derive(move || config.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text=title />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="particle-stage">
			<ParticleTextCanvas config=config_signal />
		</div>
	}
}
