//! Leptos component wrapping the particle text canvas.
//!
//! The component only mounts the canvas element; sizing, input and the
//! animation loop belong to the [`AnimationSession`] it starts once the
//! element exists. The session is stopped when the component unmounts.

use leptos::prelude::*;
use log::error;
use web_sys::HtmlCanvasElement;

use super::config::FieldConfig;
use super::session::AnimationSession;

/// Renders `config.text` as an interactive particle field filling the
/// viewport.
///
/// The configuration is read once when the canvas mounts; later changes to
/// the signal do not restart the animation.
#[component]
pub fn ParticleTextCanvas(#[prop(into)] config: Signal<FieldConfig>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = StoredValue::new_local(None::<AnimationSession>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if session.with_value(Option::is_some) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();

		match AnimationSession::start(canvas, config.get_untracked()) {
			Ok(started) => session.set_value(Some(started)),
			Err(e) => error!("particle-text: failed to start animation: {}", e),
		}
	});

	on_cleanup(move || {
		session.try_update_value(|s| {
			if let Some(s) = s.as_mut() {
				s.stop();
			}
		});
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-text-canvas"
			style="display: block; touch-action: none;"
		/>
	}
}
