//! UI components.

pub mod particle_text;
