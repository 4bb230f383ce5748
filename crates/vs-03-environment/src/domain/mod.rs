//! Domain layer: environment profiles and endpoint templates.

pub mod profile;
pub mod template;

pub use profile::{AccountSource, EnvironmentProfile, ProfileTable};
pub use template::{interpolate, placeholders};
