//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (seconds, Hz, decibels, world units)
//! - Documented ranges and meanings
//! - Type safety where possible

mod analyser;
mod render;
mod scene;
mod stars;

// Re-export all types
pub use analyser::{audio_constants, AnalyserConfig};
pub use render::{hex_to_rgb, hsl_to_rgb, ColorPalette, RecordingConfig, RenderConfig};
pub use scene::{LandscapeParams, ReactiveMapping, SceneLayout};
pub use stars::{EjectionConfig, StarSpawnConfig};
