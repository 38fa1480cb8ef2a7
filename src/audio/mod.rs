//! Audio playback and spectrum analysis.
//!
//! Plays a WAV track (or the built-in synth line) through cpal while a
//! companion thread runs FFT analysis over the outgoing samples,
//! publishing the byte-scaled spectrum the visuals react to.

mod analyser;
mod features;
mod system;
mod track;

// Re-export public types
pub use analyser::{hann_window, magnitude_to_byte};
pub use features::{feature_vector, filter_silent, split_bins};
pub use system::{seconds_to_string, AudioSystem};
pub use track::{load_wav, TrackSource, SYNTH_COMPOSITION};
