//! Spectrum analyser configuration.

/// Frequency analysis configuration with byte-scale conversion parameters.
///
/// The analyser publishes `fft_size / 2` magnitude bins, each mapped from
/// decibels onto the byte range [0, 255]. Thresholds elsewhere in the
/// codebase (planet reaction at 1, star spawn at 100) are tuned against
/// this scale.
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2); 2048 -> 1024 usable bins
    pub fft_size: usize,

    /// Spectrum refresh interval (milliseconds)
    pub update_interval_ms: u64,

    /// Magnitude mapped to byte 0 (decibels)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (decibels)
    pub max_decibels: f32,

    /// Exponential smoothing factor over linear magnitudes, in (0, 1).
    /// 0 = no smoothing, values near 1 smear heavily across updates.
    pub smoothing_time_constant: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 2048,
            update_interval_ms: 16,
            min_decibels: -100.0,
            max_decibels: -3.0,
            smoothing_time_constant: 0.8,
        }
    }
}

impl AnalyserConfig {
    /// Number of usable frequency bins published per snapshot
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.min_decibels >= self.max_decibels {
            return Err(format!(
                "min_decibels {} must be below max_decibels {}",
                self.min_decibels, self.max_decibels
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing_time_constant) {
            return Err(format!(
                "Smoothing time constant must be in [0, 1), got {}",
                self.smoothing_time_constant
            ));
        }
        Ok(())
    }
}

/// Audio constants (compile-time, match the synth engine setup)
pub mod audio_constants {
    /// Synth block size (samples per buffer)
    pub const BLOCK_SIZE: usize = 128;
}
