//! Spectrum analysis thread.
//!
//! Consumes the sample ring fed by the output callback and publishes a
//! byte-scaled magnitude spectrum: Hann window, forward FFT, per-bin
//! normalization, exponential temporal smoothing over linear magnitudes,
//! then decibel conversion mapped onto [0, 255].

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::params::AnalyserConfig;

/// Spawn the spectrum analysis thread
pub fn spawn_analyser_thread(
    config: AnalyserConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    spectrum: Arc<Mutex<Vec<u8>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut fft_input = vec![Complex::new(0.0, 0.0); config.fft_size];
        let mut fft_output = vec![Complex::new(0.0, 0.0); config.fft_size];
        let mut smoothed = vec![0.0_f32; config.bin_count()];

        loop {
            thread::sleep(Duration::from_millis(config.update_interval_ms));

            let mut sample_buf = samples.lock().unwrap();

            if sample_buf.len() >= config.fft_size {
                // Apply Hann window
                for i in 0..config.fft_size {
                    let window = hann_window(i, config.fft_size);
                    fft_input[i] = Complex::new(sample_buf[i] * window, 0.0);
                }

                // 50% overlap (drain half the buffer)
                sample_buf.drain(0..config.fft_size / 2);
                drop(sample_buf);

                // Perform FFT
                fft_output.copy_from_slice(&fft_input);
                fft.process(&mut fft_output);

                // Smooth linear magnitudes, then byte-scale
                let mut published = spectrum.lock().unwrap();
                for (i, value) in published.iter_mut().enumerate() {
                    let magnitude = fft_output[i].norm() / config.fft_size as f32;
                    smoothed[i] = config.smoothing_time_constant * smoothed[i]
                        + (1.0 - config.smoothing_time_constant) * magnitude;
                    *value =
                        magnitude_to_byte(smoothed[i], config.min_decibels, config.max_decibels);
                }
            }
        }
    })
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Map a linear magnitude onto the byte scale: decibels clamped to
/// [min_db, max_db] and spread linearly over [0, 255].
pub fn magnitude_to_byte(magnitude: f32, min_db: f32, max_db: f32) -> u8 {
    let db = 20.0 * magnitude.max(1e-12).log10();
    let scaled = (db - min_db) / (max_db - min_db) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 2048;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_silence_maps_to_zero() {
        assert_eq!(magnitude_to_byte(0.0, -100.0, -3.0), 0);
    }

    #[test]
    fn test_full_scale_maps_to_255() {
        // Anything at or above max_decibels clamps to the top byte
        assert_eq!(magnitude_to_byte(1.0, -100.0, -3.0), 255);
        let at_max = 10.0_f32.powf(-3.0 / 20.0);
        assert!(magnitude_to_byte(at_max, -100.0, -3.0) >= 254);
    }

    #[test]
    fn test_byte_scale_is_monotone() {
        let mut last = 0;
        for i in 1..=100 {
            let magnitude = i as f32 / 100.0 * 0.7;
            let byte = magnitude_to_byte(magnitude, -100.0, -3.0);
            assert!(byte >= last);
            last = byte;
        }
    }
}
