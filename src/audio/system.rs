//! Audio system managing playback and spectrum analysis.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use super::analyser::spawn_analyser_thread;
use super::track::{TrackSource, SYNTH_COMPOSITION};
use crate::params::{audio_constants::BLOCK_SIZE, AnalyserConfig, RecordingConfig};

/// Audio system managing playback and spectrum analysis
pub struct AudioSystem {
    /// Shared byte-scaled spectrum (thread-safe)
    spectrum: Arc<Mutex<Vec<u8>>>,

    /// Frames played so far (frozen while paused)
    playhead_frames: Arc<AtomicUsize>,

    paused: Arc<AtomicBool>,

    /// Device output rate used for position/duration math (Hz)
    playback_rate_hz: f32,

    /// Track length in frames; `None` for the endless synth line
    total_frames: Option<usize>,

    label: String,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    /// Analysis thread handle (kept for cleanup)
    _analyser_thread: Option<thread::JoinHandle<()>>,
}

/// Produces one stereo frame at a time inside the output callback.
enum Generator {
    Wav {
        frames: Vec<[f32; 2]>,
        cursor: usize,
    },
    Synth {
        engine: Engine<BLOCK_SIZE>,
        block: Vec<[f32; 2]>,
        block_pos: usize,
    },
}

impl Generator {
    fn next_frame(&mut self) -> [f32; 2] {
        match self {
            Generator::Wav { frames, cursor } => {
                let frame = frames[*cursor];
                // Loop endlessly
                *cursor = (*cursor + 1) % frames.len();
                frame
            }
            Generator::Synth {
                engine,
                block,
                block_pos,
            } => {
                if *block_pos >= block.len() {
                    let (buffers, _) = engine.next_block(vec![]);
                    block.clear();
                    for i in 0..BLOCK_SIZE {
                        block.push([buffers[0][i], buffers[1][i]]);
                    }
                    *block_pos = 0;
                }
                let frame = block[*block_pos];
                *block_pos += 1;
                frame
            }
        }
    }
}

impl AudioSystem {
    /// Create and start the audio system with the given track source.
    pub fn new(
        config: AnalyserConfig,
        source: TrackSource,
        recording_config: Option<RecordingConfig>,
        muted: bool,
    ) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("Invalid analyser config: {}", e))?;

        let label = source.label().to_string();
        let total_frames = match &source {
            TrackSource::Wav { frames, .. } => Some(frames.len()),
            TrackSource::Synth => None,
        };

        // Build the frame generator
        let mut generator = match source {
            TrackSource::Wav { frames, .. } => Generator::Wav { frames, cursor: 0 },
            TrackSource::Synth => {
                let mut engine = Engine::<BLOCK_SIZE>::new();
                engine.set_sr(config.sample_rate_hz);
                engine.update_with_code(SYNTH_COMPOSITION);
                engine
                    .update()
                    .map_err(|e| format!("Synth engine init failed: {:?}", e))?;
                Generator::Synth {
                    engine,
                    block: Vec::with_capacity(BLOCK_SIZE),
                    block_pos: 0,
                }
            }
        };

        // Create WAV writer if recording
        let wav_writer: Option<Arc<Mutex<hound::WavWriter<std::io::BufWriter<std::fs::File>>>>> =
            match recording_config.as_ref() {
                Some(recording) => {
                    let spec = hound::WavSpec {
                        channels: 2,
                        sample_rate: config.sample_rate_hz as u32,
                        bits_per_sample: 32,
                        sample_format: hound::SampleFormat::Float,
                    };
                    let writer = hound::WavWriter::create(recording.audio_path(), spec)
                        .map_err(|e| format!("Failed to create WAV writer: {}", e))?;
                    Some(Arc::new(Mutex::new(writer)))
                }
                None => None,
            };

        // Shared state between the output callback and the analysis thread
        let samples = Arc::new(Mutex::new(Vec::<f32>::new()));
        let samples_clone = Arc::clone(&samples);

        let spectrum = Arc::new(Mutex::new(vec![0u8; config.bin_count()]));
        let spectrum_analyser = Arc::clone(&spectrum);

        let playhead_frames = Arc::new(AtomicUsize::new(0));
        let playhead_clone = Arc::clone(&playhead_frames);

        let paused = Arc::new(AtomicBool::new(false));
        let paused_clone = Arc::clone(&paused);

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;

        let device_config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get audio config: {}", e))?;

        let playback_rate_hz = device_config.sample_rate().0 as f32;

        println!(
            "Audio: {} @ {}Hz, playing \"{}\"",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            device_config.sample_rate().0,
            label
        );

        // Build audio output stream
        let stream = device
            .build_output_stream(
                &device_config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut sample_buf = samples_clone.lock().unwrap();
                    let frames_needed = data.len() / 2; // Stereo frames

                    if paused_clone.load(Ordering::Relaxed) {
                        // Silence the output and feed the analyser zeros so
                        // the published spectrum decays to rest
                        data.fill(0.0);
                        for _ in 0..frames_needed {
                            sample_buf.push(0.0);
                        }
                        if let Some(ref writer) = wav_writer {
                            if let Ok(mut w) = writer.lock() {
                                for _ in 0..frames_needed {
                                    let _ = w.write_sample(0.0f32);
                                    let _ = w.write_sample(0.0f32);
                                }
                            }
                        }
                        return;
                    }

                    for i in 0..frames_needed {
                        let [left, right] = generator.next_frame();

                        // Safety limiter: hard clip to ±0.5 to prevent ear damage
                        let left = left.clamp(-0.5, 0.5);
                        let right = right.clamp(-0.5, 0.5);

                        data[i * 2] = if muted { 0.0 } else { left };
                        data[i * 2 + 1] = if muted { 0.0 } else { right };

                        sample_buf.push(left); // Accumulate for analysis

                        // Record to WAV if recording
                        if let Some(ref writer) = wav_writer {
                            if let Ok(mut w) = writer.lock() {
                                let _ = w.write_sample(left);
                                let _ = w.write_sample(right);
                            }
                        }
                    }

                    playhead_clone.fetch_add(frames_needed, Ordering::Relaxed);
                },
                |err| eprintln!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        // Start spectrum analysis thread
        let analyser_thread = spawn_analyser_thread(config, samples, spectrum_analyser);

        Ok(Self {
            spectrum,
            playhead_frames,
            paused,
            playback_rate_hz,
            total_frames,
            label,
            _stream: stream,
            _analyser_thread: Some(analyser_thread),
        })
    }

    /// Current byte-scaled spectrum snapshot (thread-safe)
    pub fn frequency_data(&self) -> Vec<u8> {
        self.spectrum.lock().unwrap().clone()
    }

    /// Toggle playback
    pub fn play_pause(&self) {
        self.paused.fetch_xor(true, Ordering::Relaxed);
    }

    pub fn is_playing(&self) -> bool {
        !self.paused.load(Ordering::Relaxed)
    }

    /// Playback position within the current loop (seconds)
    pub fn position_s(&self) -> f32 {
        let frames = self.playhead_frames.load(Ordering::Relaxed);
        let frames = match self.total_frames {
            Some(total) => frames % total,
            None => frames,
        };
        frames as f32 / self.playback_rate_hz
    }

    /// Track length (seconds); `None` for the endless synth line
    pub fn duration_s(&self) -> Option<f32> {
        self.total_frames
            .map(|total| total as f32 / self.playback_rate_hz)
    }

    pub fn track_label(&self) -> &str {
        &self.label
    }

    /// Window-title readout: `"name" position / duration`
    pub fn now_playing(&self) -> String {
        format!(
            "\"{}\" {} / {}",
            self.label,
            seconds_to_string(self.position_s()),
            seconds_to_string(self.duration_s().unwrap_or(0.0))
        )
    }
}

/// Format seconds as `m:ss`; zero and non-finite values yield an empty
/// string (nothing sensible to display before playback starts).
pub fn seconds_to_string(seconds: f32) -> String {
    if seconds > 0.0 && seconds.is_finite() {
        let minutes = (seconds / 60.0) as u32;
        let secs = (seconds % 60.0) as u32;
        format!("{}:{:02}", minutes, secs)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_formatting() {
        assert_eq!(seconds_to_string(0.0), "");
        assert_eq!(seconds_to_string(f32::NAN), "");
        assert_eq!(seconds_to_string(59.9), "0:59");
        assert_eq!(seconds_to_string(61.0), "1:01");
        assert_eq!(seconds_to_string(600.0), "10:00");
    }
}
