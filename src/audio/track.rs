//! Track sources: decoded WAV files and the procedural fallback line.

use std::path::Path;

/// Synth composition played when no track is given (Glicol code)
pub const SYNTH_COMPOSITION: &str = r#"
~gate: speed 1.5 >> seq 48 _48 _~n 55
~n: choose 55 55 60 67 0 0 0
~amp: ~gate >> envperc 0.002 0.12
~pit: ~gate >> mul 220.0
~bed: squ ~pit >> mul ~amp >> lpf ~sweep 4.0 >> mul 0.12
~sweep: sin 0.13 >> mul 900 >> add 1100
o: ~bed >> plate 0.08
"#;

/// What the audio system plays.
#[derive(Debug)]
pub enum TrackSource {
    /// Decoded WAV track, looped endlessly
    Wav {
        /// Display name (file name without directories)
        label: String,
        /// Interleaved stereo frames
        frames: Vec<[f32; 2]>,
        /// Sample rate the file was authored at (Hz)
        sample_rate: u32,
    },

    /// Built-in procedural composition
    Synth,
}

impl TrackSource {
    pub fn label(&self) -> &str {
        match self {
            TrackSource::Wav { label, .. } => label,
            TrackSource::Synth => "synth line",
        }
    }

    /// Track length in seconds; `None` for the endless synth line.
    pub fn duration_s(&self) -> Option<f32> {
        match self {
            TrackSource::Wav {
                frames,
                sample_rate,
                ..
            } => Some(frames.len() as f32 / *sample_rate as f32),
            TrackSource::Synth => None,
        }
    }
}

/// Decode a WAV file into stereo f32 frames.
///
/// Accepts 16-bit integer and 32-bit float samples; mono files are
/// duplicated across both channels.
pub fn load_wav(path: &str) -> Result<TrackSource, String> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| format!("Failed to decode {}: {}", path, e))?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample != 16 {
                return Err(format!(
                    "{}: unsupported bit depth {} (expected 16-bit int or 32-bit float)",
                    path, spec.bits_per_sample
                ));
            }
            reader
                .samples::<i16>()
                .map(|sample| sample.map(|s| s as f32 / i16::MAX as f32))
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Failed to decode {}: {}", path, e))?
        }
    };

    let frames: Vec<[f32; 2]> = match spec.channels {
        1 => samples.iter().map(|&s| [s, s]).collect(),
        2 => samples.chunks_exact(2).map(|lr| [lr[0], lr[1]]).collect(),
        n => return Err(format!("{}: unsupported channel count {}", path, n)),
    };

    if frames.is_empty() {
        return Err(format!("{}: no audio frames", path));
    }

    let label = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    Ok(TrackSource::Wav {
        label,
        frames,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synth_source_has_no_duration() {
        let source = TrackSource::Synth;
        assert_eq!(source.duration_s(), None);
        assert_eq!(source.label(), "synth line");
    }

    #[test]
    fn test_wav_duration_from_frame_count() {
        let source = TrackSource::Wav {
            label: "test.wav".to_string(),
            frames: vec![[0.0, 0.0]; 44100],
            sample_rate: 44100,
        };
        assert_eq!(source.duration_s(), Some(1.0));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let result = load_wav("/no/such/file.wav");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("/no/such/file.wav"));
    }
}
