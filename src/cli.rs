//! Command-line argument parsing.

use clap::Parser;

use crate::audio::{load_wav, TrackSource};
use crate::params::RecordingConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Starwave")]
#[command(about = "Audio-reactive planetscape visualizer", long_about = None)]
pub struct Args {
    /// WAV track to play (defaults to the built-in synth line)
    #[arg(long, value_name = "FILE")]
    pub track: Option<String>,

    /// Record frames and audio to disk (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Silence the output stream (spectrum analysis still runs)
    #[arg(long)]
    pub mute: bool,
}

impl Args {
    /// Resolve the track source from the command line.
    ///
    /// A track that fails to load is an error the caller reports; the app
    /// then runs visuals-only, with playback simply never starting.
    pub fn load_track(&self) -> Result<TrackSource, String> {
        match &self.track {
            Some(path) => {
                let source = load_wav(path)?;
                println!("Track: \"{}\"", source.label());
                Ok(source)
            }
            None => {
                println!("Track: built-in synth line");
                Ok(TrackSource::Synth)
            }
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(|duration| {
            let config = RecordingConfig::new(duration);

            // Create output directories
            std::fs::create_dir_all(config.frames_dir())
                .expect("Failed to create frames directory");
            std::fs::create_dir_all(&config.output_dir).expect("Failed to create output directory");

            config
        })
    }
}
