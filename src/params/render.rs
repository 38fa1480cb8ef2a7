//! Rendering, recording, and color palette configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 55.0,
            near_plane: 0.01,
            far_plane: 1000.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }
}

/// Scene colors, including the five clear-color / light-color pairs cycled
/// with the C key. All colors are linear RGB triples in [0, 1].
#[derive(Debug, Clone)]
pub struct ColorPalette {
    /// Sky clear color at startup
    pub sky: [f32; 3],

    /// Base star material color
    pub star: [f32; 3],

    /// Star hover highlight color
    pub star_highlight: [f32; 3],

    /// Particle material color
    pub particle: [f32; 3],

    /// Planet body color
    pub planet: [f32; 3],

    /// Landscape material color
    pub landscape: [f32; 3],

    /// Spot light tint at startup
    pub spot: [f32; 3],

    /// Cycled (light, sky) pairs
    pub cycle: [([f32; 3], [f32; 3]); 5],
}

impl Default for ColorPalette {
    fn default() -> Self {
        let sky = hex_to_rgb("#01131E");
        Self {
            sky,
            star: hex_to_rgb("#14EBFF"),
            star_highlight: hex_to_rgb("#FFFFFF"),
            particle: hsl_to_rgb(340.0, 0.48, 0.54),
            planet: hex_to_rgb("#3F3D3D"),
            landscape: hex_to_rgb("#383948"),
            spot: hex_to_rgb("#F69C3F"),
            cycle: [
                (hex_to_rgb("#E9FF00"), hex_to_rgb("#1A1600")),
                (hex_to_rgb("#C32C40"), hex_to_rgb("#16001A")),
                (hex_to_rgb("#06FFC4"), hex_to_rgb("#001A19")),
                (hex_to_rgb("#F69C3F"), sky),
                (hex_to_rgb("#FFFFFF"), hex_to_rgb("#080808")),
            ],
        }
    }
}

/// Parse a `#RRGGBB` hex string into an RGB triple in [0, 1].
///
/// Malformed input yields black rather than an error; every call site in
/// this crate passes a literal.
pub fn hex_to_rgb(hex: &str) -> [f32; 3] {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return [0.0; 3];
    }
    let parse = |slice: &str| u8::from_str_radix(slice, 16).unwrap_or(0) as f32 / 255.0;
    [
        parse(&digits[0..2]),
        parse(&digits[2..4]),
        parse(&digits[4..6]),
    ]
}

/// Convert HSL (hue in degrees, saturation/lightness in [0, 1]) to RGB.
pub fn hsl_to_rgb(hue_deg: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let hue = hue_deg.rem_euclid(360.0) / 360.0;
    if saturation == 0.0 {
        return [lightness; 3];
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    let channel = |mut t: f32| {
        t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };

    [
        channel(hue + 1.0 / 3.0),
        channel(hue),
        channel(hue - 1.0 / 3.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(hex_to_rgb("#FFFFFF"), [1.0, 1.0, 1.0]);
        assert_eq!(hex_to_rgb("#000000"), [0.0, 0.0, 0.0]);

        let teal = hex_to_rgb("#14EBFF");
        assert!((teal[0] - 20.0 / 255.0).abs() < 1e-6);
        assert!((teal[1] - 235.0 / 255.0).abs() < 1e-6);
        assert!((teal[2] - 1.0).abs() < 1e-6);

        // Malformed input degrades to black
        assert_eq!(hex_to_rgb("#FFF"), [0.0; 3]);
    }

    #[test]
    fn test_hsl_grey_axis() {
        let grey = hsl_to_rgb(123.0, 0.0, 0.42);
        assert_eq!(grey, [0.42; 3]);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1] < 1e-5 && red[2] < 1e-5);

        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!(green[0] < 1e-5 && (green[1] - 1.0).abs() < 1e-5);

        let blue = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!((blue[2] - 1.0).abs() < 1e-5 && blue[1] < 1e-5);
    }

    #[test]
    fn test_recording_frame_count() {
        let config = RecordingConfig::new(2.5);
        assert_eq!(config.total_frames(), 150);
        assert_eq!(config.frames_dir(), "recording/frames");
    }
}
