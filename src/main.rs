//! Starwave - an audio-reactive planetscape
//!
//! A fixed camera looks across a night landscape at three planets that
//! roll and breathe with the music. Stars spawn on audio peaks; hover one
//! and click to fling it into the distance.

mod audio;
mod camera;
mod cli;
mod interaction;
mod params;
mod rendering;
mod scene;
mod tween;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::{Mat4, Vec3};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::{feature_vector, filter_silent, AudioSystem, TrackSource};
use camera::CameraSystem;
use cli::Args;
use interaction::InteractionController;
use params::*;
use rendering::{Instance, RenderSystem, Uniforms};
use scene::{SceneState, StarField};
use tween::TweenPlayer;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation state
    scene: SceneState,
    stars: StarField,
    tweens: TweenPlayer,
    interaction: InteractionController,
    camera: CameraSystem,
    audio: Option<AudioSystem>,
    rng: rand::rngs::ThreadRng,

    // Configuration
    layout: SceneLayout,
    mapping: ReactiveMapping,
    render_config: RenderConfig,
    analyser_config: AnalyserConfig,
    recording_config: Option<RecordingConfig>,
    mute: bool,

    /// Track waiting for the audio system (consumed in `resumed`)
    pending_track: Option<TrackSource>,

    // Time tracking
    last_frame: Instant,
    frame_num: usize,
    title: String,
}

impl App {
    fn new(args: Args) -> Self {
        // Create default parameters
        let layout = SceneLayout::default();
        let landscape_params = LandscapeParams::default();
        let mapping = ReactiveMapping::default();
        let render_config = RenderConfig::default();
        let analyser_config = AnalyserConfig::default();
        let palette = ColorPalette::default();
        let recording_config = args.create_recording_config();

        // Initialize simulation state
        let mut rng = rand::thread_rng();
        let scene = SceneState::new(&layout, &landscape_params, palette.clone(), &mut rng);
        let stars = StarField::new(
            StarSpawnConfig::default(),
            EjectionConfig::default(),
            palette.star,
            palette.star_highlight,
        );
        let camera = CameraSystem::new(&layout, &render_config);

        // A track that fails to load leaves the app visuals-only
        let pending_track = match args.load_track() {
            Ok(track) => Some(track),
            Err(e) => {
                eprintln!("Audio track unavailable: {}", e);
                None
            }
        };

        Self {
            window: None,
            render_system: None,
            scene,
            stars,
            tweens: TweenPlayer::new(),
            interaction: InteractionController::new(),
            camera,
            audio: None,
            rng,
            layout,
            mapping,
            render_config,
            analyser_config,
            recording_config,
            mute: args.mute,
            pending_track,
            last_frame: Instant::now(),
            frame_num: 0,
            title: String::new(),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Starwave - Audio-Reactive Planetscape")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.scene,
            self.recording_config.clone(),
        ))
        .unwrap();

        // Initialize audio; failure leaves the visuals running silently
        self.audio = self.pending_track.take().and_then(|source| {
            match AudioSystem::new(
                self.analyser_config.clone(),
                source,
                self.recording_config.clone(),
                self.mute,
            ) {
                Ok(audio) => Some(audio),
                Err(e) => {
                    eprintln!("Audio unavailable: {} (visuals only)", e);
                    None
                }
            }
        });

        println!("\nStarwave is running!");
        println!("Hover a star and click to fling it away.");
        println!("C cycles colors, Space toggles playback, ESC quits\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                code => self
                    .interaction
                    .on_key_down(code, &mut self.scene, self.audio.as_ref()),
            },
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.interaction.on_pointer_move(
                        (position.x as f32, position.y as f32),
                        (size.width, size.height),
                        &self.camera,
                        &mut self.stars,
                    );
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.interaction
                    .on_pointer_down(&mut self.stars, &mut self.tweens, &mut self.rng);
            }
            WindowEvent::Resized(size) => {
                self.interaction
                    .on_resize(size.width, size.height, &mut self.camera);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame: sample the spectrum, update the scene and
    /// star population, advance animations, submit to the renderer.
    fn render_frame(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.render_system.is_none() {
            return;
        }

        let now = Instant::now();
        let dt_s = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        // Reduce the current spectrum snapshot to the feature vector
        let features = match &self.audio {
            Some(audio) => filter_silent(feature_vector(&audio.frequency_data())),
            None => Vec::new(),
        };

        self.scene.update(&features, &self.mapping);
        self.stars
            .try_spawn(&features, &mut self.tweens, &mut self.rng);
        self.tweens.advance(dt_s, &mut self.stars);
        self.refresh_title();

        // Assemble this frame's instances
        let light_dir = -Vec3::from_array(self.layout.key_light_position).normalize();
        let ambient = self.layout.ambient_level;
        let spot = self.scene.spot_color;
        let uniforms = Uniforms {
            view_proj: self.camera.view_proj().to_cols_array_2d(),
            light_dir: [light_dir.x, light_dir.y, light_dir.z, 0.0],
            light_color: [spot[0], spot[1], spot[2], 0.0],
            ambient: [ambient, ambient, ambient, 0.0],
        };
        let spheres = sphere_instances(&self.scene);
        let star_children = star_instances(&self.stars);
        let ring = Instance::new(self.scene.planets.big.model(), [1.0, 1.0, 1.0]);

        let render_system = self.render_system.as_mut().unwrap();
        render_system.update_frame(&uniforms, &spheres, &star_children, ring);

        match render_system.render(self.scene.sky_color, self.frame_num) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    render_system.resize(size.width, size.height);
                }
            }
            Err(e) => eprintln!("Render error: {:?}", e),
        }

        self.frame_num += 1;

        if let Some(recording) = &self.recording_config {
            if self.frame_num >= recording.total_frames() {
                println!("Recording complete: {} frames", self.frame_num);
                event_loop.exit();
            }
        }
    }

    /// Keep the window title's now-playing readout current
    fn refresh_title(&mut self) {
        let (Some(window), Some(audio)) = (&self.window, &self.audio) else {
            return;
        };
        let title = format!("Starwave - {}", audio.now_playing());
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}

/// Instances for the sphere mesh: the three planets, then the particles
fn sphere_instances(scene: &SceneState) -> Vec<Instance> {
    let mut instances = Vec::with_capacity(3 + scene.particles.len());

    for planet in [
        &scene.planets.big,
        &scene.planets.medium,
        &scene.planets.small,
    ] {
        instances.push(Instance::new(planet.model(), planet.color));
    }

    let particle_color = scene.particle_color();
    for particle in &scene.particles {
        let model = Mat4::from_translation(particle.position)
            * Mat4::from_scale(Vec3::splat(particle.scale));
        instances.push(Instance::new(model, particle_color));
    }

    instances
}

/// Instances for the tetrahedron mesh: both children of every spawned star
fn star_instances(stars: &StarField) -> Vec<Instance> {
    let mut instances = Vec::with_capacity(stars.stars().len() * 2);
    for star in stars.stars() {
        for transform in star.child_transforms() {
            instances.push(Instance::new(transform, star.color));
        }
    }
    instances
}

fn main() {
    let args = Args::parse();

    println!("Starwave - audio-reactive planetscape");
    println!("Initializing systems...\n");

    let mut app = App::new(args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
