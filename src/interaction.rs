//! Pointer and keyboard interaction: ray picking over the selectable
//! stars, hover highlighting, click ejection, palette and playback keys.
//!
//! The controller holds no references into the scene between events; every
//! handler takes the collaborators it touches explicitly.

use glam::{Vec2, Vec3};
use rand::Rng;
use winit::keyboard::KeyCode;

use crate::audio::AudioSystem;
use crate::camera::CameraSystem;
use crate::scene::{SceneState, StarField, StarId};
use crate::tween::TweenPlayer;

/// One ray/star-child intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub star: StarId,
    pub distance: f32,
}

/// Camera-space picking ray
#[derive(Debug, Default)]
pub struct Raycaster {
    origin: Vec3,
    direction: Vec3,
}

impl Raycaster {
    /// Aim the ray from the camera through an NDC point
    pub fn set_from_camera(&mut self, ndc: Vec2, camera: &CameraSystem) {
        let (origin, direction) = camera.unproject_ndc(ndc);
        self.origin = origin;
        self.direction = direction;
    }

    /// Intersect every selectable star, descending into both child meshes
    /// (bounding spheres). Hits are returned nearest-first.
    pub fn intersect_stars(&self, field: &StarField) -> Vec<RayHit> {
        let mut hits = Vec::new();

        for &id in field.selectable() {
            let Some(star) = field.star(id) else {
                continue;
            };
            let radius = star.bounding_radius();
            for transform in star.child_transforms() {
                let center = transform.transform_point3(Vec3::ZERO);
                if let Some(distance) = ray_sphere(self.origin, self.direction, center, radius) {
                    hits.push(RayHit { star: id, distance });
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Nearest positive intersection of a ray with a sphere
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = origin - center;
    let b = to_center.dot(direction);
    let c = to_center.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_d;
    (far >= 0.0).then_some(far)
}

/// Interaction state machine over {no-hover, hovering(star)}.
pub struct InteractionController {
    raycaster: Raycaster,
    /// The star currently under the pointer, if any. Deliberately left
    /// dangling after a click-removal until the next pointer move.
    pub intersected: Option<StarId>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            raycaster: Raycaster::default(),
            intersected: None,
        }
    }

    /// Pointer moved to (x, y) in physical pixels over a viewport of the
    /// given size: re-pick and update the hover highlight.
    pub fn on_pointer_move(
        &mut self,
        cursor: (f32, f32),
        viewport: (u32, u32),
        camera: &CameraSystem,
        stars: &mut StarField,
    ) {
        let (width, height) = viewport;
        if width == 0 || height == 0 {
            return;
        }
        let ndc = Vec2::new(
            cursor.0 / width as f32 * 2.0 - 1.0,
            -(cursor.1 / height as f32) * 2.0 + 1.0,
        );

        self.raycaster.set_from_camera(ndc, camera);
        let hits = self.raycaster.intersect_stars(stars);

        match hits.first() {
            Some(hit) => {
                if self.intersected != Some(hit.star) {
                    if let Some(previous) = self.intersected {
                        stars.unhighlight(previous);
                    }
                    self.intersected = Some(hit.star);
                    stars.highlight(hit.star);
                }
            }
            None => {
                if let Some(previous) = self.intersected.take() {
                    stars.unhighlight(previous);
                }
            }
        }
    }

    /// Pointer pressed: eject the hovered star, if any. `intersected` is
    /// not cleared; the next pointer move recomputes it.
    pub fn on_pointer_down(
        &mut self,
        stars: &mut StarField,
        tweens: &mut TweenPlayer,
        rng: &mut impl Rng,
    ) {
        if let Some(id) = self.intersected {
            stars.eject(id, tweens, rng);
        }
    }

    /// Key pressed: C cycles the palette, Space toggles playback.
    pub fn on_key_down(
        &mut self,
        key: KeyCode,
        scene: &mut SceneState,
        audio: Option<&AudioSystem>,
    ) {
        match key {
            KeyCode::KeyC => scene.cycle_palette(),
            KeyCode::Space => {
                if let Some(audio) = audio {
                    audio.play_pause();
                }
            }
            _ => {}
        }
    }

    /// Window resized: keep the camera's aspect in step. The renderer's
    /// surface is reconfigured by the app shell.
    pub fn on_resize(&mut self, width: u32, height: u32, camera: &mut CameraSystem) {
        camera.set_viewport(width, height);
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        EjectionConfig, RenderConfig, SceneLayout, StarSpawnConfig,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BASE: [f32; 3] = [0.0, 0.9, 1.0];
    const HIGHLIGHT: [f32; 3] = [1.0, 1.0, 1.0];

    /// Camera on the +Z axis looking down -Z, stars spawned on the axis
    fn picking_setup() -> (CameraSystem, StarField, TweenPlayer, StdRng) {
        let layout = SceneLayout {
            camera_eye: [0.0, 0.0, 1.0],
            camera_target: [0.0, 0.0, 0.0],
            ..SceneLayout::default()
        };
        let camera = CameraSystem::new(&layout, &RenderConfig::default());

        // Pin spawns to the view axis with a generous scale
        let spawn = StarSpawnConfig {
            x_range: (-1e-4, 1e-4),
            spawn_height: 0.0,
            z_range: (-3.0, -2.9999),
            yaw_max_deg: 1e-4,
            grow_from: 0.5,
            ..StarSpawnConfig::default()
        };
        let field = StarField::new(spawn, EjectionConfig::default(), BASE, HIGHLIGHT);
        (camera, field, TweenPlayer::new(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_ray_sphere_hits_and_misses() {
        let origin = Vec3::new(0.0, 0.0, 5.0);
        let direction = Vec3::new(0.0, 0.0, -1.0);

        let hit = ray_sphere(origin, direction, Vec3::ZERO, 1.0).unwrap();
        assert!((hit - 4.0).abs() < 1e-5);

        assert!(ray_sphere(origin, direction, Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
        // Sphere behind the origin
        assert!(ray_sphere(origin, direction, Vec3::new(0.0, 0.0, 9.0), 1.0).is_none());
        // Origin inside the sphere still yields the exit point
        let exit = ray_sphere(Vec3::ZERO, direction, Vec3::ZERO, 1.0).unwrap();
        assert!((exit - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hits_are_nearest_first() {
        let (camera, mut field, mut tweens, mut rng) = picking_setup();
        let near = field.try_spawn(&[200.0], &mut tweens, &mut rng).unwrap();

        // Second star further along the axis
        let far = field.try_spawn(&[200.0], &mut tweens, &mut rng).unwrap();
        crate::tween::TweenTargets::set_channel(
            &mut field,
            far,
            crate::tween::Channel::Position,
            Vec3::new(0.0, 0.0, -6.0),
        );

        let mut raycaster = Raycaster::default();
        raycaster.set_from_camera(Vec2::ZERO, &camera);
        let hits = raycaster.intersect_stars(&field);

        assert!(!hits.is_empty());
        assert_eq!(hits.first().unwrap().star, near);
        assert!(hits.iter().all(|hit| hit.distance >= hits[0].distance));
    }

    #[test]
    fn test_hover_sets_highlight_and_move_off_clears() {
        let (camera, mut field, mut tweens, mut rng) = picking_setup();
        let id = field.try_spawn(&[200.0], &mut tweens, &mut rng).unwrap();

        let mut controller = InteractionController::new();
        let viewport = (1280, 720);

        // Center of the window: over the star
        controller.on_pointer_move((640.0, 360.0), viewport, &camera, &mut field);
        assert_eq!(controller.intersected, Some(id));
        assert_eq!(field.star(id).unwrap().color, HIGHLIGHT);

        // Corner: off the star
        controller.on_pointer_move((5.0, 5.0), viewport, &camera, &mut field);
        assert_eq!(controller.intersected, None);
        assert_eq!(field.star(id).unwrap().color, BASE);
    }

    #[test]
    fn test_click_ejects_but_keeps_dangling_reference() {
        let (camera, mut field, mut tweens, mut rng) = picking_setup();
        let id = field.try_spawn(&[200.0], &mut tweens, &mut rng).unwrap();

        let mut controller = InteractionController::new();
        controller.on_pointer_move((640.0, 360.0), (1280, 720), &camera, &mut field);
        assert_eq!(controller.intersected, Some(id));

        controller.on_pointer_down(&mut field, &mut tweens, &mut rng);
        assert_eq!(field.selectable_len(), 0);
        // The hover reference survives the removal until the next move
        assert_eq!(controller.intersected, Some(id));

        // A second click on the dangling star is a no-op
        controller.on_pointer_down(&mut field, &mut tweens, &mut rng);
        assert_eq!(field.selectable_len(), 0);
        assert_eq!(field.stars().len(), 1);

        // The next pointer move finally clears it
        controller.on_pointer_move((640.0, 360.0), (1280, 720), &camera, &mut field);
        assert_eq!(controller.intersected, None);
    }
}
