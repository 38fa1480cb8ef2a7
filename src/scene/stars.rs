//! Star lifecycle: peak-triggered spawning, hover highlighting, and
//! click-driven ejection.
//!
//! Storage is append-only: an ejected star leaves the selectable set but
//! keeps animating in the scene. Ejection pulses run forever; their
//! handles are retained in `pulse_handles` so an owner could cancel them,
//! but nothing ever does.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

use super::geometry::star_child_rotations;
use crate::params::{EjectionConfig, StarSpawnConfig};
use crate::tween::{
    AnimationRequest, Channel, Easing, Repeat, TweenHandle, TweenPlayer, TweenTargets,
};

/// Index into the star field's append-only storage
pub type StarId = usize;

/// A spawned star: two tetrahedron child meshes sharing one material color.
#[derive(Debug, Clone)]
pub struct Star {
    pub position: Vec3,
    /// Euler XYZ rotation (radians)
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: [f32; 3],
}

impl Star {
    fn model(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            self.position,
        )
    }

    /// World transforms of the two child meshes
    pub fn child_transforms(&self) -> [Mat4; 2] {
        let base = self.model();
        star_child_rotations().map(|local| base * local)
    }

    /// Radius of the bounding sphere around either child (unit-circumradius
    /// tetrahedra, so the scale is the radius)
    pub fn bounding_radius(&self) -> f32 {
        self.scale.max_element()
    }
}

/// Outcome of an ejection: the star's pre-removal index and, for stars
/// removed from an even index, the handle of its endless pulse tween.
#[derive(Debug, Clone, Copy)]
pub struct Ejection {
    pub index: usize,
    pub pulse: Option<TweenHandle>,
}

/// Star population manager
pub struct StarField {
    stars: Vec<Star>,
    /// Selectable ids in spawn order; capped at `spawn.max_selectable`
    selectable: Vec<StarId>,
    spawn: StarSpawnConfig,
    ejection: EjectionConfig,
    base_color: [f32; 3],
    highlight_color: [f32; 3],
    /// Handles of every scheduled pulse; retained, never cancelled
    pub pulse_handles: Vec<TweenHandle>,
}

impl StarField {
    pub fn new(
        spawn: StarSpawnConfig,
        ejection: EjectionConfig,
        base_color: [f32; 3],
        highlight_color: [f32; 3],
    ) -> Self {
        Self {
            stars: Vec::new(),
            selectable: Vec::new(),
            spawn,
            ejection,
            base_color,
            highlight_color,
            pulse_handles: Vec::new(),
        }
    }

    /// All spawned stars (including ejected ones), for rendering
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn star(&self, id: StarId) -> Option<&Star> {
        self.stars.get(id)
    }

    /// Selectable ids in spawn order
    pub fn selectable(&self) -> &[StarId] {
        &self.selectable
    }

    pub fn selectable_len(&self) -> usize {
        self.selectable.len()
    }

    /// Spawn one star if the lead feature peaks and the cap allows it.
    pub fn try_spawn(
        &mut self,
        features: &[f32],
        tweens: &mut TweenPlayer,
        rng: &mut impl Rng,
    ) -> Option<StarId> {
        let lead = *features.first()?;
        if lead < self.spawn.spawn_threshold || self.selectable.len() >= self.spawn.max_selectable
        {
            return None;
        }

        let id = self.stars.len();
        self.stars.push(Star {
            position: Vec3::new(
                rng.gen_range(self.spawn.x_range.0..self.spawn.x_range.1),
                self.spawn.spawn_height,
                rng.gen_range(self.spawn.z_range.0..self.spawn.z_range.1),
            ),
            rotation: Vec3::new(
                self.spawn.roll_deg.to_radians(),
                rng.gen_range(0.0..self.spawn.yaw_max_deg).to_radians(),
                0.0,
            ),
            scale: Vec3::splat(self.spawn.grow_from),
            color: self.base_color,
        });
        self.selectable.push(id);

        tweens.schedule(AnimationRequest {
            target: id,
            channel: Channel::Scale,
            from: Some(Vec3::splat(self.spawn.grow_from)),
            to: Vec3::splat(self.spawn.grow_to),
            duration_s: self.spawn.grow_duration_s,
            delay_s: 0.0,
            easing: Easing::ElasticIn {
                amplitude: self.spawn.grow_amplitude,
                period: self.spawn.grow_period,
            },
            repeat: Repeat::Once,
        });

        Some(id)
    }

    /// Remove a star from the selectable set and fling it away.
    ///
    /// The timeline runs in sequence: position fling, scale settle, and
    /// (only for stars removed from an even index) an endless yoyo pulse.
    /// Returns `None` when the star is not currently selectable (e.g. a
    /// dangling hover reference clicked twice).
    pub fn eject(
        &mut self,
        id: StarId,
        tweens: &mut TweenPlayer,
        rng: &mut impl Rng,
    ) -> Option<Ejection> {
        let index = self.selectable.iter().position(|&entry| entry == id)?;
        self.selectable.remove(index);

        let stage = self.ejection.stage_duration_s;
        let elastic = Easing::ElasticIn {
            amplitude: self.ejection.elastic_amplitude,
            period: self.ejection.elastic_period,
        };

        tweens.schedule(AnimationRequest {
            target: id,
            channel: Channel::Position,
            from: None,
            to: Vec3::new(
                rng.gen_range(self.ejection.x_range.0..self.ejection.x_range.1),
                rng.gen_range(self.ejection.y_range.0..self.ejection.y_range.1),
                rng.gen_range(self.ejection.z_range.0..self.ejection.z_range.1),
            ),
            duration_s: stage,
            delay_s: 0.0,
            easing: Easing::BackOut {
                overshoot: self.ejection.fling_overshoot,
            },
            repeat: Repeat::Once,
        });

        tweens.schedule(AnimationRequest {
            target: id,
            channel: Channel::Scale,
            from: None,
            to: Vec3::splat(self.ejection.settle_scale),
            duration_s: stage,
            delay_s: stage,
            easing: elastic,
            repeat: Repeat::Once,
        });

        let pulse = (index % 2 == 0).then(|| {
            let handle = tweens.schedule(AnimationRequest {
                target: id,
                channel: Channel::Scale,
                from: Some(Vec3::splat(self.ejection.pulse_scale.0)),
                to: Vec3::splat(self.ejection.pulse_scale.1),
                duration_s: stage,
                delay_s: 2.0 * stage,
                easing: elastic,
                repeat: Repeat::Infinite {
                    yoyo: true,
                    delay_s: rng.gen_range(
                        self.ejection.pulse_delay_range_s.0..self.ejection.pulse_delay_range_s.1,
                    ),
                },
            });
            self.pulse_handles.push(handle);
            handle
        });

        Some(Ejection { index, pulse })
    }

    /// Paint a star's children with the hover highlight
    pub fn highlight(&mut self, id: StarId) {
        if let Some(star) = self.stars.get_mut(id) {
            star.color = self.highlight_color;
        }
    }

    /// Restore a star's children to the base color
    pub fn unhighlight(&mut self, id: StarId) {
        if let Some(star) = self.stars.get_mut(id) {
            star.color = self.base_color;
        }
    }
}

impl TweenTargets for StarField {
    fn channel(&self, target: StarId, channel: Channel) -> Option<Vec3> {
        self.stars.get(target).map(|star| match channel {
            Channel::Position => star.position,
            Channel::Scale => star.scale,
        })
    }

    fn set_channel(&mut self, target: StarId, channel: Channel, value: Vec3) {
        if let Some(star) = self.stars.get_mut(target) {
            match channel {
                Channel::Position => star.position = value,
                Channel::Scale => star.scale = value,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> StarField {
        StarField::new(
            StarSpawnConfig::default(),
            EjectionConfig::default(),
            [0.0, 0.9, 1.0],
            [1.0, 1.0, 1.0],
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn spawn_n(field: &mut StarField, tweens: &mut TweenPlayer, rng: &mut StdRng, n: usize) {
        for _ in 0..n {
            assert!(field.try_spawn(&[200.0], tweens, rng).is_some());
        }
    }

    #[test]
    fn test_spawn_requires_peak() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        assert!(field.try_spawn(&[99.9, 150.0], &mut tweens, &mut rng).is_none());
        assert!(field.try_spawn(&[], &mut tweens, &mut rng).is_none());
        assert!(field.try_spawn(&[100.0], &mut tweens, &mut rng).is_some());
        assert_eq!(field.selectable_len(), 1);
    }

    #[test]
    fn test_spawn_placement_and_pose() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        let id = field.try_spawn(&[150.0], &mut tweens, &mut rng).unwrap();
        let star = field.star(id).unwrap();

        assert!((star.rotation.x - 90.0_f32.to_radians()).abs() < 1e-6);
        assert!(star.rotation.y >= 0.0 && star.rotation.y < 45.0_f32.to_radians());
        assert!(star.position.x >= -4.0 && star.position.x < 4.0);
        assert_eq!(star.position.y, -0.43);
        assert!(star.position.z >= -5.0 && star.position.z < -1.0);

        // Entrance tween grows the star to its resting scale
        let mut tick = 0.0;
        while tick < 1.5 {
            tweens.advance(0.05, &mut field);
            tick += 0.05;
        }
        let star = field.star(id).unwrap();
        assert!((star.scale.x - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_population_cap() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        spawn_n(&mut field, &mut tweens, &mut rng, 99);
        assert_eq!(field.selectable_len(), 99);

        // One below the cap: spawns
        assert!(field.try_spawn(&[100.0], &mut tweens, &mut rng).is_some());
        assert_eq!(field.selectable_len(), 100);

        // At the cap: refuses regardless of level
        assert!(field.try_spawn(&[255.0], &mut tweens, &mut rng).is_none());
        assert_eq!(field.selectable_len(), 100);
    }

    #[test]
    fn test_eject_removes_only_from_selectable() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        spawn_n(&mut field, &mut tweens, &mut rng, 3);
        let id = field.selectable()[1];

        let ejection = field.eject(id, &mut tweens, &mut rng).unwrap();
        assert_eq!(ejection.index, 1);
        assert_eq!(field.selectable_len(), 2);
        assert_eq!(field.stars().len(), 3);
        assert!(!field.selectable().contains(&id));

        // A second click on the same (now dangling) star does nothing
        assert!(field.eject(id, &mut tweens, &mut rng).is_none());
    }

    #[test]
    fn test_even_index_ejections_pulse_forever() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        spawn_n(&mut field, &mut tweens, &mut rng, 6);

        // Removal from index 4 (even) schedules a pulse
        let even_id = field.selectable()[4];
        let ejection = field.eject(even_id, &mut tweens, &mut rng).unwrap();
        assert_eq!(ejection.index, 4);
        let pulse = ejection.pulse.expect("even index must pulse");
        assert_eq!(field.pulse_handles, vec![pulse]);

        // Removal from index 3 (odd) does not
        let odd_id = field.selectable()[3];
        let ejection = field.eject(odd_id, &mut tweens, &mut rng).unwrap();
        assert_eq!(ejection.index, 3);
        assert!(ejection.pulse.is_none());

        // The pulse outlives any amount of animation time
        for _ in 0..400 {
            tweens.advance(0.5, &mut field);
        }
        assert!(tweens.is_active(pulse));
    }

    #[test]
    fn test_ejection_timeline_lands_on_settle_scale() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        spawn_n(&mut field, &mut tweens, &mut rng, 2);
        let id = field.selectable()[1]; // odd index: no pulse stage
        field.eject(id, &mut tweens, &mut rng).unwrap();

        let mut elapsed = 0.0;
        while elapsed < 10.5 {
            tweens.advance(0.05, &mut field);
            elapsed += 0.05;
        }

        let star = field.star(id).unwrap();
        assert!((star.scale.x - 0.8).abs() < 1e-3);
        // Flung well out of the interactive area
        assert!(star.position.y >= 2.0);
        assert!(star.position.z <= -200.0);
    }

    #[test]
    fn test_highlight_roundtrip() {
        let mut field = field();
        let mut tweens = TweenPlayer::new();
        let mut rng = rng();

        let id = field.try_spawn(&[150.0], &mut tweens, &mut rng).unwrap();
        field.highlight(id);
        assert_eq!(field.star(id).unwrap().color, [1.0, 1.0, 1.0]);
        field.unhighlight(id);
        assert_eq!(field.star(id).unwrap().color, [0.0, 0.9, 1.0]);
    }
}
