//! Field animation system: a closed set of easings and a cooperative
//! tween player advanced once per frame on the main thread.
//!
//! Animations are described by `AnimationRequest` values (target channel,
//! endpoints, duration, delay, easing, optional infinite yoyo repeat) and
//! applied through the `TweenTargets` seam, so the player never holds a
//! reference into the scene between frames.

use glam::Vec3;

/// Identifies an animated entity; star ids are indices into append-only
/// storage, so they stay valid for the life of the scene.
pub type TargetId = usize;

/// Animatable vector channel on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Scale,
}

/// The closed set of easing curves used by the star lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,

    /// Elastic ease-in: winds up below the start value before snapping to
    /// the end. `amplitude` >= 1, `period` controls oscillation length.
    ElasticIn { amplitude: f32, period: f32 },

    /// Back ease-out: overshoots the end value then settles.
    BackOut { overshoot: f32 },
}

impl Easing {
    /// Sample the curve at normalized time `t` in [0, 1].
    pub fn sample(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::ElasticIn { amplitude, period } => elastic_in(t, amplitude, period),
            Easing::BackOut { overshoot } => back_out(t, overshoot),
        }
    }
}

fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    use std::f32::consts::TAU;

    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let amplitude = amplitude.max(1.0);
    let s = period / TAU * (1.0 / amplitude).asin();
    -(amplitude * 2.0_f32.powf(10.0 * (t - 1.0)) * ((t - 1.0 - s) * TAU / period).sin())
}

fn back_out(t: f32, overshoot: f32) -> f32 {
    let u = t - 1.0;
    u * u * ((overshoot + 1.0) * u + overshoot) + 1.0
}

/// Repeat behavior of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repeat {
    /// Play once and retire.
    Once,

    /// Repeat forever. With `yoyo`, alternate direction each cycle;
    /// `delay_s` holds the cycle's end value before the next cycle starts.
    Infinite { yoyo: bool, delay_s: f32 },
}

/// A structured animation request.
#[derive(Debug, Clone)]
pub struct AnimationRequest {
    pub target: TargetId,
    pub channel: Channel,

    /// Starting value. `None` captures the channel's current value when the
    /// tween activates (after its delay).
    pub from: Option<Vec3>,
    pub to: Vec3,

    /// Duration of one cycle (seconds); must be > 0
    pub duration_s: f32,

    /// Time before the tween activates (seconds)
    pub delay_s: f32,

    pub easing: Easing,
    pub repeat: Repeat,
}

/// Handle to a scheduled tween; lets the owner cancel or poll it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenHandle(u64);

/// Read/write access to animatable channels, implemented by the star field.
pub trait TweenTargets {
    fn channel(&self, target: TargetId, channel: Channel) -> Option<Vec3>;
    fn set_channel(&mut self, target: TargetId, channel: Channel, value: Vec3);
}

struct ActiveTween {
    id: u64,
    request: AnimationRequest,
    elapsed_s: f32,
    /// Resolved starting value; set on activation
    from: Option<Vec3>,
}

/// Cooperative tween player. `advance` is called once per frame from the
/// render loop; pointer handlers only schedule, never apply.
#[derive(Default)]
pub struct TweenPlayer {
    active: Vec<ActiveTween>,
    next_id: u64,
}

impl TweenPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an animation; returns a handle usable with `cancel`.
    pub fn schedule(&mut self, request: AnimationRequest) -> TweenHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(ActiveTween {
            id,
            request,
            elapsed_s: 0.0,
            from: None,
        });
        TweenHandle(id)
    }

    /// Cancel a scheduled or running tween. Returns false if it already
    /// finished or was cancelled.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|tween| tween.id != handle.0);
        self.active.len() != before
    }

    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.active.iter().any(|tween| tween.id == handle.0)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance all tweens by `dt_s` seconds, applying values to `targets`.
    /// Finished tweens and tweens whose target vanished are retired.
    pub fn advance<T: TweenTargets>(&mut self, dt_s: f32, targets: &mut T) {
        self.active.retain_mut(|tween| {
            tween.elapsed_s += dt_s;
            let local = tween.elapsed_s - tween.request.delay_s;
            if local < 0.0 {
                return true;
            }

            let from = match tween.from {
                Some(from) => from,
                None => {
                    // Activation: resolve the starting value and snap to it
                    let from = match tween.request.from {
                        Some(explicit) => explicit,
                        None => match targets.channel(tween.request.target, tween.request.channel)
                        {
                            Some(current) => current,
                            None => return false,
                        },
                    };
                    tween.from = Some(from);
                    targets.set_channel(tween.request.target, tween.request.channel, from);
                    from
                }
            };

            let duration = tween.request.duration_s.max(f32::EPSILON);
            match tween.request.repeat {
                Repeat::Once => {
                    let t = (local / duration).min(1.0);
                    let value = from.lerp(tween.request.to, tween.request.easing.sample(t));
                    targets.set_channel(tween.request.target, tween.request.channel, value);
                    t < 1.0
                }
                Repeat::Infinite { yoyo, delay_s } => {
                    let cycle_len = duration + delay_s.max(0.0);
                    let cycle = (local / cycle_len).floor() as u64;
                    let within = local - cycle as f32 * cycle_len;
                    // Clamping to 1.0 holds the end value through the
                    // repeat delay
                    let t = (within / duration).min(1.0);
                    let (a, b) = if yoyo && cycle % 2 == 1 {
                        (tween.request.to, from)
                    } else {
                        (from, tween.request.to)
                    };
                    let value = a.lerp(b, tween.request.easing.sample(t));
                    targets.set_channel(tween.request.target, tween.request.channel, value);
                    true
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Store {
        values: HashMap<(TargetId, u8), Vec3>,
    }

    fn key(channel: Channel) -> u8 {
        match channel {
            Channel::Position => 0,
            Channel::Scale => 1,
        }
    }

    impl Store {
        fn with(target: TargetId, channel: Channel, value: Vec3) -> Self {
            let mut store = Self::default();
            store.values.insert((target, key(channel)), value);
            store
        }

        fn get(&self, target: TargetId, channel: Channel) -> Vec3 {
            self.values[&(target, key(channel))]
        }
    }

    impl TweenTargets for Store {
        fn channel(&self, target: TargetId, channel: Channel) -> Option<Vec3> {
            self.values.get(&(target, key(channel))).copied()
        }

        fn set_channel(&mut self, target: TargetId, channel: Channel, value: Vec3) {
            self.values.insert((target, key(channel)), value);
        }
    }

    fn once_request(from: Option<Vec3>, to: Vec3, duration_s: f32, delay_s: f32) -> AnimationRequest {
        AnimationRequest {
            target: 0,
            channel: Channel::Scale,
            from,
            to,
            duration_s,
            delay_s,
            easing: Easing::Linear,
            repeat: Repeat::Once,
        }
    }

    #[test]
    fn test_easing_endpoints() {
        let easings = [
            Easing::Linear,
            Easing::ElasticIn {
                amplitude: 1.0,
                period: 0.4,
            },
            Easing::BackOut { overshoot: 0.3 },
        ];
        for easing in easings {
            assert!((easing.sample(0.0) - 0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.sample(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_elastic_in_winds_up_before_release() {
        let easing = Easing::ElasticIn {
            amplitude: 1.0,
            period: 0.4,
        };
        // Somewhere mid-curve the value must dip negative (the wind-up)
        let dips = (1..100).any(|i| easing.sample(i as f32 / 100.0) < -1e-4);
        assert!(dips);
    }

    #[test]
    fn test_back_out_overshoots() {
        let easing = Easing::BackOut { overshoot: 1.7 };
        let overshoots = (1..100).any(|i| easing.sample(i as f32 / 100.0) > 1.0 + 1e-4);
        assert!(overshoots);
    }

    #[test]
    fn test_tween_reaches_target_and_retires() {
        let mut store = Store::with(0, Channel::Scale, Vec3::splat(2.0));
        let mut player = TweenPlayer::new();
        player.schedule(once_request(None, Vec3::splat(4.0), 1.0, 0.0));

        player.advance(0.5, &mut store);
        assert!((store.get(0, Channel::Scale).x - 3.0).abs() < 1e-5);

        player.advance(0.6, &mut store);
        assert_eq!(store.get(0, Channel::Scale), Vec3::splat(4.0));
        assert!(player.is_empty());
    }

    #[test]
    fn test_from_to_snaps_to_start_on_activation() {
        let mut store = Store::with(0, Channel::Scale, Vec3::splat(9.0));
        let mut player = TweenPlayer::new();
        player.schedule(once_request(Some(Vec3::splat(0.01)), Vec3::splat(0.1), 1.0, 0.0));

        player.advance(1e-6, &mut store);
        assert!(store.get(0, Channel::Scale).x < 0.02);
    }

    #[test]
    fn test_delay_defers_activation() {
        let mut store = Store::with(0, Channel::Scale, Vec3::ONE);
        let mut player = TweenPlayer::new();
        let handle = player.schedule(once_request(None, Vec3::splat(5.0), 1.0, 2.0));

        player.advance(1.0, &mut store);
        assert_eq!(store.get(0, Channel::Scale), Vec3::ONE);
        assert!(player.is_active(handle));

        player.advance(1.5, &mut store);
        assert!((store.get(0, Channel::Scale).x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_yoyo_alternates_and_delay_holds() {
        let mut store = Store::with(0, Channel::Scale, Vec3::ZERO);
        let mut player = TweenPlayer::new();
        player.schedule(AnimationRequest {
            target: 0,
            channel: Channel::Scale,
            from: Some(Vec3::ZERO),
            to: Vec3::ONE,
            duration_s: 1.0,
            delay_s: 0.0,
            easing: Easing::Linear,
            repeat: Repeat::Infinite {
                yoyo: true,
                delay_s: 1.0,
            },
        });

        // End of first cycle: at `to`
        player.advance(1.0, &mut store);
        assert_eq!(store.get(0, Channel::Scale), Vec3::ONE);

        // Mid repeat delay: held at `to`
        player.advance(0.5, &mut store);
        assert_eq!(store.get(0, Channel::Scale), Vec3::ONE);

        // Halfway through the second (reversed) cycle
        player.advance(1.0, &mut store);
        assert!((store.get(0, Channel::Scale).x - 0.5).abs() < 1e-5);

        // Tween never retires
        player.advance(100.0, &mut store);
        assert_eq!(player.len(), 1);
    }

    #[test]
    fn test_cancel_removes_tween() {
        let mut store = Store::with(0, Channel::Scale, Vec3::ZERO);
        let mut player = TweenPlayer::new();
        let handle = player.schedule(once_request(None, Vec3::ONE, 10.0, 0.0));

        assert!(player.cancel(handle));
        assert!(!player.cancel(handle));
        player.advance(1.0, &mut store);
        assert_eq!(store.get(0, Channel::Scale), Vec3::ZERO);
    }

    #[test]
    fn test_missing_target_retires_tween() {
        let mut store = Store::default();
        let mut player = TweenPlayer::new();
        player.schedule(once_request(None, Vec3::ONE, 1.0, 0.0));

        player.advance(0.1, &mut store);
        assert!(player.is_empty());
    }
}
