//! Visual feedback driven by simulation events
//!
//! Jump bursts, gem sparkles, the marble trail and the gem hover animation. None
//! of this feeds back into the simulation.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::state::{GameEvent, GameState};

/// Particles per jump burst
pub const JUMP_BURST: usize = 10;
/// Sparks per collected gem
pub const SPARKLE_COUNT: usize = 8;
/// Full trail length (points)
pub const TRAIL_LENGTH: usize = 50;
/// Trail only grows while the marble moves faster than this
pub const TRAIL_MIN_SPEED: f32 = 1.0;
/// Gravity on burst particles
const PARTICLE_GRAVITY: f32 = 9.8;

/// Gem hover amplitude
pub const GEM_BOB_AMPLITUDE: f32 = 0.5;
/// Gem bob angular rate (rad/s)
pub const GEM_BOB_RATE: f32 = 2.0;
/// Gem spin per frame (rad)
pub const GEM_SPIN_PER_FRAME: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Dust kicked up by a jump
    Burst,
    /// Flies outward from a collected gem
    Sparkle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub kind: ParticleKind,
    pub position: Vec3,
    pub velocity: Vec3,
    /// 1 at spawn, removed at 0
    pub life: f32,
}

impl Particle {
    /// Opacity the renderer should use
    pub fn opacity(&self) -> f32 {
        match self.kind {
            ParticleKind::Burst => self.life * 0.6,
            ParticleKind::Sparkle => self.life,
        }
    }
}

/// All presentation-side effect state
#[derive(Debug, Clone)]
pub struct Effects {
    rng: Pcg32,
    particles: Vec<Particle>,
    max_particles: usize,
    /// Newest point first
    trail: VecDeque<Vec3>,
    trail_capacity: usize,
    /// Seconds of animation time, drives the gem bob
    anim_time: f32,
    gem_spin: f32,
    reduced_motion: bool,
}

impl Effects {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            trail_capacity: settings.trail_length(TRAIL_LENGTH),
            anim_time: 0.0,
            gem_spin: 0.0,
            reduced_motion: settings.reduced_motion,
        }
    }

    /// Pick up changed settings without losing live effects
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        self.trail_capacity = settings.trail_length(TRAIL_LENGTH);
        self.reduced_motion = settings.reduced_motion;
        self.particles.truncate(self.max_particles);
        self.trail.truncate(self.trail_capacity);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Trail points, newest first
    pub fn trail(&self) -> impl Iterator<Item = &Vec3> {
        self.trail.iter()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// React to simulation events
    pub fn handle_event(&mut self, event: &GameEvent, marble_radius: f32) {
        match *event {
            GameEvent::Jumped { position } => {
                self.spawn_burst(position - Vec3::new(0.0, marble_radius, 0.0));
            }
            GameEvent::GemCollected { position, .. } => self.spawn_sparkles(position),
            GameEvent::LevelReset => {
                self.trail.clear();
                self.particles.clear();
            }
            GameEvent::SessionStarted | GameEvent::LevelCompleted(_) => {}
        }
    }

    fn push(&mut self, particle: Particle) {
        if self.particles.len() < self.max_particles {
            self.particles.push(particle);
        }
    }

    fn spawn_burst(&mut self, origin: Vec3) {
        for _ in 0..JUMP_BURST {
            let velocity = Vec3::new(
                self.rng.random_range(-1.0..1.0),
                self.rng.random_range(1.0..3.0),
                self.rng.random_range(-1.0..1.0),
            );
            self.push(Particle {
                kind: ParticleKind::Burst,
                position: origin,
                velocity,
                life: 1.0,
            });
        }
    }

    fn spawn_sparkles(&mut self, origin: Vec3) {
        for i in 0..SPARKLE_COUNT {
            let angle = i as f32 / SPARKLE_COUNT as f32 * TAU;
            // Per-frame step of 0.1-0.2 at 60 Hz
            let speed = self.rng.random_range(6.0..12.0);
            self.push(Particle {
                kind: ParticleKind::Sparkle,
                position: origin,
                velocity: Vec3::new(angle.cos(), angle.sin(), 0.0) * speed,
                life: 1.0,
            });
        }
    }

    /// Advance particles, extend the trail and the hover animation
    pub fn update(&mut self, dt: f32, state: &GameState) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        for p in &mut self.particles {
            p.life -= dt * 2.0;
            if p.kind == ParticleKind::Burst {
                p.velocity.y -= PARTICLE_GRAVITY * dt;
            }
            p.position += p.velocity * dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        if self.trail_capacity > 0 && state.body.velocity.length() > TRAIL_MIN_SPEED {
            self.trail.push_front(state.body.position);
            self.trail.truncate(self.trail_capacity);
        }

        self.anim_time += dt;
        self.gem_spin = (self.gem_spin + GEM_SPIN_PER_FRAME) % TAU;
    }

    /// Rendered gem position: hovers around its pickup position
    pub fn gem_display_position(&self, position: Vec3) -> Vec3 {
        if self.reduced_motion {
            return position;
        }
        let bob = (self.anim_time * GEM_BOB_RATE).sin() * GEM_BOB_AMPLITUDE;
        position + Vec3::new(0.0, bob, 0.0)
    }

    /// Shared gem yaw (radians)
    pub fn gem_spin(&self) -> f32 {
        self.gem_spin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects() -> Effects {
        Effects::new(7, &Settings::default())
    }

    #[test]
    fn test_jump_burst_below_marble() {
        let mut fx = effects();
        let pos = Vec3::new(1.0, 2.0, 3.0);
        fx.handle_event(&GameEvent::Jumped { position: pos }, 0.5);
        assert_eq!(fx.particles().len(), JUMP_BURST);
        for p in fx.particles() {
            assert_eq!(p.position, Vec3::new(1.0, 1.5, 3.0));
            assert!(p.velocity.y >= 1.0 && p.velocity.y < 3.0);
        }
    }

    #[test]
    fn test_particles_expire() {
        let mut fx = effects();
        let state = GameState::default_course();
        fx.handle_event(
            &GameEvent::GemCollected {
                position: Vec3::ZERO,
                remaining: 7,
            },
            0.5,
        );
        assert_eq!(fx.particles().len(), SPARKLE_COUNT);
        for _ in 0..40 {
            fx.update(1.0 / 60.0, &state);
        }
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut settings = Settings::default();
        settings.particles = false;
        let mut fx = Effects::new(1, &settings);
        fx.handle_event(&GameEvent::Jumped { position: Vec3::ZERO }, 0.5);
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn test_trail_grows_only_when_moving() {
        let mut fx = Effects::new(3, &Settings::from_preset(crate::settings::QualityPreset::High));
        let mut state = GameState::default_course();
        state.body.velocity = Vec3::ZERO;
        fx.update(0.016, &state);
        assert_eq!(fx.trail_len(), 0);

        state.body.velocity = Vec3::new(5.0, 0.0, 0.0);
        for _ in 0..80 {
            fx.update(0.016, &state);
        }
        assert_eq!(fx.trail_len(), TRAIL_LENGTH);

        fx.handle_event(&GameEvent::LevelReset, 0.5);
        assert_eq!(fx.trail_len(), 0);
    }

    #[test]
    fn test_gem_bob_bounded() {
        let mut fx = effects();
        let state = GameState::default_course();
        let base = Vec3::new(0.0, 2.0, 0.0);
        for _ in 0..200 {
            fx.update(1.0 / 60.0, &state);
            let shown = fx.gem_display_position(base);
            assert!((shown.y - base.y).abs() <= GEM_BOB_AMPLITUDE + 1e-6);
            assert!(fx.gem_spin() >= 0.0 && fx.gem_spin() < TAU);
        }
    }

    #[test]
    fn test_same_seed_same_burst() {
        let mut a = effects();
        let mut b = effects();
        let event = GameEvent::Jumped { position: Vec3::ONE };
        a.handle_event(&event, 0.5);
        b.handle_event(&event, 0.5);
        assert_eq!(a.particles(), b.particles());
    }
}
