//! Render hand-off
//!
//! The renderer lives on the JS side. It gets the static scene once per level and a
//! small per-frame view afterwards, both as JSON.

use serde::Serialize;

use crate::camera::OrbitCamera;
use crate::effects::{Effects, ParticleKind};
use crate::sim::geometry::StaticCollider;
use crate::sim::level::Level;
use crate::sim::state::GameState;

/// One box or cylinder of level geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MeshView {
    Box {
        center: [f32; 3],
        size: [f32; 3],
        /// Quaternion (x, y, z, w)
        rotation: [f32; 4],
    },
    Cylinder {
        center: [f32; 3],
        radius: f32,
        height: f32,
    },
}

impl From<&StaticCollider> for MeshView {
    fn from(shape: &StaticCollider) -> Self {
        match *shape {
            StaticCollider::Box {
                center,
                half_extents,
                rotation,
            } => Self::Box {
                center: center.to_array(),
                size: (half_extents * 2.0).to_array(),
                rotation: rotation.to_array(),
            },
            StaticCollider::Cylinder {
                center,
                radius,
                half_height,
            } => Self::Cylinder {
                center: center.to_array(),
                radius,
                height: half_height * 2.0,
            },
        }
    }
}

/// Static scene, built once per level
#[derive(Debug, Clone, Serialize)]
pub struct SceneView {
    pub platforms: Vec<MeshView>,
    pub walls: Vec<MeshView>,
    pub start_pad: Option<MeshView>,
    pub finish_pad: Option<MeshView>,
    pub marble_radius: f32,
}

impl SceneView {
    pub fn new(level: &Level, marble_radius: f32) -> Self {
        Self {
            platforms: level
                .geometry
                .platforms()
                .iter()
                .map(|c| MeshView::from(&c.shape))
                .collect(),
            walls: level
                .geometry
                .walls()
                .iter()
                .map(|c| MeshView::from(&c.shape))
                .collect(),
            start_pad: level.start_pad.map(|p| MeshView::from(&p.shape())),
            finish_pad: level.finish_pad.map(|p| MeshView::from(&p.shape())),
            marble_radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub position: [f32; 3],
    pub opacity: f32,
    pub sparkle: bool,
}

/// Everything that moves, once per frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub camera: CameraView,
    pub marble_position: [f32; 3],
    /// Quaternion (x, y, z, w)
    pub marble_rotation: [f32; 4],
    pub boosting: bool,
    /// Active gems at their hover position
    pub gems: Vec<[f32; 3]>,
    pub gem_spin: f32,
    pub particles: Vec<ParticleView>,
    /// Newest first
    pub trail: Vec<[f32; 3]>,
}

impl FrameView {
    pub fn new(state: &GameState, camera: &OrbitCamera, effects: &Effects) -> Self {
        Self {
            camera: CameraView {
                eye: camera.position.to_array(),
                target: camera.target.to_array(),
                fov: camera.config.fov,
                near: camera.config.near,
                far: camera.config.far,
            },
            marble_position: state.body.position.to_array(),
            marble_rotation: state.body.orientation.to_array(),
            boosting: state.boost.boosting,
            gems: state
                .gems
                .active()
                .map(|g| effects.gem_display_position(g.position).to_array())
                .collect(),
            gem_spin: effects.gem_spin(),
            particles: effects
                .particles()
                .iter()
                .map(|p| ParticleView {
                    position: p.position.to_array(),
                    opacity: p.opacity(),
                    sparkle: p.kind == ParticleKind::Sparkle,
                })
                .collect(),
            trail: effects.trail().map(|p| p.to_array()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
