//! Math types for PetalStudio

pub use glam::{Quat, Vec3};

/// World-space pose of a scene object as reported by the host scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        Self {
            position,
            forward,
            up,
        }
    }

    /// Builds a transform from a position and an orientation, using -Z as
    /// forward and +Y as up in object space.
    pub fn from_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            forward: rotation * (-Vec3::Z),
            up: rotation * Vec3::Y,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::from_rotation(position, Quat::IDENTITY)
    }

    pub fn identity() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// 3D attributes pushed to the engine for an emitter or the listener.
///
/// `position` and `velocity` are already multiplied by the world's distance
/// scale; `forward` and `up` are directions and are never scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attributes3D {
    pub position: Vec3,
    pub velocity: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Attributes3D {
    /// Attributes for a transform with no motion history.
    pub fn at_rest(transform: &Transform, distance_scale: f32) -> Self {
        Self {
            position: transform.position * distance_scale,
            velocity: Vec3::ZERO,
            forward: transform.forward,
            up: transform.up,
        }
    }
}

/// Remembers the last scaled position of one emitter so velocity can be
/// estimated from consecutive ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionTracker {
    previous: Option<Vec3>,
}

impl MotionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes attributes for `transform` and records its position.
    ///
    /// Velocity is the scaled positional delta over `dt` seconds, or zero when
    /// there is no previous sample or `dt` is not positive.
    pub fn sample(&mut self, transform: &Transform, distance_scale: f32, dt: f32) -> Attributes3D {
        let mut attributes = Attributes3D::at_rest(transform, distance_scale);
        if let Some(previous) = self.previous {
            if dt > 0.0 {
                attributes.velocity = (attributes.position - previous) / dt;
            }
        }
        self.previous = Some(attributes.position);
        attributes
    }

    pub fn previous_position(&self) -> Option<Vec3> {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}
