use cgmath::{InnerSpace, Point3, Vector3};

use crate::gfx::resources::material::hex_to_rgb;

/// Maximum number of non-ambient lights passed to the shaders
pub const MAX_LIGHTS: usize = 4;

/// A light source in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform light from every direction
    Ambient { color: [f32; 3], intensity: f32 },
    /// Parallel rays travelling from `position` towards `target`
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Point3<f32>,
        target: Point3<f32>,
        casts_shadow: bool,
    },
    /// Omnidirectional light; `distance` of zero means no cutoff
    Point {
        color: [f32; 3],
        intensity: f32,
        position: Point3<f32>,
        distance: f32,
        decay: f32,
    },
}

impl Light {
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Light::Ambient {
            color: hex_to_rgb(hex),
            intensity,
        }
    }

    /// Directional light shining from `position` at the origin
    pub fn directional(hex: u32, intensity: f32, position: [f32; 3]) -> Self {
        Light::Directional {
            color: hex_to_rgb(hex),
            intensity,
            position: Point3::from(position),
            target: Point3::new(0.0, 0.0, 0.0),
            casts_shadow: false,
        }
    }

    pub fn point(hex: u32, intensity: f32, position: [f32; 3]) -> Self {
        Light::Point {
            color: hex_to_rgb(hex),
            intensity,
            position: Point3::from(position),
            distance: 0.0,
            decay: 2.0,
        }
    }

    /// Builder pattern: Enable shadow casting (directional lights only)
    pub fn with_shadow(mut self) -> Self {
        if let Light::Directional { casts_shadow, .. } = &mut self {
            *casts_shadow = true;
        } else {
            log::warn!("Only directional lights cast shadows, ignoring with_shadow()");
        }
        self
    }

    /// Builder pattern: Set the cutoff range of a point light
    pub fn with_range(mut self, range: f32, decay_rate: f32) -> Self {
        if let Light::Point { distance, decay, .. } = &mut self {
            *distance = range;
            *decay = decay_rate;
        }
        self
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient { .. })
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Directional { casts_shadow: true, .. })
    }

    /// Colour premultiplied by intensity
    pub fn radiance(&self) -> [f32; 3] {
        let (color, intensity) = match *self {
            Light::Ambient { color, intensity }
            | Light::Directional {
                color, intensity, ..
            }
            | Light::Point {
                color, intensity, ..
            } => (color, intensity),
        };
        color.map(|c| c * intensity)
    }

    /// Unit vector the light travels along, for directional lights
    pub fn direction(&self) -> Option<Vector3<f32>> {
        match *self {
            Light::Directional {
                position, target, ..
            } => {
                let dir = target - position;
                (dir.magnitude2() > 0.0).then(|| dir.normalize())
            }
            _ => None,
        }
    }
}
