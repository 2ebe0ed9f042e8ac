//! Material descriptors
//!
//! Materials are plain values attached to each object. The renderer packs
//! them into the per-object uniform, so there is no shared material store.

use crate::error::{Result, SceneError};

/// Lighting model used when shading a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShadingModel {
    /// Flat colour, ignores lights and shadows
    Unlit,
    /// Diffuse only
    #[default]
    Lambert,
    /// Diffuse plus a roughness/metalness specular approximation
    Standard,
}

impl ShadingModel {
    /// Value written to the shader's `shading` parameter
    pub fn shader_index(self) -> u32 {
        match self {
            ShadingModel::Unlit => 0,
            ShadingModel::Lambert => 1,
            ShadingModel::Standard => 2,
        }
    }
}

/// Which faces of a mesh are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FaceCulling {
    /// Outside only
    #[default]
    Front,
    /// Inside only
    Back,
    /// Both sides
    Double,
}

impl FaceCulling {
    /// The faces the pipeline must discard to render this side
    pub fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            FaceCulling::Front => Some(wgpu::Face::Back),
            FaceCulling::Back => Some(wgpu::Face::Front),
            FaceCulling::Double => None,
        }
    }
}

/// Surface appearance of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDescriptor {
    /// Linear RGB
    pub color: [f32; 3],
    pub shading: ShadingModel,
    pub side: FaceCulling,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            shading: ShadingModel::default(),
            side: FaceCulling::default(),
            roughness: 1.0,
            metalness: 0.0,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 1.0,
        }
    }
}

impl MaterialDescriptor {
    pub fn new(color: [f32; 3], shading: ShadingModel) -> Self {
        Self {
            color,
            shading,
            ..Default::default()
        }
    }

    /// Creates a material from a `0xRRGGBB` colour
    pub fn from_hex(hex: u32, shading: ShadingModel) -> Self {
        Self::new(hex_to_rgb(hex), shading)
    }

    pub fn unlit(hex: u32) -> Self {
        Self::from_hex(hex, ShadingModel::Unlit)
    }

    pub fn lambert(hex: u32) -> Self {
        Self::from_hex(hex, ShadingModel::Lambert)
    }

    pub fn standard(hex: u32) -> Self {
        Self::from_hex(hex, ShadingModel::Standard)
    }

    /// Builder pattern: Set which faces are drawn
    pub fn with_side(mut self, side: FaceCulling) -> Self {
        self.side = side;
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    /// Builder pattern: Set metalness factor
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    /// Builder pattern: Set emissive colour and intensity
    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = hex_to_rgb(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self
            .color
            .iter()
            .chain(&self.emissive)
            .any(|c| !c.is_finite() || *c < 0.0)
        {
            return Err(SceneError::invalid(
                "material",
                "colour components must be finite and non-negative",
            ));
        }
        for (name, value) in [("roughness", self.roughness), ("metalness", self.metalness)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SceneError::invalid(
                    "material",
                    format!("{} must be in [0, 1], got {}", name, value),
                ));
            }
        }
        if !(self.emissive_intensity.is_finite() && self.emissive_intensity >= 0.0) {
            return Err(SceneError::invalid(
                "material",
                format!(
                    "emissive intensity must be non-negative, got {}",
                    self.emissive_intensity
                ),
            ));
        }
        Ok(())
    }

    /// Emissive colour scaled by its intensity
    pub fn emissive_radiance(&self) -> [f32; 3] {
        self.emissive.map(|c| c * self.emissive_intensity)
    }
}

/// Splits `0xRRGGBB` into linear RGB
///
/// Colours given as hex are treated as sRGB and converted, so that the
/// surface format's sRGB encode gives back the written value.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
