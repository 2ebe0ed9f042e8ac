//! GPU resource management
//!
//! Materials, global uniforms and depth textures.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform, LightUniform};
pub use material::{hex_to_rgb, FaceCulling, MaterialDescriptor, ShadingModel};
pub use texture_resource::TextureResource;
