pub mod camera_utils;
pub mod orbit_controls;
pub mod perspective;

// Re-export main types
pub use camera_utils::{Camera, ShadowCamera, OPENGL_TO_WGPU_MATRIX};
pub use orbit_controls::{ControlInput, OrbitControls};
pub use perspective::PerspectiveCamera;
