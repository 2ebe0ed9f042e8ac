//! Core rendering functionality
//!
//! The wgpu [`RenderEngine`] and the pipelines it draws with.

pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
