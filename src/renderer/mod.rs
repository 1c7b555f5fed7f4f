//! WebGPU rendering module
//!
//! The scene is a flat list of colored triangles in viewport pixels,
//! rebuilt every frame and uploaded through a single pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
