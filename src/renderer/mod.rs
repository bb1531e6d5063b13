//! WebGPU rendering module
//!
//! Shapes are tessellated on the CPU into a triangle list and drawn in one pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
