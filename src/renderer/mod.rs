//! WebGPU rendering module
//!
//! Every shape is tessellated on the CPU into screen-space triangles and drawn
//! with one pass-through pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{build_vertices, shake_offset};
pub use vertex::Vertex;
