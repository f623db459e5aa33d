//! WebGPU rendering
//!
//! The renderer is deliberately dumb: each frame the simulation's mesh
//! instances are flattened into one world-space triangle list on the CPU
//! (`shapes::build_frame`), uploaded, and drawn in a single pass. Lighting
//! is baked into vertex colors; the shader only transforms and fogs.

pub mod camera;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use camera::Camera;
pub use pipeline::RenderState;
pub use shapes::{Starfield, build_frame};
pub use vertex::{Vertex, colors};
