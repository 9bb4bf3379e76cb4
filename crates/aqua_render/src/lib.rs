pub mod camera;
pub mod gpu_context;
pub mod quad_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{Camera3D, CameraUniform};
pub use gpu_context::GpuContext;
pub use quad_pipeline::{MaterialUniform, QuadPipeline};
pub use texture::Texture;
pub use vertex::QuadVertex;
