// Backend module - GL object abstraction layer
//
// Design: owned wrappers over an injected graphics context
// Each wrapper owns one handle and validates the binding it relies on

pub mod buffer;
pub mod context;
#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
pub mod gl;
pub mod headless;
pub mod program;
pub mod shader;
pub mod vertex_array;

pub use buffer::GpuBuffer;
pub use context::{
    BufferTarget, BufferUsage, ComponentType, ContextError, GraphicsContext, IndexType,
    PrimitiveMode, ShaderStage,
};
#[cfg(all(feature = "glow", not(target_arch = "wasm32")))]
pub use gl::GlowContext;
pub use headless::HeadlessContext;
pub use program::Program;
pub use shader::{BuildStatus, Shader};
pub use vertex_array::{AttributeDescriptor, LayoutState, OffsetRule, VertexLayout};
