//! Owned, validated wrappers over a retained-mode graphics API.
//!
//! The four object kinds are [`Shader`], [`Program`], [`GpuBuffer`] and
//! [`VertexLayout`]. Each owns one handle of a [`GraphicsContext`] and checks
//! the context's binding table before any call that implicitly addresses
//! "whatever is currently bound".
//!
//! Compile and link failures come back as a [`BuildStatus`]; broken
//! preconditions come back as a [`GlError`].

pub mod backend;
pub mod config;
pub mod error;

pub use backend::{
    BufferTarget, BufferUsage, BuildStatus, ComponentType, GpuBuffer, GraphicsContext,
    HeadlessContext, OffsetRule, Program, Shader, ShaderStage, VertexLayout,
};
pub use error::GlError;
