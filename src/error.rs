// Usage errors raised by the object wrappers
//
// Compile and link failures are NOT errors: they come back as a
// `BuildStatus`. Everything here is a violated precondition.

use thiserror::Error;

/// Precondition violations reported by the wrappers.
///
/// A wrapper operation that returns one of these has not touched the
/// context: no upload, no pointer call, no state change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlError {
    /// Raw buffer target that is neither vertex data nor index data.
    #[error("invalid buffer target 0x{0:04X}: expected ARRAY_BUFFER or ELEMENT_ARRAY_BUFFER")]
    InvalidTarget(u32),

    /// A program needs at least a vertex and a fragment stage.
    #[error("a program needs at least 2 shader stages, got {count}")]
    TooFewStages { count: usize },

    /// The object is not the context's current binding for its class.
    #[error("{object} is not bound")]
    NotBound { object: &'static str },

    /// Attribute with a component count outside 1..=4 or zero-sized components.
    #[error("invalid attribute: {count} components of {component_size} bytes")]
    InvalidAttribute { count: u32, component_size: u32 },

    /// A vertex stride or attribute offset doesn't fit the context's `i32`.
    #[error("attribute layout exceeds the maximum vertex stride or offset")]
    LayoutOverflow,

    /// The attribute layout was already submitted.
    #[error("attribute layout is locked")]
    Locked,

    /// The context refused to hand out a new handle.
    #[error("failed to create {object}: {message}")]
    HandleCreation { object: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, GlError>;
