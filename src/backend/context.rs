// Graphics context - the ambient state every wrapper talks to
//
// OpenGL keeps a table of "currently bound" objects per target class and
// most calls implicitly address whatever is bound. This trait makes that
// table an explicit, injectable service so wrappers can validate against it
// and tests can swap in an in-memory context.

use std::fmt::Debug;
use std::path::Path;

use crate::error::GlError;

/// Pipeline stage a shader targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    TessControl,
    TessEvaluation,
    Compute,
}

impl ShaderStage {
    /// GL enum value (`GL_VERTEX_SHADER`, ...)
    pub fn to_raw(self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Fragment => 0x8B30,
            ShaderStage::Geometry => 0x8DD9,
            ShaderStage::TessControl => 0x8E88,
            ShaderStage::TessEvaluation => 0x8E87,
            ShaderStage::Compute => 0x91B9,
        }
    }

    /// Map the conventional file extensions (`.vert`, `.frag`, ...) to a stage.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "vert" | "vs" => Some(ShaderStage::Vertex),
            "frag" | "fs" => Some(ShaderStage::Fragment),
            "geom" | "gs" => Some(ShaderStage::Geometry),
            "tesc" => Some(ShaderStage::TessControl),
            "tese" => Some(ShaderStage::TessEvaluation),
            "comp" | "cs" => Some(ShaderStage::Compute),
            _ => None,
        }
    }
}

/// Buffer target class. Vertex data and index data are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// `GL_ARRAY_BUFFER`
    ArrayBuffer,
    /// `GL_ELEMENT_ARRAY_BUFFER`
    ElementArrayBuffer,
}

impl BufferTarget {
    pub const RAW_ARRAY_BUFFER: u32 = 0x8892;
    pub const RAW_ELEMENT_ARRAY_BUFFER: u32 = 0x8893;

    pub fn to_raw(self) -> u32 {
        match self {
            BufferTarget::ArrayBuffer => Self::RAW_ARRAY_BUFFER,
            BufferTarget::ElementArrayBuffer => Self::RAW_ELEMENT_ARRAY_BUFFER,
        }
    }

    /// The matching binding query (`GL_ARRAY_BUFFER_BINDING`, ...)
    pub fn binding_query(self) -> u32 {
        match self {
            BufferTarget::ArrayBuffer => 0x8894,
            BufferTarget::ElementArrayBuffer => 0x8895,
        }
    }
}

impl TryFrom<u32> for BufferTarget {
    type Error = GlError;

    fn try_from(raw: u32) -> Result<Self, GlError> {
        match raw {
            Self::RAW_ARRAY_BUFFER => Ok(BufferTarget::ArrayBuffer),
            Self::RAW_ELEMENT_ARRAY_BUFFER => Ok(BufferTarget::ElementArrayBuffer),
            other => Err(GlError::InvalidTarget(other)),
        }
    }
}

/// Usage hint passed along with a full-storage upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    #[default]
    StaticDraw,
    DynamicDraw,
    StreamDraw,
}

impl BufferUsage {
    pub fn to_raw(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => 0x88E4,
            BufferUsage::DynamicDraw => 0x88E8,
            BufferUsage::StreamDraw => 0x88E0,
        }
    }
}

/// Numeric type of one attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    HalfFloat,
    Float,
}

impl ComponentType {
    pub fn to_raw(self) -> u32 {
        match self {
            ComponentType::Byte => 0x1400,
            ComponentType::UnsignedByte => 0x1401,
            ComponentType::Short => 0x1402,
            ComponentType::UnsignedShort => 0x1403,
            ComponentType::Int => 0x1404,
            ComponentType::UnsignedInt => 0x1405,
            ComponentType::Float => 0x1406,
            ComponentType::HalfFloat => 0x140B,
        }
    }

    /// Natural byte size of one component of this type.
    pub fn size(self) -> u32 {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort | ComponentType::HalfFloat => 2,
            ComponentType::Int | ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    pub fn to_raw(self) -> u32 {
        match self {
            IndexType::U8 => 0x1401,
            IndexType::U16 => 0x1403,
            IndexType::U32 => 0x1405,
        }
    }

    pub fn size(self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn to_raw(self) -> u32 {
        match self {
            PrimitiveMode::Points => 0x0000,
            PrimitiveMode::Lines => 0x0001,
            PrimitiveMode::LineStrip => 0x0003,
            PrimitiveMode::Triangles => 0x0004,
            PrimitiveMode::TriangleStrip => 0x0005,
            PrimitiveMode::TriangleFan => 0x0006,
        }
    }
}

/// Sticky error flag of the context (`glGetError`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
    /// Anything the driver reports that we don't name.
    Other(u32),
}

impl ContextError {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => None,
            0x0500 => Some(ContextError::InvalidEnum),
            0x0501 => Some(ContextError::InvalidValue),
            0x0502 => Some(ContextError::InvalidOperation),
            0x0505 => Some(ContextError::OutOfMemory),
            other => Some(ContextError::Other(other)),
        }
    }
}

/// A live graphics session: owns every native handle and the binding table.
///
/// Calls are synchronous and must all happen on the thread the context is
/// current on. Handle creation may fail with a driver message; everything
/// else reports problems through [`GraphicsContext::take_error`].
pub trait GraphicsContext {
    type Shader: Copy + Eq + Debug;
    type Program: Copy + Eq + Debug;
    type Buffer: Copy + Eq + Debug;
    type VertexArray: Copy + Eq + Debug;

    // Shaders
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // Programs
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    // Buffers
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>);
    fn bound_buffer(&self, target: BufferTarget) -> Option<Self::Buffer>;
    /// Replace the storage of whatever is bound to `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    fn delete_buffer(&self, buffer: Self::Buffer);

    // Vertex arrays
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>);
    fn bound_vertex_array(&self) -> Option<Self::VertexArray>;
    /// Point `index` of the bound vertex array at the bound array buffer.
    fn vertex_attrib_pointer(
        &self,
        index: u32,
        count: i32,
        component: ComponentType,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn enable_vertex_attrib_array(&self, index: u32);
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    // Drawing
    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, offset: i32);

    /// Read and clear the context's error flag.
    fn take_error(&self) -> Option<ContextError>;
}
