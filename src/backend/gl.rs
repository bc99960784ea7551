// OpenGL backend over glow
//
// Thin forwarding layer: every trait call is one glow call. Binding
// queries go through glGetIntegerv with the *_BINDING enums.

use std::num::NonZeroU32;

use glow::HasContext;

use super::context::{
    BufferTarget, BufferUsage, ComponentType, ContextError, GraphicsContext, IndexType,
    PrimitiveMode, ShaderStage,
};

pub struct GlowContext {
    gl: glow::Context,
}

impl GlowContext {
    /// Wrap a loaded glow context.
    ///
    /// # Safety
    /// The GL context behind `gl` must stay current on the calling thread
    /// for as long as this value, and every wrapper created from it, lives.
    pub unsafe fn new(gl: glow::Context) -> Self {
        log::info!("OpenGL backend: {:?}", gl.version());
        Self { gl }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl GraphicsContext for GlowContext {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type VertexArray = glow::NativeVertexArray;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        unsafe { self.gl.create_shader(stage.to_raw()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { self.gl.shader_source(shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.compile_shader(shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { self.gl.create_buffer() }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(target.to_raw(), buffer) }
    }

    fn bound_buffer(&self, target: BufferTarget) -> Option<Self::Buffer> {
        let raw = unsafe { self.gl.get_parameter_i32(target.binding_query()) };
        NonZeroU32::new(raw as u32).map(glow::NativeBuffer)
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe { self.gl.buffer_data_u8_slice(target.to_raw(), data, usage.to_raw()) }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { self.gl.bind_vertex_array(vertex_array) }
    }

    fn bound_vertex_array(&self) -> Option<Self::VertexArray> {
        let raw = unsafe { self.gl.get_parameter_i32(glow::VERTEX_ARRAY_BINDING) };
        NonZeroU32::new(raw as u32).map(glow::NativeVertexArray)
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        count: i32,
        component: ComponentType,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, count, component.to_raw(), normalized, stride, offset)
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { self.gl.delete_vertex_array(vertex_array) }
    }

    fn draw_elements(&self, mode: PrimitiveMode, count: i32, index_type: IndexType, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(mode.to_raw(), count, index_type.to_raw(), offset)
        }
    }

    fn take_error(&self) -> Option<ContextError> {
        ContextError::from_raw(unsafe { self.gl.get_error() })
    }
}
