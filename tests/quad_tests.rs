//! End-to-end tests through the public API
//!
//! Tests for:
//! - Building and drawing an indexed quad against the headless context
//! - Binding order: upload and layout calls only succeed on bound objects
//! - Locked layouts and the two offset rules

use std::sync::Arc;

use glwrap::backend::headless::DrawCall;
use glwrap::backend::{IndexType, LayoutState, PrimitiveMode};
use glwrap::{
    BufferTarget, ComponentType, GlError, GpuBuffer, GraphicsContext, HeadlessContext, OffsetRule,
    Program, Shader, ShaderStage, VertexLayout,
};

const VERTEX: &str = include_str!("../shaders/quad.vert");
const FRAGMENT: &str = include_str!("../shaders/quad.frag");

// 4 vertices x (position3 + color3)
const QUAD_VERTICES: [f32; 24] = [
    0.5, 0.5, 0.0, 1.0, 0.0, 0.0, //
    0.5, -0.5, 0.0, 0.0, 1.0, 0.0, //
    -0.5, -0.5, 0.0, 0.0, 0.0, 1.0, //
    -0.5, 0.5, 0.0, 1.0, 1.0, 0.0, //
];
const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

fn program(ctx: &Arc<HeadlessContext>) -> Program<HeadlessContext> {
    let vs = Shader::new(ctx, ShaderStage::Vertex, VERTEX).unwrap();
    let fs = Shader::new(ctx, ShaderStage::Fragment, FRAGMENT).unwrap();
    assert!(vs.compile().success);
    assert!(fs.compile().success);

    let program = Program::new(ctx, &[&vs, &fs]).unwrap();
    let status = program.link();
    assert!(status.success, "{}", status.log);
    // Shaders drop here; the program keeps working
    program
}

// ============================================================================
// Full pipeline
// ============================================================================

#[test]
fn quad_draws_without_context_errors() {
    let ctx = Arc::new(HeadlessContext::new());
    let program = program(&ctx);

    let mut layout = VertexLayout::new(&ctx).unwrap();
    layout.bind();

    let mut vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
    vbo.bind();
    vbo.load_floats(&QUAD_VERTICES).unwrap();

    let mut ebo = GpuBuffer::new(&ctx, BufferTarget::ElementArrayBuffer).unwrap();
    ebo.bind();
    ebo.load_indices(&QUAD_INDICES).unwrap();

    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.submit_attributes().unwrap();
    layout.enable_attributes().unwrap();
    assert_eq!(layout.state(), LayoutState::Locked);

    program.use_program();
    layout.bind();
    ctx.draw_elements(PrimitiveMode::Triangles, 6, IndexType::U32, 0);

    assert_eq!(ctx.take_error(), None);
    assert_eq!(
        ctx.draw_calls(),
        vec![DrawCall {
            mode: PrimitiveMode::Triangles,
            count: 6,
            index_type: IndexType::U32,
            offset: 0,
            program: program.id(),
            vertex_array: layout.id(),
        }]
    );

    assert_eq!(ctx.buffer_contents(vbo.id()).unwrap().len(), 96);
    assert_eq!(ctx.buffer_contents(ebo.id()).unwrap().len(), 24);
}

#[test]
fn index_binding_is_restored_with_the_vertex_array() {
    let ctx = Arc::new(HeadlessContext::new());
    let program = program(&ctx);

    let mut layout = VertexLayout::new(&ctx).unwrap();
    layout.bind();
    let mut vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
    vbo.bind();
    vbo.load_floats(&QUAD_VERTICES).unwrap();
    let mut ebo = GpuBuffer::new(&ctx, BufferTarget::ElementArrayBuffer).unwrap();
    ebo.bind();
    ebo.load_indices(&QUAD_INDICES).unwrap();
    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.submit_attributes().unwrap();
    layout.enable_attributes().unwrap();

    // Unbinding the vertex array takes the index binding with it
    layout.unbind().unwrap();
    assert!(!ebo.is_bound());
    assert!(matches!(ebo.load_indices(&[0, 1, 2]), Err(GlError::NotBound { .. })));
    assert_eq!(ctx.buffer_contents(ebo.id()).unwrap().len(), 24);

    layout.bind();
    assert!(ebo.is_bound());
    program.use_program();
    ctx.draw_elements(PrimitiveMode::Triangles, 6, IndexType::U32, 0);
    assert_eq!(ctx.take_error(), None);
}

#[test]
fn drawing_past_the_index_buffer_is_an_error() {
    let ctx = Arc::new(HeadlessContext::new());
    let program = program(&ctx);

    let mut layout = VertexLayout::new(&ctx).unwrap();
    layout.bind();
    let mut vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
    vbo.bind();
    vbo.load_floats(&QUAD_VERTICES).unwrap();
    let mut ebo = GpuBuffer::new(&ctx, BufferTarget::ElementArrayBuffer).unwrap();
    ebo.bind();
    ebo.load_indices(&QUAD_INDICES).unwrap();
    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.submit_attributes().unwrap();
    layout.enable_attributes().unwrap();

    program.use_program();
    ctx.draw_elements(PrimitiveMode::Triangles, 7, IndexType::U32, 0);
    assert!(ctx.take_error().is_some());
    assert!(ctx.draw_calls().is_empty());
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn index_scaled_rule_reproduces_the_narrow_offsets() {
    let ctx = Arc::new(HeadlessContext::new());
    let mut layout = VertexLayout::new(&ctx).unwrap().with_offset_rule(OffsetRule::IndexScaled);
    layout.bind();
    let mut vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
    vbo.bind();
    vbo.load_floats(&QUAD_VERTICES).unwrap();

    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.submit_attributes().unwrap();

    let color = ctx.attrib_pointer(layout.id(), 1).unwrap();
    assert_eq!(color.stride, 24);
    assert_eq!(color.offset, 36);
    assert_eq!(ctx.attrib_pointer(layout.id(), 0).unwrap().offset, 0);
}

#[test]
fn layout_is_frozen_after_submit() {
    let ctx = Arc::new(HeadlessContext::new());
    let mut layout = VertexLayout::new(&ctx).unwrap();
    layout.bind();
    let vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
    vbo.bind();

    layout.prepare_attribute(ComponentType::Float, 4, 3, false).unwrap();
    layout.submit_attributes().unwrap();

    assert_eq!(
        layout.prepare_attribute(ComponentType::Float, 4, 3, false),
        Err(GlError::Locked)
    );
    assert_eq!(layout.attributes().len(), 1);
    assert_eq!(layout.stride(), 12);
}

#[test]
fn wrappers_release_their_handles() {
    let ctx = Arc::new(HeadlessContext::new());
    {
        let _program = program(&ctx);
        let _layout = VertexLayout::new(&ctx).unwrap();
        let _vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
        assert_eq!(ctx.live_programs(), 1);
        assert_eq!(ctx.live_vertex_arrays(), 1);
        assert_eq!(ctx.live_buffers(), 1);
    }
    assert_eq!(ctx.live_shaders(), 0);
    assert_eq!(ctx.live_programs(), 0);
    assert_eq!(ctx.live_vertex_arrays(), 0);
    assert_eq!(ctx.live_buffers(), 0);
}
