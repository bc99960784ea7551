// =============================================================================
// GLWRAP DEMO - one indexed quad through the object wrappers
// =============================================================================
//
// Drives the wrappers the way a renderer would at startup, then issues a
// single draw against the headless context:
//
// 1. Compile vertex + fragment shaders, link the program
// 2. Create and bind the vertex array, vertex buffer and index buffer
// 3. Upload the quad, describe position + color, submit the layout
// 4. Use the program, draw, check the context error flag
//
// =============================================================================

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use glwrap::backend::{IndexType, PrimitiveMode};
use glwrap::config::Config;
use glwrap::{
    BufferTarget, ComponentType, GpuBuffer, GraphicsContext, HeadlessContext, Program, Shader,
    ShaderStage, VertexLayout,
};

const BUILTIN_VERTEX: &str = include_str!("../shaders/quad.vert");
const BUILTIN_FRAGMENT: &str = include_str!("../shaders/quad.frag");

/// Two triangles sharing the 1-3 diagonal.
const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

fn main() -> Result<()> {
    let config = Config::load();

    init_logging(&config);
    log::info!("Starting glwrap demo");
    log::info!("Offset rule: {:?}", config.layout.offset_rule);

    let ctx = Arc::new(HeadlessContext::new());
    run(&ctx, &config)?;

    log::info!("Issued {} draw call(s)", ctx.draw_calls().len());
    Ok(())
}

fn init_logging(config: &Config) {
    use env_logger::Builder;

    let mut builder = Builder::new();
    builder.filter_level(config.debug.level_filter());
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    }
    builder.init();

    // Only now is there a logger to report a bad level to
    if config.debug.parsed_level().is_none() {
        log::warn!("Unknown log level '{}', defaulting to info", config.debug.log_level);
    }
}

/// Interleaved position + color for the four corners.
fn quad_vertices() -> Vec<f32> {
    let corners = [
        (Vec3::new(0.5, 0.5, 0.0), Vec3::new(1.0, 0.0, 0.0)),   // top right
        (Vec3::new(0.5, -0.5, 0.0), Vec3::new(0.0, 1.0, 0.0)),  // bottom right
        (Vec3::new(-0.5, -0.5, 0.0), Vec3::new(0.0, 0.0, 1.0)), // bottom left
        (Vec3::new(-0.5, 0.5, 0.0), Vec3::new(1.0, 1.0, 0.0)),  // top left
    ];
    corners
        .iter()
        .flat_map(|(position, color)| position.to_array().into_iter().chain(color.to_array()))
        .collect()
}

fn load_source(path: Option<&Path>, builtin: &'static str) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read shader source {:?}", path)),
        None => Ok(builtin.to_string()),
    }
}

fn compile<C: GraphicsContext>(ctx: &Arc<C>, stage: ShaderStage, source: String) -> Result<Shader<C>> {
    let shader = Shader::new(ctx, stage, source)?;
    let status = shader.compile();
    if !status.success {
        anyhow::bail!("{:?} shader failed to compile:\n{}", stage, status.log);
    }
    Ok(shader)
}

fn run<C: GraphicsContext>(ctx: &Arc<C>, config: &Config) -> Result<()> {
    // ─────────────────────────────────────────────────────────────────────────
    // SHADERS & PROGRAM
    // ─────────────────────────────────────────────────────────────────────────
    let vertex_source = load_source(config.shaders.vertex.as_deref(), BUILTIN_VERTEX)?;
    let fragment_source = load_source(config.shaders.fragment.as_deref(), BUILTIN_FRAGMENT)?;

    let vertex = compile(ctx, ShaderStage::Vertex, vertex_source)?;
    let fragment = compile(ctx, ShaderStage::Fragment, fragment_source)?;

    let program = Program::new(ctx, &[&vertex, &fragment])?;
    let status = program.link();
    if !status.success {
        anyhow::bail!("Program failed to link:\n{}", status.log);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // GEOMETRY
    // ─────────────────────────────────────────────────────────────────────────
    // The index binding is vertex array state, so the vertex array goes first
    let mut layout = VertexLayout::new(ctx)?.with_offset_rule(config.layout.offset_rule);
    layout.bind();

    let mut vertices = GpuBuffer::new(ctx, BufferTarget::ArrayBuffer)?;
    vertices.bind();
    vertices.load_floats(&quad_vertices())?;

    let mut indices = GpuBuffer::new(ctx, BufferTarget::ElementArrayBuffer)?;
    indices.bind();
    indices.load_indices(&QUAD_INDICES)?;

    let float = ComponentType::Float;
    layout.prepare_attribute(float, float.size(), 3, false)?; // position
    layout.prepare_attribute(float, float.size(), 3, false)?; // color
    layout.submit_attributes()?;
    layout.enable_attributes()?;

    log::info!(
        "Layout: {} attributes, stride {} bytes",
        layout.attributes().len(),
        layout.stride()
    );

    // ─────────────────────────────────────────────────────────────────────────
    // FRAME
    // ─────────────────────────────────────────────────────────────────────────
    program.use_program();
    layout.bind();
    ctx.draw_elements(PrimitiveMode::Triangles, QUAD_INDICES.len() as i32, IndexType::U32, 0);

    if config.debug.check_errors {
        if let Some(error) = ctx.take_error() {
            anyhow::bail!("Context reported {:?} after draw", error);
        }
    }

    Ok(())
}
