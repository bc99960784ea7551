// Buffer objects for vertex and index data
//
// The upload call addresses "whatever is bound to the target", not a
// handle. Every upload and unbind therefore checks first that this buffer
// really is the current binding, so a stray call can't overwrite some
// other buffer's storage.

use std::sync::Arc;

use super::context::{BufferTarget, BufferUsage, GraphicsContext};
use crate::error::{GlError, Result};

pub struct GpuBuffer<C: GraphicsContext> {
    ctx: Arc<C>,
    id: C::Buffer,
    target: BufferTarget,
    /// Size of the last upload, in bytes.
    len_bytes: usize,
}

impl<C: GraphicsContext> GpuBuffer<C> {
    /// Allocate a buffer handle. No storage until the first upload.
    pub fn new(ctx: &Arc<C>, target: BufferTarget) -> Result<Self> {
        let id = ctx.create_buffer().map_err(|message| GlError::HandleCreation {
            object: "buffer",
            message,
        })?;
        log::debug!("Created {:?} buffer {:?}", target, id);

        Ok(Self { ctx: Arc::clone(ctx), id, target, len_bytes: 0 })
    }

    /// Same as [`GpuBuffer::new`] but from a raw GL enum, e.g. read from data.
    pub fn with_raw_target(ctx: &Arc<C>, raw_target: u32) -> Result<Self> {
        let target = BufferTarget::try_from(raw_target)?;
        Self::new(ctx, target)
    }

    /// Make this buffer the current binding of its target. Never fails.
    pub fn bind(&self) {
        log::trace!("Binding {:?} buffer {:?}", self.target, self.id);
        self.ctx.bind_buffer(self.target, Some(self.id));
    }

    /// Clear the target's binding. Only the bound buffer may do this.
    pub fn unbind(&self) -> Result<()> {
        self.ensure_bound()?;
        log::trace!("Unbinding {:?} buffer {:?}", self.target, self.id);
        self.ctx.bind_buffer(self.target, None);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.ctx.bound_buffer(self.target) == Some(self.id)
    }

    /// Replace the whole storage with `data` (static-draw hint).
    pub fn load_floats(&mut self, data: &[f32]) -> Result<()> {
        self.load(data, BufferUsage::StaticDraw)
    }

    /// Replace the whole storage with `data` (static-draw hint).
    pub fn load_indices(&mut self, data: &[u32]) -> Result<()> {
        self.load(data, BufferUsage::StaticDraw)
    }

    /// Replace the whole storage with any plain-old-data slice.
    pub fn load<T: bytemuck::Pod>(&mut self, data: &[T], usage: BufferUsage) -> Result<()> {
        self.ensure_bound()?;

        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.ctx.buffer_data(self.target, bytes, usage);
        self.len_bytes = bytes.len();

        log::debug!(
            "Uploaded {} bytes to {:?} buffer {:?} ({:?})",
            bytes.len(),
            self.target,
            self.id,
            usage
        );
        Ok(())
    }

    pub fn id(&self) -> C::Buffer {
        self.id
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn len_bytes(&self) -> usize {
        self.len_bytes
    }

    fn ensure_bound(&self) -> Result<()> {
        if self.is_bound() {
            Ok(())
        } else {
            Err(GlError::NotBound { object: target_name(self.target) })
        }
    }
}

fn target_name(target: BufferTarget) -> &'static str {
    match target {
        BufferTarget::ArrayBuffer => "vertex buffer",
        BufferTarget::ElementArrayBuffer => "index buffer",
    }
}

impl<C: GraphicsContext> Drop for GpuBuffer<C> {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.id);
    }
}

impl<C: GraphicsContext> std::fmt::Debug for GpuBuffer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuBuffer")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("len_bytes", &self.len_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::HeadlessContext;

    fn ctx() -> Arc<HeadlessContext> {
        Arc::new(HeadlessContext::new())
    }

    #[test]
    fn raw_target_must_be_vertex_or_index() {
        let ctx = ctx();
        let vbo = GpuBuffer::with_raw_target(&ctx, BufferTarget::RAW_ARRAY_BUFFER).unwrap();
        let ebo = GpuBuffer::with_raw_target(&ctx, BufferTarget::RAW_ELEMENT_ARRAY_BUFFER).unwrap();
        assert_eq!(vbo.target(), BufferTarget::ArrayBuffer);
        assert_eq!(ebo.target(), BufferTarget::ElementArrayBuffer);
        assert_eq!(
            GpuBuffer::with_raw_target(&ctx, 0x8A11).unwrap_err(),
            GlError::InvalidTarget(0x8A11)
        );
        // The rejected target never reached the context
        assert_eq!(ctx.live_buffers(), 2);
    }

    #[test]
    fn bind_then_load_stores_exactly_the_data() {
        let ctx = ctx();
        let mut vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
        let data = [0.5f32, -0.5, 0.0, 1.0, 0.25, 0.75];

        vbo.bind();
        vbo.load_floats(&data).unwrap();

        let stored = ctx.buffer_contents(vbo.id()).unwrap();
        assert_eq!(stored, bytemuck::cast_slice::<f32, u8>(&data));
        assert_eq!(vbo.len_bytes(), 24);
        assert_eq!(ctx.take_error(), None);
    }

    #[test]
    fn load_on_unbound_buffer_is_rejected_without_upload() {
        let ctx = ctx();
        let mut first = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
        let mut second = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();

        first.bind();
        first.load_floats(&[1.0, 2.0]).unwrap();

        // `second` was never bound; `first` still holds the binding
        let err = second.load_floats(&[9.0, 9.0, 9.0]).unwrap_err();
        assert_eq!(err, GlError::NotBound { object: "vertex buffer" });
        assert_eq!(ctx.buffer_contents(first.id()).unwrap(), bytemuck::cast_slice::<f32, u8>(&[1.0, 2.0]));
        assert_eq!(ctx.buffer_contents(second.id()).unwrap(), Vec::<u8>::new());
        assert_eq!(second.len_bytes(), 0);
    }

    #[test]
    fn load_indices_checks_the_index_binding() {
        let ctx = ctx();
        let vao = ctx.create_vertex_array().unwrap();
        ctx.bind_vertex_array(Some(vao));

        let vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
        let mut ebo = GpuBuffer::new(&ctx, BufferTarget::ElementArrayBuffer).unwrap();

        // Binding the vertex buffer says nothing about the index target
        vbo.bind();
        assert!(matches!(ebo.load_indices(&[0, 1, 2]), Err(GlError::NotBound { .. })));

        ebo.bind();
        ebo.load_indices(&[0, 1, 2]).unwrap();
        assert_eq!(ctx.buffer_contents(ebo.id()).unwrap().len(), 12);
    }

    #[test]
    fn unbind_requires_the_binding() {
        let ctx = ctx();
        let a = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
        let b = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();

        a.bind();
        assert_eq!(b.unbind(), Err(GlError::NotBound { object: "vertex buffer" }));
        assert!(a.is_bound());

        a.unbind().unwrap();
        assert!(!a.is_bound());
        assert_eq!(ctx.bound_buffer(BufferTarget::ArrayBuffer), None);
        // Unbinding twice: nothing is bound any more
        assert!(a.unbind().is_err());
    }

    #[test]
    fn reload_replaces_storage() {
        let ctx = ctx();
        let mut vbo = GpuBuffer::new(&ctx, BufferTarget::ArrayBuffer).unwrap();
        vbo.bind();
        vbo.load_floats(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        vbo.load(&[7u16, 8], BufferUsage::DynamicDraw).unwrap();

        assert_eq!(ctx.buffer_contents(vbo.id()).unwrap(), vec![7, 0, 8, 0]);
        assert_eq!(ctx.buffer_usage(vbo.id()), Some(BufferUsage::DynamicDraw));
        assert_eq!(vbo.len_bytes(), 4);
    }
}
