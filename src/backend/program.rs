// Program objects
//
// A program links a set of compiled shaders into one executable pipeline.
// Construction only checks that there are enough stages; whether they fit
// together is the linker's call.

use std::sync::Arc;

use super::context::GraphicsContext;
use super::shader::{BuildStatus, Shader};
use crate::error::{GlError, Result};

/// Minimal pipeline: vertex + fragment.
pub const MIN_STAGES: usize = 2;

pub struct Program<C: GraphicsContext> {
    ctx: Arc<C>,
    id: C::Program,
    attached: Vec<C::Shader>,
}

impl<C: GraphicsContext> Program<C> {
    /// Create a program and attach every shader, in order.
    ///
    /// Fails with [`GlError::TooFewStages`] before touching the context when
    /// fewer than two shaders are given. Two shaders of the same stage are
    /// accepted here and rejected at link time.
    pub fn new(ctx: &Arc<C>, shaders: &[&Shader<C>]) -> Result<Self> {
        if shaders.len() < MIN_STAGES {
            return Err(GlError::TooFewStages { count: shaders.len() });
        }

        let id = ctx.create_program().map_err(|message| GlError::HandleCreation {
            object: "program",
            message,
        })?;

        let attached: Vec<_> = shaders.iter().map(|shader| shader.id()).collect();
        for &shader in &attached {
            ctx.attach_shader(id, shader);
        }
        log::debug!("Created program {:?} with {} stages", id, attached.len());

        Ok(Self { ctx: Arc::clone(ctx), id, attached })
    }

    pub fn link(&self) -> BuildStatus {
        self.ctx.link_program(self.id);

        if self.ctx.program_link_status(self.id) {
            let log = self.ctx.program_info_log(self.id);
            if !log.trim().is_empty() {
                log::debug!("Program {:?} linked with messages:\n{}", self.id, log);
            }
            BuildStatus::succeeded()
        } else {
            let log = self.ctx.program_info_log(self.id);
            log::warn!("Program {:?} failed to link:\n{}", self.id, log);
            BuildStatus::failed(log)
        }
    }

    pub fn is_linked(&self) -> bool {
        self.ctx.program_link_status(self.id)
    }

    /// Make this the active pipeline for subsequent draws.
    pub fn use_program(&self) {
        log::trace!("Using program {:?}", self.id);
        self.ctx.use_program(Some(self.id));
    }

    pub fn id(&self) -> C::Program {
        self.id
    }

    pub fn attached(&self) -> &[C::Shader] {
        &self.attached
    }
}

impl<C: GraphicsContext> Drop for Program<C> {
    fn drop(&mut self) {
        self.ctx.delete_program(self.id);
    }
}

impl<C: GraphicsContext> std::fmt::Debug for Program<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("id", &self.id)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
