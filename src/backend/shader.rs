// Shader objects
//
// A shader owns one compilation unit: source text tagged with a stage.
// Compilation failures are reported, not raised; a broken shader is the
// caller's problem to surface.

use std::sync::Arc;

use super::context::{GraphicsContext, ShaderStage};
use crate::error::{GlError, Result};

/// Outcome of a compile or link step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct BuildStatus {
    pub success: bool,
    /// Empty on success, the driver's log on failure.
    pub log: String,
}

impl BuildStatus {
    pub(crate) fn succeeded() -> Self {
        Self { success: true, log: String::new() }
    }

    pub(crate) fn failed(log: String) -> Self {
        Self { success: false, log }
    }

    /// Turn a failure into `Err(log)` for callers that want `?`.
    pub fn into_result(self) -> std::result::Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err(self.log)
        }
    }
}

/// One compilation unit registered with the context.
pub struct Shader<C: GraphicsContext> {
    ctx: Arc<C>,
    id: C::Shader,
    stage: ShaderStage,
    source: String,
}

impl<C: GraphicsContext> Shader<C> {
    /// Create a shader handle and hand the source to the context.
    pub fn new(ctx: &Arc<C>, stage: ShaderStage, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let id = ctx.create_shader(stage).map_err(|message| GlError::HandleCreation {
            object: "shader",
            message,
        })?;
        ctx.shader_source(id, &source);
        log::debug!("Created {:?} shader {:?} ({} bytes of source)", stage, id, source.len());

        Ok(Self { ctx: Arc::clone(ctx), id, stage, source })
    }

    /// Compile the registered source.
    pub fn compile(&self) -> BuildStatus {
        self.ctx.compile_shader(self.id);

        if self.ctx.shader_compile_status(self.id) {
            let log = self.ctx.shader_info_log(self.id);
            if !log.trim().is_empty() {
                log::debug!("{:?} shader {:?} compiled with messages:\n{}", self.stage, self.id, log);
            }
            BuildStatus::succeeded()
        } else {
            let log = self.ctx.shader_info_log(self.id);
            log::warn!("{:?} shader {:?} failed to compile:\n{}", self.stage, self.id, log);
            BuildStatus::failed(log)
        }
    }

    /// Query the context; nothing is cached.
    pub fn is_compiled(&self) -> bool {
        self.ctx.shader_compile_status(self.id)
    }

    pub fn id(&self) -> C::Shader {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl<C: GraphicsContext> Drop for Shader<C> {
    fn drop(&mut self) {
        self.ctx.delete_shader(self.id);
    }
}

impl<C: GraphicsContext> std::fmt::Debug for Shader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}
