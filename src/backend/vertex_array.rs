// Vertex array objects and attribute layout
//
// Attributes are described first, then submitted in one go. Submission
// computes the interleaved stride and points every attribute index at the
// currently bound vertex buffer. After that the layout is locked: the
// descriptor list can't grow any more.
//
// Every operation requires this vertex array to be the current binding,
// because the pointer and enable calls address "whatever is bound".

use std::sync::Arc;

use serde::Deserialize;

use super::context::{ComponentType, GraphicsContext};
use crate::error::{GlError, Result};

/// Components per attribute accepted by the pointer call.
pub const MAX_COMPONENTS: u32 = 4;

/// One vertex attribute as described by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub component: ComponentType,
    /// Byte size of a single component.
    pub component_size: u32,
    /// Attribute location; equals the position in the layout.
    pub index: u32,
    /// Components per vertex (1..=4).
    pub count: u32,
    pub normalized: bool,
}

impl AttributeDescriptor {
    /// Bytes this attribute occupies in one vertex, `None` on overflow.
    pub fn size(&self) -> Option<u32> {
        self.count.checked_mul(self.component_size)
    }
}

fn total_size(attributes: &[AttributeDescriptor]) -> Option<u32> {
    attributes
        .iter()
        .try_fold(0u32, |total, attribute| total.checked_add(attribute.size()?))
}

/// How attribute offsets inside a vertex are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetRule {
    /// Running sum of the sizes of all earlier attributes. Correct for any
    /// mix of counts and component sizes.
    #[default]
    Interleaved,
    /// `index * count * component_size`. Only matches the interleaved offset
    /// for a single attribute; kept to reproduce layouts that rely on it.
    IndexScaled,
}

/// Describe/lock state of a [`VertexLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Describing,
    Locked,
}

/// A vertex array object plus the attribute layout committed to it.
pub struct VertexLayout<C: GraphicsContext> {
    ctx: Arc<C>,
    id: C::VertexArray,
    attributes: Vec<AttributeDescriptor>,
    /// Sum of the attribute sizes; never above `i32::MAX`.
    stride: u32,
    state: LayoutState,
    offset_rule: OffsetRule,
}

impl<C: GraphicsContext> VertexLayout<C> {
    pub fn new(ctx: &Arc<C>) -> Result<Self> {
        let id = ctx.create_vertex_array().map_err(|message| GlError::HandleCreation {
            object: "vertex array",
            message,
        })?;
        log::debug!("Created vertex array {:?}", id);

        Ok(Self {
            ctx: Arc::clone(ctx),
            id,
            attributes: Vec::new(),
            stride: 0,
            state: LayoutState::Describing,
            offset_rule: OffsetRule::default(),
        })
    }

    /// Pick the offset rule before submitting.
    pub fn with_offset_rule(mut self, rule: OffsetRule) -> Self {
        self.offset_rule = rule;
        self
    }

    pub fn bind(&self) {
        log::trace!("Binding vertex array {:?}", self.id);
        self.ctx.bind_vertex_array(Some(self.id));
    }

    pub fn unbind(&self) -> Result<()> {
        self.ensure_bound()?;
        self.ctx.bind_vertex_array(None);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.ctx.bound_vertex_array() == Some(self.id)
    }

    /// Append an attribute. Its index is the number of attributes already
    /// described, so call order decides both location and interleave order.
    ///
    /// `count` must be in `1..=4` and `component_size` non-zero, and the
    /// vertex must stay within the context's signed 32-bit stride.
    pub fn prepare_attribute(
        &mut self,
        component: ComponentType,
        component_size: u32,
        count: u32,
        normalized: bool,
    ) -> Result<u32> {
        self.ensure_bound()?;
        if self.state == LayoutState::Locked {
            return Err(GlError::Locked);
        }

        if !(1..=MAX_COMPONENTS).contains(&count) || component_size == 0 {
            return Err(GlError::InvalidAttribute { count, component_size });
        }

        let descriptor = AttributeDescriptor {
            component,
            component_size,
            index: self.attributes.len() as u32,
            count,
            normalized,
        };
        let stride = descriptor
            .size()
            .and_then(|size| self.stride.checked_add(size))
            .filter(|&stride| i32::try_from(stride).is_ok())
            .ok_or(GlError::LayoutOverflow)?;

        self.attributes.push(descriptor);
        self.stride = stride;
        Ok(descriptor.index)
    }

    /// Lock the layout and point every attribute at the bound vertex buffer.
    ///
    /// Submitting again re-issues the same pointer calls.
    pub fn submit_attributes(&mut self) -> Result<()> {
        self.ensure_bound()?;

        // Every pointer argument is converted before the layout locks
        let stride = i32::try_from(self.stride).map_err(|_| GlError::LayoutOverflow)?;
        let offsets = self
            .attributes
            .iter()
            .map(|attribute| {
                self.offset_of(attribute.index)
                    .and_then(|offset| i32::try_from(offset).ok())
                    .ok_or(GlError::LayoutOverflow)
            })
            .collect::<Result<Vec<i32>>>()?;

        self.state = LayoutState::Locked;
        for (attribute, offset) in self.attributes.iter().zip(offsets) {
            self.ctx.vertex_attrib_pointer(
                attribute.index,
                // At most MAX_COMPONENTS
                attribute.count as i32,
                attribute.component,
                attribute.normalized,
                stride,
                offset,
            );
        }

        log::debug!(
            "Submitted {} attributes to vertex array {:?} (stride {} bytes, {:?} offsets)",
            self.attributes.len(),
            self.id,
            stride,
            self.offset_rule
        );
        Ok(())
    }

    /// Enable every described attribute for reading during draws.
    ///
    /// Allowed before submission, but the pointers are then whatever the
    /// context had before.
    pub fn enable_attributes(&self) -> Result<()> {
        self.ensure_bound()?;
        if self.state == LayoutState::Describing {
            log::warn!("Enabling attributes of vertex array {:?} before submission", self.id);
        }
        for attribute in &self.attributes {
            self.ctx.enable_vertex_attrib_array(attribute.index);
        }
        Ok(())
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Byte offset of attribute `index` inside a vertex, per the offset rule.
    ///
    /// `None` past the last attribute, or if the index-scaled product
    /// overflows.
    pub fn offset_of(&self, index: u32) -> Option<u32> {
        let attribute = self.attributes.get(index as usize)?;
        match self.offset_rule {
            OffsetRule::Interleaved => total_size(&self.attributes[..index as usize]),
            OffsetRule::IndexScaled => attribute
                .index
                .checked_mul(attribute.count)?
                .checked_mul(attribute.component_size),
        }
    }

    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == LayoutState::Locked
    }

    pub fn offset_rule(&self) -> OffsetRule {
        self.offset_rule
    }

    pub fn id(&self) -> C::VertexArray {
        self.id
    }

    fn ensure_bound(&self) -> Result<()> {
        if self.is_bound() {
            Ok(())
        } else {
            Err(GlError::NotBound { object: "vertex array" })
        }
    }
}

impl<C: GraphicsContext> Drop for VertexLayout<C> {
    fn drop(&mut self) {
        self.ctx.delete_vertex_array(self.id);
    }
}

impl<C: GraphicsContext> std::fmt::Debug for VertexLayout<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexLayout")
            .field("id", &self.id)
            .field("attributes", &self.attributes)
            .field("state", &self.state)
            .field("offset_rule", &self.offset_rule)
            .finish_non_exhaustive()
    }
}
