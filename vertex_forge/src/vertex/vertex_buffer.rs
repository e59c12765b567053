/// Per-vertex attribute buffer
///
/// Owns a driver buffer of raw `f32` data plus an optional `BufferLayout`
/// describing one vertex record. The data passed to constructors is copied;
/// callers keep their storage.
///
/// Move-only: there is no `Clone`. `take()` moves the driver buffer into a new
/// value and leaves the source empty; dropping an empty buffer releases nothing.

use crate::config::CapacityPolicy;
use crate::driver::{BufferHandle, BufferTarget, DrawHint, DriverRef};
use crate::error::Result;
use crate::runtime::Runtime;
use crate::vertex::buffer_storage::BufferStorage;
use crate::vertex::BufferLayout;
use crate::forge_err;

pub struct VertexBuffer {
    storage: BufferStorage,
    layout: Option<BufferLayout>,
    capacity_policy: CapacityPolicy,
}

impl VertexBuffer {
    /// Upload `data` without a layout, using the configured default draw hint
    pub fn new(driver: &DriverRef, data: &[f32]) -> Result<Self> {
        let hint = Runtime::config().default_draw_hint;
        Self::create(driver, data, None, hint, "forge::VertexBuffer")
    }

    /// Upload `data` without a layout
    pub fn with_hint(driver: &DriverRef, data: &[f32], hint: DrawHint) -> Result<Self> {
        Self::create(driver, data, None, hint, "forge::VertexBuffer")
    }

    /// Upload `data` described by `layout`, using the configured default draw hint
    ///
    /// # Example
    ///
    /// ```
    /// use std::rc::Rc;
    /// use vertex_forge::forge::{AttributeDescriptor, BufferLayout, ShaderDataType, VertexBuffer};
    /// use vertex_forge::forge::driver::{DriverRef, HeadlessDriver};
    ///
    /// let driver: DriverRef = Rc::new(HeadlessDriver::new());
    /// let layout = BufferLayout::new([AttributeDescriptor::new(ShaderDataType::Vec2, "position")]);
    /// let quad: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    ///
    /// let buffer = VertexBuffer::with_layout(&driver, &quad, layout).unwrap();
    /// assert_eq!(buffer.vertex_count(), 4);
    /// ```
    pub fn with_layout(driver: &DriverRef, data: &[f32], layout: BufferLayout) -> Result<Self> {
        let hint = Runtime::config().default_draw_hint;
        Self::create(driver, data, Some(layout), hint, "forge::VertexBuffer")
    }

    /// Upload `data` described by `layout`
    pub fn with_layout_and_hint(
        driver: &DriverRef,
        data: &[f32],
        layout: BufferLayout,
        hint: DrawHint,
    ) -> Result<Self> {
        Self::create(driver, data, Some(layout), hint, "forge::VertexBuffer")
    }

    pub(crate) fn create(
        driver: &DriverRef,
        data: &[f32],
        layout: Option<BufferLayout>,
        hint: DrawHint,
        source: &'static str,
    ) -> Result<Self> {
        let storage = BufferStorage::create(
            driver,
            BufferTarget::Array,
            hint,
            bytemuck::cast_slice(data),
            source,
        )?;

        Ok(Self {
            storage,
            layout,
            capacity_policy: Runtime::config().capacity_policy,
        })
    }

    /// Move the driver buffer and layout out, leaving `self` empty
    pub fn take(&mut self) -> Self {
        Self {
            storage: self.storage.take(),
            layout: self.layout.take(),
            capacity_policy: self.capacity_policy,
        }
    }

    // ===== BINDING =====

    /// Bind as the current array buffer
    pub fn bind(&self) -> Result<()> {
        self.storage.bind()
    }

    /// Clear the array buffer binding
    pub fn unbind(&self) {
        self.storage.unbind();
    }

    // ===== DATA =====

    /// Replace the whole contents
    ///
    /// Data larger than the reserved capacity re-reserves storage under
    /// `CapacityPolicy::Grow` and fails with `Error::CapacityError` under
    /// `CapacityPolicy::Reject`. Capacity never shrinks.
    pub fn set_data(&mut self, data: &[f32]) -> Result<()> {
        self.storage.replace(bytemuck::cast_slice(data), self.capacity_policy)
    }

    /// Overwrite floats starting at element `offset`
    ///
    /// Never grows: a write past the reserved capacity fails with
    /// `Error::CapacityError`.
    pub fn write(&mut self, offset: usize, data: &[f32]) -> Result<()> {
        let byte_offset = offset.checked_mul(4)
            .ok_or_else(|| forge_err!("forge::VertexBuffer", CapacityError,
                "write offset {} is out of addressable range", offset))?;
        self.storage.write(byte_offset, bytemuck::cast_slice(data))
    }

    // ===== LAYOUT =====

    /// Attach or replace the layout
    pub fn set_layout(&mut self, layout: BufferLayout) {
        self.layout = Some(layout);
    }

    /// Layout, if one was attached
    pub fn layout(&self) -> Option<&BufferLayout> {
        self.layout.as_ref()
    }

    /// Stride of one record in bytes (0 without a layout)
    pub fn stride(&self) -> u32 {
        self.layout.as_ref().map_or(0, BufferLayout::stride)
    }

    // ===== ACCESSORS =====

    /// Bytes of data currently held
    pub fn size(&self) -> usize { self.storage.size() }

    /// Bytes reserved in the driver
    pub fn capacity(&self) -> usize { self.storage.capacity() }

    /// Floats currently held
    pub fn element_count(&self) -> usize { self.storage.size() / 4 }

    /// Complete records currently held (0 without a layout)
    pub fn vertex_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.storage.size() / stride as usize,
        }
    }

    /// Update frequency hint the buffer was created with
    pub fn draw_hint(&self) -> DrawHint { self.storage.hint() }

    /// Driver buffer, `None` once moved out
    pub fn handle(&self) -> Option<BufferHandle> { self.storage.handle() }

    /// Whether this value still owns a driver buffer
    pub fn is_valid(&self) -> bool { self.storage.is_valid() }

    /// Capacity policy applied by `set_data`
    pub fn capacity_policy(&self) -> CapacityPolicy { self.capacity_policy }

    /// Override the configured capacity policy for this buffer
    pub fn set_capacity_policy(&mut self, policy: CapacityPolicy) {
        self.capacity_policy = policy;
    }

    pub(crate) fn storage_mut(&mut self) -> &mut BufferStorage { &mut self.storage }
}

impl std::fmt::Debug for VertexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("handle", &self.storage.handle())
            .field("size", &self.storage.size())
            .field("capacity", &self.storage.capacity())
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
