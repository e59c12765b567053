/// Per-instance attribute buffer
///
/// Same construction and mutation contract as `VertexBuffer`; a `VertexArray`
/// binds its attributes with a per-instance advance rate (divisor 1).
///
/// With a layout attached, the buffer can also be managed record by record:
/// `add_instance` appends and grows the driver storage geometrically while
/// keeping the same driver handle, `delete_instance` swap-removes.

use crate::config::CapacityPolicy;
use crate::driver::{BufferHandle, DrawHint, DriverRef};
use crate::error::Result;
use crate::runtime::Runtime;
use crate::vertex::{BufferLayout, VertexBuffer};
use crate::{forge_bail, forge_debug};

const SOURCE: &str = "forge::InstancedVertexBuffer";

/// Growth factor applied once the buffer holds more than one block
const GROWTH_FACTOR: f64 = 1.618_033_988_749_895;

pub struct InstancedVertexBuffer {
    buffer: VertexBuffer,
    growth_block: usize,
}

impl InstancedVertexBuffer {
    /// Upload `data` without a layout, using the configured default draw hint
    pub fn new(driver: &DriverRef, data: &[f32]) -> Result<Self> {
        let hint = Runtime::config().default_draw_hint;
        Self::create(driver, data, None, hint)
    }

    /// Upload `data` without a layout
    pub fn with_hint(driver: &DriverRef, data: &[f32], hint: DrawHint) -> Result<Self> {
        Self::create(driver, data, None, hint)
    }

    /// Upload `data` described by `layout`, using the configured default draw hint
    pub fn with_layout(driver: &DriverRef, data: &[f32], layout: BufferLayout) -> Result<Self> {
        let hint = Runtime::config().default_draw_hint;
        Self::create(driver, data, Some(layout), hint)
    }

    /// Upload `data` described by `layout`
    pub fn with_layout_and_hint(
        driver: &DriverRef,
        data: &[f32],
        layout: BufferLayout,
        hint: DrawHint,
    ) -> Result<Self> {
        Self::create(driver, data, Some(layout), hint)
    }

    fn create(
        driver: &DriverRef,
        data: &[f32],
        layout: Option<BufferLayout>,
        hint: DrawHint,
    ) -> Result<Self> {
        Ok(Self {
            buffer: VertexBuffer::create(driver, data, layout, hint, SOURCE)?,
            growth_block: Runtime::config().instance_growth_block.max(1),
        })
    }

    /// Move the driver buffer and layout out, leaving `self` empty
    pub fn take(&mut self) -> Self {
        Self {
            buffer: self.buffer.take(),
            growth_block: self.growth_block,
        }
    }

    // ===== BINDING =====

    /// Bind as the current array buffer
    pub fn bind(&self) -> Result<()> {
        self.buffer.bind()
    }

    /// Clear the array buffer binding
    pub fn unbind(&self) {
        self.buffer.unbind();
    }

    // ===== DATA =====

    /// Replace the whole contents (see `VertexBuffer::set_data`)
    pub fn set_data(&mut self, data: &[f32]) -> Result<()> {
        self.buffer.set_data(data)
    }

    /// Overwrite floats starting at element `offset` (see `VertexBuffer::write`)
    pub fn write(&mut self, offset: usize, data: &[f32]) -> Result<()> {
        self.buffer.write(offset, data)
    }

    // ===== INSTANCES =====

    /// Append one instance record, returning its index
    ///
    /// `data` must hold exactly one record (`instance_size()` bytes).
    pub fn add_instance(&mut self, data: &[f32]) -> Result<usize> {
        let record_size = self.check_record(data)?;
        let index = self.instance_count();
        let end = (index + 1) * record_size;

        if end > self.buffer.capacity() {
            if self.buffer.capacity_policy() == CapacityPolicy::Reject {
                forge_bail!(SOURCE, CapacityError,
                    "instance {} does not fit reserved capacity of {} bytes",
                    index, self.buffer.capacity());
            }
            let new_capacity = self.grown_capacity(end, record_size);
            let storage = self.buffer.storage_mut();
            storage.truncate(index * record_size);
            storage.reserve(new_capacity)?;
        }

        let storage = self.buffer.storage_mut();
        storage.truncate(index * record_size);
        storage.write(index * record_size, bytemuck::cast_slice(data))?;
        Ok(index)
    }

    /// Overwrite the record at `index`
    pub fn update_instance(&mut self, index: usize, data: &[f32]) -> Result<()> {
        let record_size = self.check_record(data)?;
        self.check_index(index)?;
        self.buffer
            .storage_mut()
            .write(index * record_size, bytemuck::cast_slice(data))
    }

    /// Remove the record at `index` without preserving order
    ///
    /// The last record moves into the hole; returns the index it now occupies
    /// (equal to `index`, which is then out of range if the last record was removed).
    pub fn delete_instance(&mut self, index: usize) -> Result<usize> {
        let record_size = self.record_size()?;
        self.check_index(index)?;

        let last = self.instance_count() - 1;
        let storage = self.buffer.storage_mut();
        if index != last {
            storage.copy_within(last * record_size, index * record_size, record_size)?;
        }
        storage.truncate(last * record_size);

        forge_debug!(SOURCE, "Deleted instance {} ({} left)", index, last);
        Ok(index)
    }

    /// Forget every record; capacity is kept
    pub fn clear_instances(&mut self) {
        self.buffer.storage_mut().truncate(0);
    }

    /// Complete records currently held (0 without a layout)
    pub fn instance_count(&self) -> usize {
        self.buffer.vertex_count()
    }

    /// Size of one record in bytes (0 without a layout)
    pub fn instance_size(&self) -> usize {
        self.buffer.stride() as usize
    }

    fn record_size(&self) -> Result<usize> {
        match self.instance_size() {
            0 => {
                forge_bail!(SOURCE, ConfigurationError,
                    "instance operations need a layout with a non-zero stride");
            }
            size => Ok(size),
        }
    }

    fn check_record(&self, data: &[f32]) -> Result<usize> {
        let record_size = self.record_size()?;
        let data_size = std::mem::size_of_val(data);
        if data_size != record_size {
            forge_bail!(SOURCE, ConfigurationError,
                "instance data is {} bytes, layout stride is {} bytes",
                data_size, record_size);
        }
        Ok(record_size)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let count = self.instance_count();
        if index >= count {
            forge_bail!(SOURCE, InvalidResource,
                "instance index {} out of range ({} instances)", index, count);
        }
        Ok(())
    }

    /// Next capacity step: empty -> one record -> one block -> x golden ratio
    fn grown_capacity(&self, required: usize, record_size: usize) -> usize {
        let mut capacity = self.buffer.capacity();
        while capacity < required {
            capacity = if capacity == 0 {
                record_size
            } else if capacity == record_size {
                (record_size * self.growth_block).max(capacity + record_size)
            } else {
                ((capacity as f64 * GROWTH_FACTOR) as usize).max(capacity + record_size)
            };
        }
        capacity
    }

    // ===== LAYOUT =====

    /// Attach or replace the layout
    pub fn set_layout(&mut self, layout: BufferLayout) {
        self.buffer.set_layout(layout);
    }

    /// Layout, if one was attached
    pub fn layout(&self) -> Option<&BufferLayout> {
        self.buffer.layout()
    }

    /// Stride of one record in bytes (0 without a layout)
    pub fn stride(&self) -> u32 {
        self.buffer.stride()
    }

    // ===== ACCESSORS =====

    /// Bytes of data currently held
    pub fn size(&self) -> usize { self.buffer.size() }

    /// Bytes reserved in the driver
    pub fn capacity(&self) -> usize { self.buffer.capacity() }

    /// Floats currently held
    pub fn element_count(&self) -> usize { self.buffer.element_count() }

    /// Update frequency hint the buffer was created with
    pub fn draw_hint(&self) -> DrawHint { self.buffer.draw_hint() }

    /// Driver buffer, `None` once moved out
    pub fn handle(&self) -> Option<BufferHandle> { self.buffer.handle() }

    /// Whether this value still owns a driver buffer
    pub fn is_valid(&self) -> bool { self.buffer.is_valid() }

    /// Capacity policy applied by `set_data` and `add_instance`
    pub fn capacity_policy(&self) -> CapacityPolicy { self.buffer.capacity_policy() }

    /// Override the configured capacity policy for this buffer
    pub fn set_capacity_policy(&mut self, policy: CapacityPolicy) {
        self.buffer.set_capacity_policy(policy);
    }
}

impl std::fmt::Debug for InstancedVertexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstancedVertexBuffer")
            .field("handle", &self.handle())
            .field("instances", &self.instance_count())
            .field("capacity", &self.capacity())
            .field("layout", &self.layout())
            .finish()
    }
}

#[cfg(test)]
#[path = "instanced_vertex_buffer_tests.rs"]
mod tests;
