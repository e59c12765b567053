/// Element index buffer (`u32` indices)

use crate::config::CapacityPolicy;
use crate::driver::{BufferHandle, BufferTarget, DrawHint, DriverRef};
use crate::error::Result;
use crate::runtime::Runtime;
use crate::vertex::buffer_storage::BufferStorage;

pub struct IndexBuffer {
    storage: BufferStorage,
    capacity_policy: CapacityPolicy,
}

impl IndexBuffer {
    /// Upload `indices` using the configured default draw hint
    pub fn new(driver: &DriverRef, indices: &[u32]) -> Result<Self> {
        Self::with_hint(driver, indices, Runtime::config().default_draw_hint)
    }

    /// Upload `indices`
    pub fn with_hint(driver: &DriverRef, indices: &[u32], hint: DrawHint) -> Result<Self> {
        let storage = BufferStorage::create(
            driver,
            BufferTarget::ElementArray,
            hint,
            bytemuck::cast_slice(indices),
            "forge::IndexBuffer",
        )?;

        Ok(Self {
            storage,
            capacity_policy: Runtime::config().capacity_policy,
        })
    }

    /// Move the driver buffer out, leaving `self` empty
    pub fn take(&mut self) -> Self {
        Self {
            storage: self.storage.take(),
            capacity_policy: self.capacity_policy,
        }
    }

    /// Bind as the element buffer of the currently bound vertex array
    pub fn bind(&self) -> Result<()> {
        self.storage.bind()
    }

    /// Clear the element buffer binding
    pub fn unbind(&self) {
        self.storage.unbind();
    }

    /// Replace all indices (same capacity policy as `VertexBuffer::set_data`)
    pub fn set_data(&mut self, indices: &[u32]) -> Result<()> {
        self.storage.replace(bytemuck::cast_slice(indices), self.capacity_policy)
    }

    /// Number of indices
    pub fn count(&self) -> usize { self.storage.size() / 4 }

    /// Bytes of index data
    pub fn size(&self) -> usize { self.storage.size() }

    /// Bytes reserved in the driver
    pub fn capacity(&self) -> usize { self.storage.capacity() }

    pub fn draw_hint(&self) -> DrawHint { self.storage.hint() }

    /// Driver buffer, `None` once moved out
    pub fn handle(&self) -> Option<BufferHandle> { self.storage.handle() }

    pub fn is_valid(&self) -> bool { self.storage.is_valid() }

    /// Override the configured capacity policy for this buffer
    pub fn set_capacity_policy(&mut self, policy: CapacityPolicy) {
        self.capacity_policy = policy;
    }
}

impl std::fmt::Debug for IndexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("handle", &self.storage.handle())
            .field("count", &self.count())
            .finish()
    }
}

#[cfg(test)]
#[path = "index_buffer_tests.rs"]
mod tests;
