/// Driver-side buffer storage shared by vertex, instanced and index buffers
///
/// Tracks the driver handle, the bytes in use (`size`) and the bytes reserved
/// (`capacity`). Releases the driver buffer exactly once on drop; an emptied
/// storage (after `take`) releases nothing.

use crate::config::CapacityPolicy;
use crate::driver::{BufferDesc, BufferHandle, BufferTarget, DrawHint, DriverRef};
use crate::error::Result;
use crate::{forge_bail, forge_err, forge_debug};

pub(crate) struct BufferStorage {
    driver: DriverRef,
    handle: Option<BufferHandle>,
    target: BufferTarget,
    hint: DrawHint,
    size: usize,
    capacity: usize,
    source: &'static str,
}

impl BufferStorage {
    /// Create a driver buffer holding exactly `data`
    pub(crate) fn create(
        driver: &DriverRef,
        target: BufferTarget,
        hint: DrawHint,
        data: &[u8],
        source: &'static str,
    ) -> Result<Self> {
        let desc = BufferDesc { target, capacity: data.len(), hint };
        let handle = driver.create_buffer(&desc, data)?;

        forge_debug!(source, "Created buffer {:?} ({} bytes, {:?})", handle, data.len(), hint);

        Ok(Self {
            driver: driver.clone(),
            handle: Some(handle),
            target,
            hint,
            size: data.len(),
            capacity: data.len(),
            source,
        })
    }

    /// Move the driver buffer out, leaving `self` empty
    pub(crate) fn take(&mut self) -> Self {
        let taken = Self {
            driver: self.driver.clone(),
            handle: self.handle.take(),
            target: self.target,
            hint: self.hint,
            size: self.size,
            capacity: self.capacity,
            source: self.source,
        };
        self.size = 0;
        self.capacity = 0;
        taken
    }

    // ===== ACCESSORS =====

    pub(crate) fn handle(&self) -> Option<BufferHandle> { self.handle }
    pub(crate) fn hint(&self) -> DrawHint { self.hint }
    pub(crate) fn size(&self) -> usize { self.size }
    pub(crate) fn capacity(&self) -> usize { self.capacity }
    pub(crate) fn is_valid(&self) -> bool { self.handle.is_some() }

    /// Handle, or `InvalidResource` for an emptied buffer
    pub(crate) fn live_handle(&self) -> Result<BufferHandle> {
        self.handle.ok_or_else(|| forge_err!(self.source, InvalidResource,
            "buffer has been moved out"))
    }

    // ===== BINDING =====

    pub(crate) fn bind(&self) -> Result<()> {
        let handle = self.live_handle()?;
        self.driver.bind_buffer(self.target, Some(handle));
        Ok(())
    }

    pub(crate) fn unbind(&self) {
        self.driver.bind_buffer(self.target, None);
    }

    // ===== DATA =====

    /// Replace the whole contents with `data`
    pub(crate) fn replace(&mut self, data: &[u8], policy: CapacityPolicy) -> Result<()> {
        let handle = self.live_handle()?;

        if data.len() > self.capacity {
            match policy {
                CapacityPolicy::Reject => {
                    forge_bail!(self.source, CapacityError,
                        "{} bytes exceed reserved capacity of {} bytes",
                        data.len(), self.capacity);
                }
                CapacityPolicy::Grow => {
                    self.driver.reallocate_buffer(handle, data.len(), self.hint, 0)?;
                    forge_debug!(self.source, "Grew buffer {:?} from {} to {} bytes",
                        handle, self.capacity, data.len());
                    self.capacity = data.len();
                }
            }
        }

        self.driver.write_buffer(handle, 0, data)?;
        self.size = data.len();
        Ok(())
    }

    /// Overwrite part of the contents; never grows
    pub(crate) fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let handle = self.live_handle()?;

        let end = offset.checked_add(data.len()).unwrap_or(usize::MAX);
        if end > self.capacity {
            forge_bail!(self.source, CapacityError,
                "write of {} bytes at offset {} exceeds reserved capacity of {} bytes",
                data.len(), offset, self.capacity);
        }

        self.driver.write_buffer(handle, offset, data)?;
        self.size = self.size.max(end);
        Ok(())
    }

    /// Make sure at least `capacity` bytes are reserved, keeping the bytes in use
    pub(crate) fn reserve(&mut self, capacity: usize) -> Result<()> {
        let handle = self.live_handle()?;
        if capacity <= self.capacity {
            return Ok(());
        }

        self.driver.reallocate_buffer(handle, capacity, self.hint, self.size)?;
        forge_debug!(self.source, "Reserved {} bytes for buffer {:?} (was {})",
            capacity, handle, self.capacity);
        self.capacity = capacity;
        Ok(())
    }

    /// Copy `len` bytes from `src` to `dst` inside the buffer
    pub(crate) fn copy_within(&self, src: usize, dst: usize, len: usize) -> Result<()> {
        let handle = self.live_handle()?;
        self.driver.copy_buffer_range(handle, src, dst, len)
    }

    /// Shrink the bytes in use; capacity is kept
    pub(crate) fn truncate(&mut self, size: usize) {
        self.size = self.size.min(size);
    }
}

impl Drop for BufferStorage {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.driver.destroy_buffer(handle);
        }
    }
}

#[cfg(test)]
#[path = "buffer_storage_tests.rs"]
mod tests;
