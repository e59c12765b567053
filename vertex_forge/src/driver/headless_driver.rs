/// Headless driver - in-memory implementation of the `Driver` trait
///
/// Keeps buffer contents in host memory and records the attribute state of
/// every vertex array, which makes it usable anywhere a real graphics context is
/// unavailable (tests, asset tooling, CI). It enforces the same state-machine
/// rules a real driver would: attributes need a bound vertex array and a bound
/// array buffer, writes must stay inside the reserved storage.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use crate::error::Result;
use crate::{forge_bail, forge_err, forge_trace, forge_warn};
use crate::driver::{
    AttributePointer, BufferDesc, BufferHandle, BufferTarget, DrawHint, Driver,
    VertexArrayHandle,
};

new_key_type! {
    struct BufferKey;
    struct VertexArrayKey;
}

fn buffer_key(handle: BufferHandle) -> BufferKey {
    KeyData::from_ffi(handle.0).into()
}

fn buffer_handle(key: BufferKey) -> BufferHandle {
    BufferHandle(key.data().as_ffi())
}

fn vertex_array_key(handle: VertexArrayHandle) -> VertexArrayKey {
    KeyData::from_ffi(handle.0).into()
}

fn vertex_array_handle(key: VertexArrayKey) -> VertexArrayHandle {
    VertexArrayHandle(key.data().as_ffi())
}

// ============================================================================
// Stored objects
// ============================================================================

struct HeadlessBuffer {
    target: BufferTarget,
    hint: DrawHint,
    /// Full reserved storage (len == capacity)
    storage: Vec<u8>,
}

#[derive(Default)]
struct HeadlessVertexArray {
    attributes: BTreeMap<u32, BoundAttribute>,
    element_buffer: Option<BufferHandle>,
}

/// Attribute state recorded in a vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAttribute {
    /// Pointer as passed to `enable_attribute`
    pub pointer: AttributePointer,
    /// Array buffer that was bound when the attribute was enabled
    pub buffer: BufferHandle,
}

/// Lifetime counters, used to detect leaks and double releases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub buffers_created: u32,
    pub buffers_destroyed: u32,
    pub vertex_arrays_created: u32,
    pub vertex_arrays_destroyed: u32,
    pub reallocations: u32,
    pub bytes_uploaded: u64,
    /// Release calls for names that were never created or already released
    pub invalid_releases: u32,
}

// ============================================================================
// HeadlessDriver
// ============================================================================

pub struct HeadlessDriver {
    buffers: RefCell<SlotMap<BufferKey, HeadlessBuffer>>,
    vertex_arrays: RefCell<SlotMap<VertexArrayKey, HeadlessVertexArray>>,
    bound_array_buffer: Cell<Option<BufferHandle>>,
    bound_vertex_array: Cell<Option<VertexArrayHandle>>,
    stats: Cell<DriverStats>,
    memory_limit: usize,
}

impl HeadlessDriver {
    /// Create a driver with unlimited memory
    pub fn new() -> Self {
        Self::with_memory_limit(usize::MAX)
    }

    /// Create a driver that reports `Error::OutOfMemory` once the total
    /// reserved storage would exceed `bytes`
    pub fn with_memory_limit(bytes: usize) -> Self {
        Self {
            buffers: RefCell::new(SlotMap::with_key()),
            vertex_arrays: RefCell::new(SlotMap::with_key()),
            bound_array_buffer: Cell::new(None),
            bound_vertex_array: Cell::new(None),
            stats: Cell::new(DriverStats::default()),
            memory_limit: bytes,
        }
    }

    // ===== INSPECTION =====

    /// Lifetime counters
    pub fn stats(&self) -> DriverStats {
        self.stats.get()
    }

    /// Number of buffers currently alive
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.borrow().len()
    }

    /// Number of vertex arrays currently alive
    pub fn live_vertex_array_count(&self) -> usize {
        self.vertex_arrays.borrow().len()
    }

    /// Total reserved storage over all live buffers
    pub fn allocated_bytes(&self) -> usize {
        self.buffers.borrow().values().map(|b| b.storage.len()).sum()
    }

    /// Reserved storage of a buffer
    pub fn buffer_capacity(&self, buffer: BufferHandle) -> Option<usize> {
        self.buffers.borrow().get(buffer_key(buffer)).map(|b| b.storage.len())
    }

    /// Draw hint a buffer was last (re)allocated with
    pub fn buffer_hint(&self, buffer: BufferHandle) -> Option<DrawHint> {
        self.buffers.borrow().get(buffer_key(buffer)).map(|b| b.hint)
    }

    /// Target a buffer was created for
    pub fn buffer_target(&self, buffer: BufferHandle) -> Option<BufferTarget> {
        self.buffers.borrow().get(buffer_key(buffer)).map(|b| b.target)
    }

    /// Copy of a byte range of a buffer
    pub fn read_bytes(&self, buffer: BufferHandle, offset: usize, len: usize) -> Option<Vec<u8>> {
        let buffers = self.buffers.borrow();
        let stored = buffers.get(buffer_key(buffer))?;
        stored.storage.get(offset..offset.checked_add(len)?).map(|bytes| bytes.to_vec())
    }

    /// `count` floats starting at byte `offset`
    pub fn read_floats(&self, buffer: BufferHandle, offset: usize, count: usize) -> Option<Vec<f32>> {
        let bytes = self.read_bytes(buffer, offset, count.checked_mul(4)?)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    /// `count` u32 values starting at byte `offset`
    pub fn read_u32s(&self, buffer: BufferHandle, offset: usize, count: usize) -> Option<Vec<u32>> {
        let bytes = self.read_bytes(buffer, offset, count.checked_mul(4)?)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    /// Currently bound vertex array
    pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.bound_vertex_array.get()
    }

    /// Currently bound array buffer
    pub fn bound_array_buffer(&self) -> Option<BufferHandle> {
        self.bound_array_buffer.get()
    }

    /// Enabled attributes of a vertex array, ordered by slot
    pub fn vertex_array_attributes(&self, array: VertexArrayHandle) -> Vec<BoundAttribute> {
        self.vertex_arrays
            .borrow()
            .get(vertex_array_key(array))
            .map(|va| va.attributes.values().copied().collect())
            .unwrap_or_default()
    }

    /// Element buffer attached to a vertex array
    pub fn vertex_array_element_buffer(&self, array: VertexArrayHandle) -> Option<BufferHandle> {
        self.vertex_arrays
            .borrow()
            .get(vertex_array_key(array))
            .and_then(|va| va.element_buffer)
    }

    // ===== INTERNAL =====

    fn update_stats(&self, f: impl FnOnce(&mut DriverStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn check_memory(&self, additional: usize) -> Result<()> {
        let allocated = self.allocated_bytes();
        if allocated.saturating_add(additional) > self.memory_limit {
            crate::forge_error!("forge::headless",
                "Allocation of {} bytes exceeds memory limit ({} of {} bytes in use)",
                additional, allocated, self.memory_limit);
            return Err(crate::error::Error::OutOfMemory);
        }
        Ok(())
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for HeadlessDriver {
    fn create_buffer(&self, desc: &BufferDesc, data: &[u8]) -> Result<BufferHandle> {
        if data.len() > desc.capacity {
            forge_bail!("forge::headless", BackendError,
                "create_buffer: {} bytes of data exceed requested capacity {}",
                data.len(), desc.capacity);
        }
        self.check_memory(desc.capacity)?;

        let mut storage = vec![0u8; desc.capacity];
        storage[..data.len()].copy_from_slice(data);

        let key = self.buffers.borrow_mut().insert(HeadlessBuffer {
            target: desc.target,
            hint: desc.hint,
            storage,
        });
        self.update_stats(|s| {
            s.buffers_created += 1;
            s.bytes_uploaded += data.len() as u64;
        });

        let handle = buffer_handle(key);
        forge_trace!("forge::headless", "create_buffer {:?} ({:?}, {} bytes, {:?})",
            handle, desc.target, desc.capacity, desc.hint);
        Ok(handle)
    }

    fn write_buffer(&self, buffer: BufferHandle, offset: usize, data: &[u8]) -> Result<()> {
        let mut buffers = self.buffers.borrow_mut();
        let stored = buffers.get_mut(buffer_key(buffer))
            .ok_or_else(|| forge_err!("forge::headless", InvalidResource,
                "write_buffer: unknown buffer {:?}", buffer))?;

        let end = offset.checked_add(data.len()).unwrap_or(usize::MAX);
        if end > stored.storage.len() {
            forge_bail!("forge::headless", BackendError,
                "write_buffer: range {}..{} outside storage of {} bytes",
                offset, end, stored.storage.len());
        }
        stored.storage[offset..end].copy_from_slice(data);
        drop(buffers);

        self.update_stats(|s| s.bytes_uploaded += data.len() as u64);
        Ok(())
    }

    fn reallocate_buffer(
        &self,
        buffer: BufferHandle,
        capacity: usize,
        hint: DrawHint,
        preserve: usize,
    ) -> Result<()> {
        let old_capacity = self.buffer_capacity(buffer)
            .ok_or_else(|| forge_err!("forge::headless", InvalidResource,
                "reallocate_buffer: unknown buffer {:?}", buffer))?;
        if preserve > old_capacity || preserve > capacity {
            forge_bail!("forge::headless", BackendError,
                "reallocate_buffer: cannot preserve {} bytes ({} -> {})",
                preserve, old_capacity, capacity);
        }
        self.check_memory(capacity.saturating_sub(old_capacity))?;

        let mut buffers = self.buffers.borrow_mut();
        if let Some(stored) = buffers.get_mut(buffer_key(buffer)) {
            let mut storage = vec![0u8; capacity];
            storage[..preserve].copy_from_slice(&stored.storage[..preserve]);
            stored.storage = storage;
            stored.hint = hint;
        }
        drop(buffers);

        self.update_stats(|s| s.reallocations += 1);
        forge_trace!("forge::headless", "reallocate_buffer {:?} {} -> {} bytes",
            buffer, old_capacity, capacity);
        Ok(())
    }

    fn copy_buffer_range(
        &self,
        buffer: BufferHandle,
        src_offset: usize,
        dst_offset: usize,
        len: usize,
    ) -> Result<()> {
        let mut buffers = self.buffers.borrow_mut();
        let stored = buffers.get_mut(buffer_key(buffer))
            .ok_or_else(|| forge_err!("forge::headless", InvalidResource,
                "copy_buffer_range: unknown buffer {:?}", buffer))?;

        let capacity = stored.storage.len();
        let src_end = src_offset.saturating_add(len);
        let dst_end = dst_offset.saturating_add(len);
        if src_end > capacity || dst_end > capacity {
            forge_bail!("forge::headless", BackendError,
                "copy_buffer_range: range outside storage of {} bytes", capacity);
        }
        if src_offset < dst_end && dst_offset < src_end {
            forge_bail!("forge::headless", BackendError,
                "copy_buffer_range: overlapping ranges {}..{} and {}..{}",
                src_offset, src_end, dst_offset, dst_end);
        }
        stored.storage.copy_within(src_offset..src_end, dst_offset);
        Ok(())
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        if let Some(handle) = buffer {
            if !self.buffers.borrow().contains_key(buffer_key(handle)) {
                forge_warn!("forge::headless", "bind_buffer: unknown buffer {:?} ignored", handle);
                return;
            }
        }

        match target {
            BufferTarget::Array => self.bound_array_buffer.set(buffer),
            BufferTarget::ElementArray => {
                if let Some(array) = self.bound_vertex_array.get() {
                    if let Some(va) = self.vertex_arrays.borrow_mut().get_mut(vertex_array_key(array)) {
                        va.element_buffer = buffer;
                    }
                }
            }
        }
        forge_trace!("forge::headless", "bind_buffer {:?} {:?}", target, buffer);
    }

    fn destroy_buffer(&self, buffer: BufferHandle) {
        if self.buffers.borrow_mut().remove(buffer_key(buffer)).is_none() {
            forge_warn!("forge::headless", "destroy_buffer: unknown buffer {:?}", buffer);
            self.update_stats(|s| s.invalid_releases += 1);
            return;
        }
        if self.bound_array_buffer.get() == Some(buffer) {
            self.bound_array_buffer.set(None);
        }
        self.update_stats(|s| s.buffers_destroyed += 1);
        forge_trace!("forge::headless", "destroy_buffer {:?}", buffer);
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle> {
        let key = self.vertex_arrays.borrow_mut().insert(HeadlessVertexArray::default());
        self.update_stats(|s| s.vertex_arrays_created += 1);

        let handle = vertex_array_handle(key);
        forge_trace!("forge::headless", "create_vertex_array {:?}", handle);
        Ok(handle)
    }

    fn bind_vertex_array(&self, array: Option<VertexArrayHandle>) {
        if let Some(handle) = array {
            if !self.vertex_arrays.borrow().contains_key(vertex_array_key(handle)) {
                forge_warn!("forge::headless", "bind_vertex_array: unknown array {:?} ignored", handle);
                return;
            }
        }
        self.bound_vertex_array.set(array);
        forge_trace!("forge::headless", "bind_vertex_array {:?}", array);
    }

    fn enable_attribute(&self, pointer: &AttributePointer) -> Result<()> {
        let array = self.bound_vertex_array.get()
            .ok_or_else(|| forge_err!("forge::headless", BackendError,
                "enable_attribute: no vertex array bound (slot {})", pointer.slot))?;
        let buffer = self.bound_array_buffer.get()
            .ok_or_else(|| forge_err!("forge::headless", BackendError,
                "enable_attribute: no array buffer bound (slot {})", pointer.slot))?;
        if pointer.components == 0 {
            forge_bail!("forge::headless", BackendError,
                "enable_attribute: slot {} has zero components", pointer.slot);
        }

        let mut arrays = self.vertex_arrays.borrow_mut();
        let va = arrays.get_mut(vertex_array_key(array))
            .ok_or_else(|| forge_err!("forge::headless", InvalidResource,
                "enable_attribute: bound array {:?} no longer exists", array))?;
        va.attributes.insert(pointer.slot, BoundAttribute { pointer: *pointer, buffer });

        forge_trace!("forge::headless", "enable_attribute {:?} from {:?}", pointer, buffer);
        Ok(())
    }

    fn disable_attribute(&self, slot: u32) {
        let Some(array) = self.bound_vertex_array.get() else {
            forge_warn!("forge::headless", "disable_attribute: no vertex array bound (slot {})", slot);
            return;
        };
        let removed = self.vertex_arrays.borrow_mut()
            .get_mut(vertex_array_key(array))
            .and_then(|va| va.attributes.remove(&slot));
        if removed.is_none() {
            forge_warn!("forge::headless", "disable_attribute: slot {} not enabled in {:?}", slot, array);
            return;
        }
        forge_trace!("forge::headless", "disable_attribute {} in {:?}", slot, array);
    }

    fn destroy_vertex_array(&self, array: VertexArrayHandle) {
        if self.vertex_arrays.borrow_mut().remove(vertex_array_key(array)).is_none() {
            forge_warn!("forge::headless", "destroy_vertex_array: unknown array {:?}", array);
            self.update_stats(|s| s.invalid_releases += 1);
            return;
        }
        if self.bound_vertex_array.get() == Some(array) {
            self.bound_vertex_array.set(None);
        }
        self.update_stats(|s| s.vertex_arrays_destroyed += 1);
        forge_trace!("forge::headless", "destroy_vertex_array {:?}", array);
    }
}

#[cfg(test)]
#[path = "headless_driver_tests.rs"]
mod tests;
