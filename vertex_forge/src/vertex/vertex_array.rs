/// Vertex array - aggregates buffers into one bindable unit
///
/// Every attribute of every added buffer gets the next sequential binding slot,
/// starting at 0 and continuing across buffers. Slots are never reused or
/// renumbered: the array is append-only and only its destruction releases the
/// buffers it owns.
///
/// Architecture:
/// - `buffers`: ownership list in insertion order (`BufferId` = position)
/// - `bindings`: one `AttributeBinding` per slot, indexed by slot
/// - `next_slot`: running slot counter

use crate::driver::{AttributePointer, BufferHandle, DriverRef, VertexArrayHandle};
use crate::error::Result;
use crate::shader_data_type::ShaderDataType;
use crate::vertex::{BufferLayout, IndexBuffer, InstancedVertexBuffer, VertexBuffer};
use crate::{forge_bail, forge_debug, forge_err};

const SOURCE: &str = "forge::VertexArray";

// ===== BINDING TYPES =====

/// Position of a buffer in a vertex array (insertion order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

/// Advance rate of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexInputRate {
    /// Data is per-vertex
    Vertex,
    /// Data is per-instance
    Instance,
}

impl VertexInputRate {
    /// Driver attribute divisor
    pub fn divisor(&self) -> u32 {
        match self {
            VertexInputRate::Vertex => 0,
            VertexInputRate::Instance => 1,
        }
    }
}

/// One attribute assigned to a binding slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeBinding {
    pub slot: u32,
    pub name: String,
    pub data_type: ShaderDataType,
    pub element_count: u32,
    /// Byte offset inside the record
    pub offset: u32,
    /// Record stride of the source buffer
    pub stride: u32,
    pub input_rate: VertexInputRate,
    /// Buffer the attribute is sourced from
    pub buffer: BufferId,
}

/// Lifecycle of a vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayState {
    /// No buffer added yet
    Empty,
    /// At least one buffer added
    Populated,
}

// ===== ARRAY BUFFER =====

/// Buffer owned by a vertex array
#[derive(Debug)]
pub enum ArrayBuffer {
    Vertex(VertexBuffer),
    Instanced(InstancedVertexBuffer),
}

impl ArrayBuffer {
    /// Advance rate applied to every attribute of this buffer
    pub fn input_rate(&self) -> VertexInputRate {
        match self {
            ArrayBuffer::Vertex(_) => VertexInputRate::Vertex,
            ArrayBuffer::Instanced(_) => VertexInputRate::Instance,
        }
    }

    pub fn layout(&self) -> Option<&BufferLayout> {
        match self {
            ArrayBuffer::Vertex(buffer) => buffer.layout(),
            ArrayBuffer::Instanced(buffer) => buffer.layout(),
        }
    }

    pub fn handle(&self) -> Option<BufferHandle> {
        match self {
            ArrayBuffer::Vertex(buffer) => buffer.handle(),
            ArrayBuffer::Instanced(buffer) => buffer.handle(),
        }
    }

    pub fn bind(&self) -> Result<()> {
        match self {
            ArrayBuffer::Vertex(buffer) => buffer.bind(),
            ArrayBuffer::Instanced(buffer) => buffer.bind(),
        }
    }

    pub fn as_vertex(&self) -> Option<&VertexBuffer> {
        match self {
            ArrayBuffer::Vertex(buffer) => Some(buffer),
            ArrayBuffer::Instanced(_) => None,
        }
    }

    pub fn as_vertex_mut(&mut self) -> Option<&mut VertexBuffer> {
        match self {
            ArrayBuffer::Vertex(buffer) => Some(buffer),
            ArrayBuffer::Instanced(_) => None,
        }
    }

    pub fn as_instanced(&self) -> Option<&InstancedVertexBuffer> {
        match self {
            ArrayBuffer::Instanced(buffer) => Some(buffer),
            ArrayBuffer::Vertex(_) => None,
        }
    }

    pub fn as_instanced_mut(&mut self) -> Option<&mut InstancedVertexBuffer> {
        match self {
            ArrayBuffer::Instanced(buffer) => Some(buffer),
            ArrayBuffer::Vertex(_) => None,
        }
    }
}

impl From<VertexBuffer> for ArrayBuffer {
    fn from(buffer: VertexBuffer) -> Self {
        ArrayBuffer::Vertex(buffer)
    }
}

impl From<InstancedVertexBuffer> for ArrayBuffer {
    fn from(buffer: InstancedVertexBuffer) -> Self {
        ArrayBuffer::Instanced(buffer)
    }
}

// ===== VERTEX ARRAY =====

struct BufferEntry {
    buffer: ArrayBuffer,
    first_slot: u32,
}

pub struct VertexArray {
    driver: DriverRef,
    handle: Option<VertexArrayHandle>,
    buffers: Vec<BufferEntry>,
    bindings: Vec<AttributeBinding>,
    next_slot: u32,
    index_buffer: Option<IndexBuffer>,
}

impl VertexArray {
    /// Create an empty vertex array
    pub fn new(driver: &DriverRef) -> Result<Self> {
        let handle = driver.create_vertex_array()?;
        forge_debug!(SOURCE, "Created vertex array {:?}", handle);

        Ok(Self {
            driver: driver.clone(),
            handle: Some(handle),
            buffers: Vec::new(),
            bindings: Vec::new(),
            next_slot: 0,
            index_buffer: None,
        })
    }

    /// Move the driver array and every owned buffer out, leaving `self` empty
    pub fn take(&mut self) -> Self {
        Self {
            driver: self.driver.clone(),
            handle: self.handle.take(),
            buffers: std::mem::take(&mut self.buffers),
            bindings: std::mem::take(&mut self.bindings),
            next_slot: std::mem::replace(&mut self.next_slot, 0),
            index_buffer: self.index_buffer.take(),
        }
    }

    // ===== BUFFERS =====

    /// Add a per-vertex buffer (divisor 0)
    pub fn add_vertex_buffer(&mut self, buffer: VertexBuffer) -> Result<BufferId> {
        self.add_buffer(buffer)
    }

    /// Add a per-instance buffer (divisor 1)
    pub fn add_instanced_buffer(&mut self, buffer: InstancedVertexBuffer) -> Result<BufferId> {
        self.add_buffer(buffer)
    }

    /// Add a buffer and assign its attributes the next sequential slots
    ///
    /// Fails with `Error::ConfigurationError` if the buffer has no layout; the
    /// buffer is dropped and no slot is assigned. A driver failure during
    /// attribute setup also leaves the slot count unchanged.
    ///
    /// The vertex array stays bound afterwards.
    pub fn add_buffer(&mut self, buffer: impl Into<ArrayBuffer>) -> Result<BufferId> {
        let buffer = buffer.into();
        let array = self.live_handle()?;

        let layout = match buffer.layout() {
            Some(layout) => layout,
            None => forge_bail!(SOURCE, ConfigurationError, "missing layout"),
        };
        if buffer.handle().is_none() {
            forge_bail!(SOURCE, InvalidResource, "buffer has been moved out");
        }

        // ========== COMPUTE BINDINGS ==========
        let id = BufferId(self.buffers.len());
        let input_rate = buffer.input_rate();
        let stride = layout.stride();
        let first_slot = self.next_slot;

        let mut new_bindings = Vec::with_capacity(layout.len());
        for (slot, attribute) in (first_slot..).zip(layout.iter()) {
            new_bindings.push(AttributeBinding {
                slot,
                name: attribute.name().to_string(),
                data_type: attribute.data_type(),
                element_count: attribute.element_count(),
                offset: attribute.offset().unwrap_or(0),
                stride,
                input_rate,
                buffer: id,
            });
        }

        // ========== DRIVER SETUP ==========
        self.driver.bind_vertex_array(Some(array));
        buffer.bind()?;
        for (enabled, binding) in new_bindings.iter().enumerate() {
            let pointer = AttributePointer {
                slot: binding.slot,
                components: binding.data_type.component_count() * binding.element_count,
                component_type: binding.data_type.component_type(),
                stride: binding.stride,
                offset: binding.offset,
                divisor: binding.input_rate.divisor(),
            };
            if let Err(err) = self.driver.enable_attribute(&pointer) {
                // No slot may keep sourcing the rejected buffer
                for rolled_back in &new_bindings[..enabled] {
                    self.driver.disable_attribute(rolled_back.slot);
                }
                return Err(err);
            }
        }

        // ========== COMMIT ==========
        let assigned = new_bindings.len() as u32;
        self.next_slot += assigned;
        self.bindings.extend(new_bindings);
        self.buffers.push(BufferEntry { buffer, first_slot });

        forge_debug!(SOURCE, "Added {:?} buffer {:?}: slots {}..{}",
            input_rate, id, first_slot, self.next_slot);
        Ok(id)
    }

    /// Attach an index buffer, replacing (and releasing) any previous one
    pub fn set_index_buffer(&mut self, index_buffer: IndexBuffer) -> Result<()> {
        let array = self.live_handle()?;

        self.driver.bind_vertex_array(Some(array));
        index_buffer.bind()?;

        forge_debug!(SOURCE, "Attached index buffer {:?} ({} indices)",
            index_buffer.handle(), index_buffer.count());
        self.index_buffer = Some(index_buffer);
        Ok(())
    }

    /// Attached index buffer
    pub fn index_buffer(&self) -> Option<&IndexBuffer> {
        self.index_buffer.as_ref()
    }

    // ===== BINDING =====

    /// Make this array's attribute bindings active for subsequent draws
    pub fn bind(&self) -> Result<()> {
        let array = self.live_handle()?;
        self.driver.bind_vertex_array(Some(array));
        Ok(())
    }

    /// Clear the vertex array binding
    pub fn unbind(&self) {
        self.driver.bind_vertex_array(None);
    }

    // ===== QUERIES =====

    /// Every assigned binding, ordered by slot
    pub fn bindings(&self) -> &[AttributeBinding] {
        &self.bindings
    }

    /// Binding at `slot`
    pub fn binding(&self, slot: u32) -> Option<&AttributeBinding> {
        // Slots are contiguous from 0, so the slot is the index
        self.bindings.get(slot as usize)
    }

    /// First binding with this attribute name
    pub fn binding_by_name(&self, name: &str) -> Option<&AttributeBinding> {
        self.bindings.iter().find(|binding| binding.name == name)
    }

    /// Bindings sourced from one buffer
    pub fn buffer_bindings(&self, id: BufferId) -> &[AttributeBinding] {
        let Some(entry) = self.buffers.get(id.0) else {
            return &[];
        };
        let start = entry.first_slot as usize;
        let end = self.buffers
            .get(id.0 + 1)
            .map_or(self.bindings.len(), |next| next.first_slot as usize);
        &self.bindings[start..end]
    }

    /// Owned buffer
    pub fn buffer(&self, id: BufferId) -> Option<&ArrayBuffer> {
        self.buffers.get(id.0).map(|entry| &entry.buffer)
    }

    /// Owned buffer, for data updates
    ///
    /// Replacing its layout does not renumber the slots already assigned.
    pub fn buffer_mut(&mut self, id: BufferId) -> Option<&mut ArrayBuffer> {
        self.buffers.get_mut(id.0).map(|entry| &mut entry.buffer)
    }

    /// First slot assigned to a buffer
    pub fn first_slot(&self, id: BufferId) -> Option<u32> {
        self.buffers.get(id.0).map(|entry| entry.first_slot)
    }

    /// Number of owned buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of assigned slots
    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }

    pub fn state(&self) -> ArrayState {
        if self.buffers.is_empty() {
            ArrayState::Empty
        } else {
            ArrayState::Populated
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Driver array, `None` once moved out
    pub fn handle(&self) -> Option<VertexArrayHandle> {
        self.handle
    }

    /// Whether this value still owns a driver array
    pub fn is_valid(&self) -> bool {
        self.handle.is_some()
    }

    fn live_handle(&self) -> Result<VertexArrayHandle> {
        self.handle.ok_or_else(|| forge_err!(SOURCE, InvalidResource,
            "vertex array has been moved out"))
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.driver.destroy_vertex_array(handle);
        }
    }
}

impl std::fmt::Debug for VertexArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexArray")
            .field("handle", &self.handle)
            .field("buffers", &self.buffers.len())
            .field("slots", &self.next_slot)
            .field("index_buffer", &self.index_buffer)
            .finish()
    }
}

#[cfg(test)]
#[path = "vertex_array_tests.rs"]
mod tests;
