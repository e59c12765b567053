/// Driver trait - the boundary between vertex objects and a graphics backend

use std::rc::Rc;
use crate::error::Result;
use crate::shader_data_type::ComponentType;

/// Shared reference to a driver context
///
/// Driver contexts are single-threaded, so resources hold an `Rc` and are
/// therefore `!Send`.
pub type DriverRef = Rc<dyn Driver>;

/// Opaque driver-side buffer name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Opaque driver-side vertex array name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u64);

/// Binding point of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data
    Array,
    /// Element indices
    ElementArray,
}

/// Expected update frequency of a buffer's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawHint {
    /// Written once, drawn many times
    Static,
    /// Rewritten repeatedly, drawn many times
    Dynamic,
    /// Written once, drawn a few times
    Stream,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Binding point
    pub target: BufferTarget,
    /// Reserved storage in bytes (at least the initial data length)
    pub capacity: usize,
    /// Update frequency hint
    pub hint: DrawHint,
}

/// One enabled vertex attribute, as recorded in a vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePointer {
    /// Attribute binding slot
    pub slot: u32,
    /// Components per vertex (type components × element count)
    pub components: u32,
    /// Scalar type of the components
    pub component_type: ComponentType,
    /// Stride in bytes between consecutive records
    pub stride: u32,
    /// Offset in bytes from the start of the record
    pub offset: u32,
    /// 0 = advance per vertex, 1 = advance per instance
    pub divisor: u32,
}

/// Driver trait
///
/// Models a state-machine API: `enable_attribute` records the pointer into the
/// currently bound vertex array and sources it from the currently bound
/// `BufferTarget::Array` buffer. Binding an `ElementArray` buffer while a vertex
/// array is bound attaches it to that array.
///
/// Release methods do not fail; they are called from `Drop`.
pub trait Driver {
    /// Create a buffer and upload `data` at offset 0
    fn create_buffer(&self, desc: &BufferDesc, data: &[u8]) -> Result<BufferHandle>;

    /// Overwrite `data.len()` bytes starting at `offset`
    fn write_buffer(&self, buffer: BufferHandle, offset: usize, data: &[u8]) -> Result<()>;

    /// Re-reserve storage, keeping the handle and the first `preserve` bytes
    fn reallocate_buffer(
        &self,
        buffer: BufferHandle,
        capacity: usize,
        hint: DrawHint,
        preserve: usize,
    ) -> Result<()>;

    /// Copy `len` bytes inside one buffer (ranges must not overlap)
    fn copy_buffer_range(
        &self,
        buffer: BufferHandle,
        src_offset: usize,
        dst_offset: usize,
        len: usize,
    ) -> Result<()>;

    /// Bind a buffer to a target (`None` unbinds)
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);

    /// Release a buffer
    fn destroy_buffer(&self, buffer: BufferHandle);

    /// Create an empty vertex array
    fn create_vertex_array(&self) -> Result<VertexArrayHandle>;

    /// Bind a vertex array (`None` unbinds)
    fn bind_vertex_array(&self, array: Option<VertexArrayHandle>);

    /// Enable an attribute slot in the bound vertex array
    fn enable_attribute(&self, pointer: &AttributePointer) -> Result<()>;

    /// Disable an attribute slot in the bound vertex array
    fn disable_attribute(&self, slot: u32);

    /// Release a vertex array
    fn destroy_vertex_array(&self, array: VertexArrayHandle);
}
