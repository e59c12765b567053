/// Vertex module - layouts, buffers and vertex arrays

// Module declarations
pub mod attribute;
pub mod buffer_layout;
mod buffer_storage;
pub mod vertex_buffer;
pub mod instanced_vertex_buffer;
pub mod index_buffer;
pub mod vertex_array;

// Re-export main types
pub use attribute::AttributeDescriptor;
pub use buffer_layout::BufferLayout;
pub use vertex_buffer::VertexBuffer;
pub use instanced_vertex_buffer::InstancedVertexBuffer;
pub use index_buffer::IndexBuffer;
pub use vertex_array::{
    VertexArray, ArrayBuffer, ArrayState, AttributeBinding, BufferId, VertexInputRate,
};

// Draw hints are part of every buffer constructor
pub use crate::driver::DrawHint;
