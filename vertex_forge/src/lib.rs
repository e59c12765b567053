/*!
# Vertex Forge

Vertex-data description and binding layer for graphics drivers.

This crate describes how raw floating-point vertex data is laid out in memory and
binds that data to driver attribute slots. The driver itself sits behind the
[`Driver`](crate::driver::Driver) trait (similar to a backend plugin), so the same
buffers and arrays work with any backend that implements it.

## Architecture

- **ShaderDataType**: Closed table of attribute types and their sizes
- **AttributeDescriptor**: One named attribute with its computed offset
- **BufferLayout**: Ordered attributes, tightly packed, with a stride
- **VertexBuffer / InstancedVertexBuffer**: Driver buffers of per-vertex or per-instance data
- **IndexBuffer**: Driver buffer of element indices
- **VertexArray**: Aggregates buffers into one bindable unit with a flat slot space
- **HeadlessDriver**: In-memory driver implementation (no GPU required)
*/

// Internal modules
mod error;
mod config;
mod runtime;
pub mod log;
pub mod shader_data_type;
pub mod driver;
pub mod vertex;

// Main forge namespace module
pub mod forge {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{Config, CapacityPolicy};

    // Runtime singleton (logger + configuration)
    pub use crate::runtime::Runtime;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Attribute type registry
    pub use crate::shader_data_type::{ShaderDataType, ComponentType, AttributeType};

    // Driver boundary
    pub mod driver {
        pub use crate::driver::*;
    }

    // Vertex data objects
    pub use crate::vertex::*;
}

// Re-export math library at crate root
pub use glam;
