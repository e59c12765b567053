/// Named vertex attribute descriptor

use crate::shader_data_type::{AttributeType, ShaderDataType};

/// One named attribute of a vertex (or instance) record
///
/// The byte offset is not user-supplied: it is `None` until the descriptor is
/// placed in a `BufferLayout`, which assigns it.
///
/// `Default` produces an empty placeholder (no name, `Float`, one element) that
/// is only meaningful before insertion into a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    data_type: ShaderDataType,
    name: String,
    element_count: u32,
    offset: Option<u32>,
}

impl AttributeDescriptor {
    /// Single-element attribute
    pub fn new(data_type: ShaderDataType, name: impl Into<String>) -> Self {
        Self::with_count(data_type, name, 1)
    }

    /// Attribute with `element_count` elements (array attributes)
    ///
    /// Zero is raised to one.
    pub fn with_count(data_type: ShaderDataType, name: impl Into<String>, element_count: u32) -> Self {
        Self {
            data_type,
            name: name.into(),
            element_count: element_count.max(1),
            offset: None,
        }
    }

    /// Single-element attribute whose type is taken from a Rust type
    ///
    /// # Example
    ///
    /// ```
    /// use vertex_forge::forge::{AttributeDescriptor, ShaderDataType};
    ///
    /// let position = AttributeDescriptor::of::<[f32; 3]>("position");
    /// assert_eq!(position.data_type(), ShaderDataType::Vec3);
    /// ```
    pub fn of<T: AttributeType>(name: impl Into<String>) -> Self {
        Self::new(T::DATA_TYPE, name)
    }

    // ===== ACCESSORS =====

    /// Attribute data type
    pub fn data_type(&self) -> ShaderDataType { self.data_type }

    /// Attribute name
    pub fn name(&self) -> &str { &self.name }

    /// Number of elements (1 unless this is an array attribute)
    pub fn element_count(&self) -> u32 { self.element_count }

    /// Total components (type components × element count)
    pub fn component_count(&self) -> u32 {
        self.data_type.component_count() * self.element_count
    }

    /// Size in bytes (registry size × element count)
    pub fn size_bytes(&self) -> u32 {
        self.data_type.size_bytes() * self.element_count
    }

    /// Byte offset within the record, once placed in a layout
    pub fn offset(&self) -> Option<u32> { self.offset }

    /// Whether this is the default-constructed placeholder
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }

    pub(crate) fn set_offset(&mut self, offset: u32) {
        self.offset = Some(offset);
    }
}

impl Default for AttributeDescriptor {
    fn default() -> Self {
        Self {
            data_type: ShaderDataType::Float,
            name: String::new(),
            element_count: 1,
            offset: None,
        }
    }
}

#[cfg(test)]
#[path = "attribute_tests.rs"]
mod tests;
