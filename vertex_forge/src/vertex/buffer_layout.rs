/// Buffer layout - ordered attributes with tightly packed offsets

use rustc_hash::FxHashMap;
use crate::vertex::AttributeDescriptor;

/// Ordered sequence of attributes describing one vertex (or instance) record
///
/// Offsets are assigned in declaration order with no alignment padding:
/// `offset[0] = 0`, `offset[i] = offset[i-1] + size[i-1]`, and the stride is the
/// running total after the last attribute. An empty layout has stride 0.
///
/// # Example
///
/// ```
/// use vertex_forge::forge::{AttributeDescriptor, BufferLayout, ShaderDataType};
///
/// let layout = BufferLayout::new([
///     AttributeDescriptor::new(ShaderDataType::Vec3, "position"),
///     AttributeDescriptor::new(ShaderDataType::Vec2, "uv"),
/// ]);
/// assert_eq!(layout.stride(), 20);
/// assert_eq!(layout.attribute("uv").and_then(|a| a.offset()), Some(12));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferLayout {
    attributes: Vec<AttributeDescriptor>,
    /// Name to index (first occurrence)
    attribute_names: FxHashMap<String, usize>,
    stride: u32,
}

impl BufferLayout {
    /// Build a layout from attributes in declaration order
    pub fn new(attributes: impl IntoIterator<Item = AttributeDescriptor>) -> Self {
        let mut layout = Self {
            attributes: attributes.into_iter().collect(),
            attribute_names: FxHashMap::default(),
            stride: 0,
        };
        layout.compute_offsets();
        layout
    }

    /// Layout with no attributes (stride 0)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append an attribute and re-derive all offsets
    pub fn push(&mut self, attribute: AttributeDescriptor) -> &mut Self {
        self.attributes.push(attribute);
        self.compute_offsets();
        self
    }

    /// Single pass over the attributes; always recomputes from scratch
    fn compute_offsets(&mut self) {
        self.attribute_names.clear();
        let mut current_offset: u32 = 0;

        for (index, attribute) in self.attributes.iter_mut().enumerate() {
            attribute.set_offset(current_offset);
            current_offset += attribute.size_bytes();
            self.attribute_names
                .entry(attribute.name().to_string())
                .or_insert(index);
        }

        self.stride = current_offset;
    }

    // ===== ACCESSORS =====

    /// Total byte size of one record
    pub fn stride(&self) -> u32 { self.stride }

    /// Stride counted in 4-byte elements
    ///
    /// Only meaningful when every component is 4 bytes wide, which holds for
    /// every `ShaderDataType`.
    pub fn stride_elements(&self) -> u32 { self.stride / 4 }

    /// Attributes in declaration order
    pub fn attributes(&self) -> &[AttributeDescriptor] { &self.attributes }

    /// Iterate attributes in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDescriptor> {
        self.attributes.iter()
    }

    /// Number of attributes
    pub fn len(&self) -> usize { self.attributes.len() }

    /// Whether the layout has no attributes
    pub fn is_empty(&self) -> bool { self.attributes.is_empty() }

    /// Get attribute index by name
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attribute_names.get(name).copied()
    }

    /// Get an attribute by name (convenience: name -> index -> attribute)
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attribute_index(name).and_then(|index| self.attributes.get(index))
    }
}

impl FromIterator<AttributeDescriptor> for BufferLayout {
    fn from_iter<I: IntoIterator<Item = AttributeDescriptor>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<AttributeDescriptor>> for BufferLayout {
    fn from(attributes: Vec<AttributeDescriptor>) -> Self {
        Self::new(attributes)
    }
}

impl<'a> IntoIterator for &'a BufferLayout {
    type Item = &'a AttributeDescriptor;
    type IntoIter = std::slice::Iter<'a, AttributeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[cfg(test)]
#[path = "buffer_layout_tests.rs"]
mod tests;
