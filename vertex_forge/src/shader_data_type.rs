/// Shader attribute data types and their size table

/// Scalar type of a single component, as the driver sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 32-bit float
    Float,
    /// 32-bit signed integer
    Int,
    /// 32-bit unsigned integer
    UInt,
    /// Boolean, uploaded as a 32-bit integer
    Bool,
}

impl ComponentType {
    /// Size in bytes of one component
    pub fn size_bytes(&self) -> u32 {
        match self {
            ComponentType::Float | ComponentType::Int | ComponentType::UInt | ComponentType::Bool => 4,
        }
    }

    /// Whether the driver must use an integer attribute pointer
    pub fn is_integer(&self) -> bool {
        !matches!(self, ComponentType::Float)
    }
}

/// Attribute data type
///
/// Closed enumeration: every variant has a fixed component count and
/// component width. Array variants report the size of ONE element; the
/// attribute multiplies by its element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDataType {
    Float,
    Int,
    UInt,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    /// Three vec4 columns (12 components)
    Mat3,
    Mat4,

    FloatArray,
    IntArray,
    UIntArray,
    BoolArray,
    Vec2Array,
    Vec3Array,
    Vec4Array,
    Mat3Array,
    Mat4Array,
}

impl ShaderDataType {
    /// Every variant, scalar/vector/matrix first, then arrays
    pub const ALL: [ShaderDataType; 18] = [
        ShaderDataType::Float,
        ShaderDataType::Int,
        ShaderDataType::UInt,
        ShaderDataType::Bool,
        ShaderDataType::Vec2,
        ShaderDataType::Vec3,
        ShaderDataType::Vec4,
        ShaderDataType::Mat3,
        ShaderDataType::Mat4,
        ShaderDataType::FloatArray,
        ShaderDataType::IntArray,
        ShaderDataType::UIntArray,
        ShaderDataType::BoolArray,
        ShaderDataType::Vec2Array,
        ShaderDataType::Vec3Array,
        ShaderDataType::Vec4Array,
        ShaderDataType::Mat3Array,
        ShaderDataType::Mat4Array,
    ];

    /// Number of components in one element
    pub fn component_count(&self) -> u32 {
        match self {
            ShaderDataType::Float | ShaderDataType::Int | ShaderDataType::UInt | ShaderDataType::Bool
            | ShaderDataType::FloatArray | ShaderDataType::IntArray
            | ShaderDataType::UIntArray | ShaderDataType::BoolArray => 1,
            ShaderDataType::Vec2 | ShaderDataType::Vec2Array => 2,
            ShaderDataType::Vec3 | ShaderDataType::Vec3Array => 3,
            ShaderDataType::Vec4 | ShaderDataType::Vec4Array => 4,
            ShaderDataType::Mat3 | ShaderDataType::Mat3Array => 12, // padded to 3 × vec4
            ShaderDataType::Mat4 | ShaderDataType::Mat4Array => 16,
        }
    }

    /// Size in bytes of one component
    pub fn component_size(&self) -> u32 {
        self.component_type().size_bytes()
    }

    /// Returns size in bytes of one element
    pub fn size_bytes(&self) -> u32 {
        self.component_count() * self.component_size()
    }

    /// Scalar type of the components
    pub fn component_type(&self) -> ComponentType {
        match self.element_type() {
            ShaderDataType::Int => ComponentType::Int,
            ShaderDataType::UInt => ComponentType::UInt,
            ShaderDataType::Bool => ComponentType::Bool,
            _ => ComponentType::Float,
        }
    }

    /// Whether this is one of the array variants
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            ShaderDataType::FloatArray
                | ShaderDataType::IntArray
                | ShaderDataType::UIntArray
                | ShaderDataType::BoolArray
                | ShaderDataType::Vec2Array
                | ShaderDataType::Vec3Array
                | ShaderDataType::Vec4Array
                | ShaderDataType::Mat3Array
                | ShaderDataType::Mat4Array
        )
    }

    /// Type of one element (identity for non-array variants)
    pub fn element_type(&self) -> ShaderDataType {
        match self {
            ShaderDataType::FloatArray => ShaderDataType::Float,
            ShaderDataType::IntArray => ShaderDataType::Int,
            ShaderDataType::UIntArray => ShaderDataType::UInt,
            ShaderDataType::BoolArray => ShaderDataType::Bool,
            ShaderDataType::Vec2Array => ShaderDataType::Vec2,
            ShaderDataType::Vec3Array => ShaderDataType::Vec3,
            ShaderDataType::Vec4Array => ShaderDataType::Vec4,
            ShaderDataType::Mat3Array => ShaderDataType::Mat3,
            ShaderDataType::Mat4Array => ShaderDataType::Mat4,
            other => *other,
        }
    }

    /// Array variant with this element type (identity for array variants)
    pub fn array_of(&self) -> ShaderDataType {
        match self {
            ShaderDataType::Float => ShaderDataType::FloatArray,
            ShaderDataType::Int => ShaderDataType::IntArray,
            ShaderDataType::UInt => ShaderDataType::UIntArray,
            ShaderDataType::Bool => ShaderDataType::BoolArray,
            ShaderDataType::Vec2 => ShaderDataType::Vec2Array,
            ShaderDataType::Vec3 => ShaderDataType::Vec3Array,
            ShaderDataType::Vec4 => ShaderDataType::Vec4Array,
            ShaderDataType::Mat3 => ShaderDataType::Mat3Array,
            ShaderDataType::Mat4 => ShaderDataType::Mat4Array,
            other => *other,
        }
    }
}

// ===== RUST TYPE MAPPING =====

/// Rust types whose in-memory representation matches a `ShaderDataType`
///
/// # Example
///
/// ```
/// use vertex_forge::forge::{AttributeType, ShaderDataType};
///
/// assert_eq!(<vertex_forge::glam::Vec3 as AttributeType>::DATA_TYPE, ShaderDataType::Vec3);
/// ```
pub trait AttributeType {
    const DATA_TYPE: ShaderDataType;
}

impl AttributeType for f32 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Float;
}

impl AttributeType for i32 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Int;
}

impl AttributeType for u32 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::UInt;
}

impl AttributeType for [f32; 2] {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Vec2;
}

impl AttributeType for [f32; 3] {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Vec3;
}

impl AttributeType for [f32; 4] {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Vec4;
}

impl AttributeType for glam::Vec2 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Vec2;
}

impl AttributeType for glam::Vec3 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Vec3;
}

impl AttributeType for glam::Vec4 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Vec4;
}

// glam::Mat3 is 36 bytes; Mat3A keeps the vec4-padded columns
impl AttributeType for glam::Mat3A {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Mat3;
}

impl AttributeType for glam::Mat4 {
    const DATA_TYPE: ShaderDataType = ShaderDataType::Mat4;
}

#[cfg(test)]
#[path = "shader_data_type_tests.rs"]
mod tests;
