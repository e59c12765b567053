//! Unit tests for shader_data_type.rs

use crate::shader_data_type::{AttributeType, ComponentType, ShaderDataType};

// ============================================================================
// SIZE TABLE
// ============================================================================

#[test]
fn test_scalar_sizes() {
    for ty in [ShaderDataType::Float, ShaderDataType::Int, ShaderDataType::UInt, ShaderDataType::Bool] {
        assert_eq!(ty.component_count(), 1, "{:?}", ty);
        assert_eq!(ty.component_size(), 4, "{:?}", ty);
        assert_eq!(ty.size_bytes(), 4, "{:?}", ty);
    }
}

#[test]
fn test_vector_sizes() {
    assert_eq!(ShaderDataType::Vec2.size_bytes(), 8);
    assert_eq!(ShaderDataType::Vec3.size_bytes(), 12);
    assert_eq!(ShaderDataType::Vec4.size_bytes(), 16);
}

#[test]
fn test_matrix_sizes() {
    assert_eq!(ShaderDataType::Mat3.component_count(), 12);
    assert_eq!(ShaderDataType::Mat3.size_bytes(), 48);
    assert_eq!(ShaderDataType::Mat4.component_count(), 16);
    assert_eq!(ShaderDataType::Mat4.size_bytes(), 64);
}

#[test]
fn test_array_variants_report_element_size() {
    for ty in ShaderDataType::ALL {
        assert_eq!(ty.size_bytes(), ty.element_type().size_bytes(), "{:?}", ty);
        assert_eq!(ty.component_count(), ty.element_type().component_count(), "{:?}", ty);
    }
}

#[test]
fn test_size_is_count_times_width() {
    for ty in ShaderDataType::ALL {
        assert_eq!(ty.size_bytes(), ty.component_count() * ty.component_size(), "{:?}", ty);
    }
}

// ============================================================================
// VARIANT RELATIONS
// ============================================================================

#[test]
fn test_all_lists_every_variant_once() {
    let all = ShaderDataType::ALL;
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(all.iter().filter(|ty| ty.is_array()).count(), 9);
}

#[test]
fn test_array_of_and_element_type_are_inverse() {
    for ty in ShaderDataType::ALL.iter().filter(|ty| !ty.is_array()) {
        let array = ty.array_of();
        assert!(array.is_array());
        assert_eq!(array.element_type(), *ty);
        // Identity on array variants
        assert_eq!(array.array_of(), array);
    }
}

#[test]
fn test_component_types() {
    assert_eq!(ShaderDataType::Vec3.component_type(), ComponentType::Float);
    assert_eq!(ShaderDataType::Mat4Array.component_type(), ComponentType::Float);
    assert_eq!(ShaderDataType::IntArray.component_type(), ComponentType::Int);
    assert_eq!(ShaderDataType::UInt.component_type(), ComponentType::UInt);
    assert_eq!(ShaderDataType::Bool.component_type(), ComponentType::Bool);

    assert!(!ComponentType::Float.is_integer());
    assert!(ComponentType::Int.is_integer());
    assert!(ComponentType::UInt.is_integer());
    assert!(ComponentType::Bool.is_integer());
}

// ============================================================================
// RUST TYPE MAPPING
// ============================================================================

fn data_type_of<T: AttributeType>() -> ShaderDataType {
    T::DATA_TYPE
}

#[test]
fn test_attribute_type_mapping() {
    assert_eq!(data_type_of::<f32>(), ShaderDataType::Float);
    assert_eq!(data_type_of::<i32>(), ShaderDataType::Int);
    assert_eq!(data_type_of::<u32>(), ShaderDataType::UInt);
    assert_eq!(data_type_of::<[f32; 2]>(), ShaderDataType::Vec2);
    assert_eq!(data_type_of::<[f32; 3]>(), ShaderDataType::Vec3);
    assert_eq!(data_type_of::<[f32; 4]>(), ShaderDataType::Vec4);
    assert_eq!(data_type_of::<glam::Vec3>(), ShaderDataType::Vec3);
    assert_eq!(data_type_of::<glam::Mat4>(), ShaderDataType::Mat4);
}

#[test]
fn test_attribute_type_sizes_match_rust_layout() {
    assert_eq!(std::mem::size_of::<glam::Vec2>() as u32, data_type_of::<glam::Vec2>().size_bytes());
    assert_eq!(std::mem::size_of::<glam::Vec3>() as u32, data_type_of::<glam::Vec3>().size_bytes());
    assert_eq!(std::mem::size_of::<glam::Vec4>() as u32, data_type_of::<glam::Vec4>().size_bytes());
    assert_eq!(std::mem::size_of::<glam::Mat3A>() as u32, data_type_of::<glam::Mat3A>().size_bytes());
    assert_eq!(std::mem::size_of::<glam::Mat4>() as u32, data_type_of::<glam::Mat4>().size_bytes());
}
