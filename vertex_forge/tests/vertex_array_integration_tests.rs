//! Integration tests for layouts, buffers and vertex arrays
//!
//! End-to-end scenarios on the headless driver. These tests only read the
//! global configuration (defaults), so they run in parallel.
//!
//! Run with: cargo test --test vertex_array_integration_tests

use std::rc::Rc;
use vertex_forge::forge::{
    ArrayState, AttributeDescriptor, BufferId, BufferLayout, DrawHint, Error, IndexBuffer,
    InstancedVertexBuffer, ShaderDataType, VertexArray, VertexBuffer, VertexInputRate,
};
use vertex_forge::forge::driver::{DriverRef, HeadlessDriver};
use vertex_forge::glam::{Mat4, Vec3};

fn setup() -> (Rc<HeadlessDriver>, DriverRef) {
    let headless = Rc::new(HeadlessDriver::new());
    let driver: DriverRef = headless.clone();
    (headless, driver)
}

fn layout_of(types: &[ShaderDataType]) -> BufferLayout {
    types
        .iter()
        .enumerate()
        .map(|(i, ty)| AttributeDescriptor::new(*ty, format!("a{}", i)))
        .collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_integration_position_uv_layout() {
    let layout = BufferLayout::new([
        AttributeDescriptor::new(ShaderDataType::Vec3, "position"),
        AttributeDescriptor::new(ShaderDataType::Vec2, "uv"),
    ]);

    assert_eq!(layout.attribute("position").and_then(|a| a.offset()), Some(0));
    assert_eq!(layout.attribute("uv").and_then(|a| a.offset()), Some(12));
    assert_eq!(layout.stride(), 20);
}

#[test]
fn test_integration_mesh_then_instances() {
    let (headless, driver) = setup();
    let mut array = VertexArray::new(&driver).unwrap();

    let mesh = VertexBuffer::with_layout(
        &driver,
        &[0.0; 20],
        BufferLayout::new([
            AttributeDescriptor::new(ShaderDataType::Vec3, "position"),
            AttributeDescriptor::new(ShaderDataType::Vec2, "uv"),
        ]),
    )
    .unwrap();
    array.add_vertex_buffer(mesh).unwrap();

    assert_eq!(array.binding_by_name("position").map(|b| b.slot), Some(0));
    assert_eq!(array.binding_by_name("uv").map(|b| b.slot), Some(1));

    let tints = InstancedVertexBuffer::with_layout(
        &driver,
        &[1.0; 4],
        BufferLayout::new([AttributeDescriptor::new(ShaderDataType::Vec4, "tint")]),
    )
    .unwrap();
    array.add_instanced_buffer(tints).unwrap();

    let tint = array.binding_by_name("tint").unwrap();
    assert_eq!(tint.slot, 2);
    assert_eq!(tint.input_rate, VertexInputRate::Instance);
    assert_eq!(headless.vertex_array_attributes(array.handle().unwrap())[2].pointer.divisor, 1);
}

#[test]
fn test_integration_missing_layout_leaves_slots_unchanged() {
    let (_headless, driver) = setup();
    let mut array = VertexArray::new(&driver).unwrap();
    array
        .add_vertex_buffer(VertexBuffer::with_layout(&driver, &[0.0; 3], layout_of(&[ShaderDataType::Vec3])).unwrap())
        .unwrap();

    let bare = VertexBuffer::with_hint(&driver, &[0.0; 3], DrawHint::Static).unwrap();
    let result = array.add_vertex_buffer(bare);

    assert!(matches!(result, Err(Error::ConfigurationError(ref msg)) if msg == "missing layout"));
    assert_eq!(array.slot_count(), 1);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_integration_offsets_adjacent_for_many_sequences() {
    // Deterministic walk over type sequences of increasing length
    let all = ShaderDataType::ALL;
    for len in 0..=all.len() {
        for start in 0..all.len() {
            let types: Vec<ShaderDataType> = (0..len).map(|i| all[(start + i * 7) % all.len()]).collect();
            let layout = layout_of(&types);

            let attributes = layout.attributes();
            for pair in attributes.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                assert!(a.offset() < b.offset());
                assert_eq!(a.offset().map(|o| o + a.size_bytes()), b.offset());
            }
            match attributes.last() {
                Some(last) => assert_eq!(last.offset().map(|o| o + last.size_bytes()), Some(layout.stride())),
                None => assert_eq!(layout.stride(), 0),
            }
        }
    }
}

#[test]
fn test_integration_slot_union_is_contiguous() {
    let (headless, driver) = setup();
    let mut array = VertexArray::new(&driver).unwrap();
    let mut expected_total = 0u32;
    let mut snapshots = Vec::new();

    for round in 0..6usize {
        let count = round % 3 + 1;
        let types: Vec<ShaderDataType> = (0..count).map(|i| ShaderDataType::ALL[(round + i) % 9]).collect();
        let layout = layout_of(&types);
        let data = vec![0.0f32; layout.stride_elements() as usize];

        if round % 2 == 0 {
            array.add_buffer(VertexBuffer::with_layout(&driver, &data, layout).unwrap()).unwrap();
        } else {
            array.add_buffer(InstancedVertexBuffer::with_layout(&driver, &data, layout).unwrap()).unwrap();
        }
        expected_total += count as u32;

        // Earlier slots never move
        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(array.bindings().get(i), Some(snapshot));
        }
        snapshots = array.bindings().to_vec();
    }

    let slots: Vec<u32> = array.bindings().iter().map(|b| b.slot).collect();
    let expected: Vec<u32> = (0..expected_total).collect();
    assert_eq!(slots, expected);
    assert_eq!(array.slot_count(), expected_total);

    for binding in array.bindings() {
        let instanced = array.buffer(binding.buffer).map(|b| b.as_instanced().is_some());
        assert_eq!(instanced, Some(binding.input_rate == VertexInputRate::Instance));
        assert_eq!(binding.input_rate == VertexInputRate::Instance, binding.buffer.0 % 2 == 1);
    }
    assert_eq!(headless.vertex_array_attributes(array.handle().unwrap()).len(), expected_total as usize);
}

// ============================================================================
// FULL PIPELINE
// ============================================================================

#[test]
fn test_integration_indexed_instanced_quad() {
    let (headless, driver) = setup();
    let mut array = VertexArray::new(&driver).unwrap();

    let corners: Vec<f32> = [
        Vec3::new(-0.5, -0.5, 0.0),
        Vec3::new(0.5, -0.5, 0.0),
        Vec3::new(0.5, 0.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
    ]
    .iter()
    .flat_map(|v| v.to_array())
    .collect();
    let mesh = VertexBuffer::with_layout(
        &driver,
        &corners,
        BufferLayout::new([AttributeDescriptor::of::<Vec3>("position")]),
    )
    .unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    let mesh_id = array.add_vertex_buffer(mesh).unwrap();

    let mut models = InstancedVertexBuffer::with_layout_and_hint(
        &driver,
        &[],
        BufferLayout::new([AttributeDescriptor::of::<Mat4>("model")]),
        DrawHint::Dynamic,
    )
    .unwrap();
    for x in 0..3 {
        let model = Mat4::from_translation(Vec3::new(x as f32, 0.0, 0.0));
        models.add_instance(&model.to_cols_array()).unwrap();
    }
    let models_id = array.add_instanced_buffer(models).unwrap();

    array.set_index_buffer(IndexBuffer::new(&driver, &[0, 1, 2, 2, 3, 0]).unwrap()).unwrap();

    assert_eq!(mesh_id, BufferId(0));
    assert_eq!(array.state(), ArrayState::Populated);
    assert_eq!(array.slot_count(), 2);
    let model = array.binding(1).unwrap();
    assert_eq!(model.data_type, ShaderDataType::Mat4);
    assert_eq!(model.stride, 64);

    let instances = array.buffer(models_id).and_then(|b| b.as_instanced()).unwrap();
    assert_eq!(instances.instance_count(), 3);
    // Translation column of the last instance
    let handle = instances.handle().unwrap();
    assert_eq!(headless.read_floats(handle, 2 * 64 + 48, 4), Some(vec![2.0, 0.0, 0.0, 1.0]));

    let array_handle = array.handle().unwrap();
    assert_eq!(headless.vertex_array_element_buffer(array_handle), array.index_buffer().and_then(|i| i.handle()));

    array.bind().unwrap();
    assert_eq!(headless.bound_vertex_array(), Some(array_handle));

    drop(array);
    assert_eq!(headless.live_buffer_count(), 0);
    assert_eq!(headless.live_vertex_array_count(), 0);
    assert_eq!(headless.stats().invalid_releases, 0);
}

#[test]
fn test_integration_taken_array_drops_safely() {
    let (headless, driver) = setup();
    let mut array = VertexArray::new(&driver).unwrap();
    array
        .add_vertex_buffer(VertexBuffer::with_layout(&driver, &[0.0; 2], layout_of(&[ShaderDataType::Vec2])).unwrap())
        .unwrap();

    let owner = array.take();
    drop(array);
    assert_eq!(headless.live_vertex_array_count(), 1);
    assert_eq!(owner.slot_count(), 1);
    drop(owner);

    let stats = headless.stats();
    assert_eq!(stats.vertex_arrays_created, stats.vertex_arrays_destroyed);
    assert_eq!(stats.buffers_created, stats.buffers_destroyed);
    assert_eq!(stats.invalid_releases, 0);
}
