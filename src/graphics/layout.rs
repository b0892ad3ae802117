//! Describing how a packed `f32` buffer maps onto shader input slots.
//!
//! This is an object that abstracts over the arguments of
//! [gl::VertexAttribPointer](glvertexattribpointer), which tells OpenGL how to read vertex data.
//! The driver will happily accept a layout whose attributes overlap or run past the end of a
//! vertex and then draw garbage, so layouts can only be built through [`LayoutBuilder`], which
//! checks every attribute against the stride and against each other.
//!
//! [glvertexattribpointer]: http://docs.gl/gl3/glVertexAttribPointer

use std::collections::BTreeMap;
use std::mem::size_of;

use super::driver::GlDriver;
use super::error::LayoutError;

/// Attribute slots every conforming driver provides (`GL_MAX_VERTEX_ATTRIBS` is at least 16).
pub const MAX_VERTEX_ATTRIBS: u32 = 16;

const FLOAT: usize = size_of::<f32>();

/// One attribute: `components` floats starting `offset` bytes into each vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub slot: u32,
    pub components: u32,
    pub offset: usize,
}

impl VertexAttribute {
    /// Byte range this attribute occupies within one vertex. Saturates rather than wrapping.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset.saturating_add(self.components as usize * FLOAT)
    }
}

/// A validated set of attributes over vertices of `stride` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    stride: usize,
    attributes: BTreeMap<u32, VertexAttribute>,
}

impl VertexLayout {
    pub fn builder(stride: usize) -> LayoutBuilder {
        LayoutBuilder {
            stride,
            attributes: Vec::new(),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.stride / FLOAT
    }

    /// Attributes in slot order.
    pub fn attributes(&self) -> impl Iterator<Item = &VertexAttribute> {
        self.attributes.values()
    }

    pub fn attribute(&self, slot: u32) -> Option<&VertexAttribute> {
        self.attributes.get(&slot)
    }

    /// Registers every attribute pointer and enables its slot. The buffer the layout describes must
    /// already be bound to `GL_ARRAY_BUFFER`, and the vertex array that should remember the
    /// pointers must be bound too.
    pub fn bind<D: GlDriver + ?Sized>(&self, driver: &D) {
        for attribute in self.attributes() {
            driver.vertex_attrib_pointer(attribute.slot, attribute.components, self.stride, attribute.offset);
            driver.enable_vertex_attrib(attribute.slot);
        }
    }
}

pub struct LayoutBuilder {
    stride: usize,
    attributes: Vec<VertexAttribute>,
}

impl LayoutBuilder {
    /// Declares `components` floats at byte `offset` for shader input `slot`.
    pub fn attribute(mut self, slot: u32, components: u32, offset: usize) -> Self {
        self.attributes.push(VertexAttribute {
            slot,
            components,
            offset,
        });
        self
    }

    pub fn build(self) -> Result<VertexLayout, LayoutError> {
        let stride = self.stride;
        if stride == 0 || stride % FLOAT != 0 {
            return Err(LayoutError::BadStride(stride));
        }

        if self.attributes.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut attributes = BTreeMap::new();
        for attribute in self.attributes {
            let VertexAttribute { slot, components, offset } = attribute;

            if !(1..=4).contains(&components) {
                return Err(LayoutError::BadComponentCount { slot, components });
            }
            if slot >= MAX_VERTEX_ATTRIBS {
                return Err(LayoutError::SlotOutOfRange(slot));
            }
            if offset % FLOAT != 0 {
                return Err(LayoutError::Misaligned { slot, offset });
            }

            let size = components as usize * FLOAT;
            match offset.checked_add(size) {
                Some(end) if end <= stride => {}
                end => {
                    return Err(LayoutError::OutOfBounds {
                        slot,
                        start: offset,
                        end: end.unwrap_or(usize::MAX),
                        stride,
                    })
                }
            }

            if attributes.insert(slot, attribute).is_some() {
                return Err(LayoutError::DuplicateSlot(slot));
            }
        }

        // Once sorted by offset, any overlap shows up between neighbours
        let mut by_offset: Vec<&VertexAttribute> = attributes.values().collect();
        by_offset.sort_by_key(|a| a.offset);
        for pair in by_offset.windows(2) {
            if pair[0].byte_range().end > pair[1].offset {
                return Err(LayoutError::Overlap {
                    first: pair[0].slot,
                    second: pair[1].slot,
                });
            }
        }

        Ok(VertexLayout { stride, attributes })
    }
}

/// Raw vertex data that has been checked against a layout: its length is a whole number of
/// vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableBuffer {
    data: Vec<f32>,
    layout: VertexLayout,
}

impl DrawableBuffer {
    pub fn new(data: Vec<f32>, layout: &VertexLayout) -> Result<Self, LayoutError> {
        let per_vertex = layout.floats_per_vertex();
        if data.len() % per_vertex != 0 {
            return Err(LayoutError::BufferLength {
                len: data.len(),
                per_vertex,
            });
        }

        Ok(Self {
            data,
            layout: layout.clone(),
        })
    }

    /// Builds a buffer from a slice of `#[repr(C)]` vertex structs.
    ///
    /// Every field of `V` has to be made of `f32`s. The bytes are reinterpreted as floats without
    /// conversion, so an integer field would reach the shader as garbage. Only the size and
    /// alignment of `V` can be checked here.
    pub fn from_vertices<V: bytemuck::Pod>(vertices: &[V], layout: &VertexLayout) -> Result<Self, LayoutError> {
        let floats = bytemuck::try_cast_slice::<V, f32>(vertices).map_err(|_| LayoutError::NotFloats)?;
        Self::new(floats.to_vec(), layout)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_count(&self) -> u32 {
        (self.data.len() / self.layout.floats_per_vertex()) as u32
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graphics::recording::{Call, RecordingDriver};

    #[test]
    fn adjacent_attributes_are_accepted() {
        let layout = VertexLayout::builder(20)
            .attribute(0, 2, 0)
            .attribute(1, 3, 8)
            .build()
            .unwrap();

        assert_eq!(layout.attribute(0).unwrap().byte_range(), 0..8);
        assert_eq!(layout.attribute(1).unwrap().byte_range(), 8..20);
        assert_eq!(layout.floats_per_vertex(), 5);
    }

    #[test]
    fn overlapping_attributes_are_rejected() {
        let err = VertexLayout::builder(20)
            .attribute(0, 2, 0)
            .attribute(1, 3, 4)
            .build()
            .unwrap_err();

        assert_eq!(err, LayoutError::Overlap { first: 0, second: 1 });
    }

    #[test]
    fn overlap_is_found_regardless_of_declaration_order() {
        let err = VertexLayout::builder(24)
            .attribute(0, 2, 16)
            .attribute(3, 4, 0)
            .attribute(1, 1, 12)
            .build()
            .unwrap_err();

        assert_eq!(err, LayoutError::Overlap { first: 3, second: 1 });
    }

    #[test]
    fn attribute_past_the_stride_is_rejected() {
        let err = VertexLayout::builder(16).attribute(0, 3, 8).build().unwrap_err();

        assert_eq!(
            err,
            LayoutError::OutOfBounds {
                slot: 0,
                start: 8,
                end: 20,
                stride: 16
            }
        );
    }

    #[test]
    fn offset_near_the_end_of_the_address_space_is_out_of_bounds() {
        let err = VertexLayout::builder(16)
            .attribute(0, 1, usize::MAX - 3)
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            LayoutError::OutOfBounds {
                slot: 0,
                start: usize::MAX - 3,
                end: usize::MAX,
                stride: 16
            }
        );

        let err = VertexLayout::builder(16)
            .attribute(0, 2, usize::MAX - 3)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::OutOfBounds { end: usize::MAX, .. }));
    }

    #[test]
    fn malformed_attributes_are_rejected() {
        assert_eq!(
            VertexLayout::builder(0).attribute(0, 1, 0).build(),
            Err(LayoutError::BadStride(0))
        );
        assert_eq!(
            VertexLayout::builder(10).attribute(0, 1, 0).build(),
            Err(LayoutError::BadStride(10))
        );
        assert_eq!(VertexLayout::builder(16).build(), Err(LayoutError::Empty));
        assert_eq!(
            VertexLayout::builder(32).attribute(0, 5, 0).build(),
            Err(LayoutError::BadComponentCount { slot: 0, components: 5 })
        );
        assert_eq!(
            VertexLayout::builder(32).attribute(0, 0, 0).build(),
            Err(LayoutError::BadComponentCount { slot: 0, components: 0 })
        );
        assert_eq!(
            VertexLayout::builder(32).attribute(16, 1, 0).build(),
            Err(LayoutError::SlotOutOfRange(16))
        );
        assert_eq!(
            VertexLayout::builder(32).attribute(0, 1, 2).build(),
            Err(LayoutError::Misaligned { slot: 0, offset: 2 })
        );
        assert_eq!(
            VertexLayout::builder(32).attribute(2, 1, 0).attribute(2, 1, 4).build(),
            Err(LayoutError::DuplicateSlot(2))
        );
    }

    #[test]
    fn buffer_length_must_be_whole_vertices() {
        let layout = VertexLayout::builder(8).attribute(0, 2, 0).build().unwrap();

        let buffer = DrawableBuffer::new(vec![0.0; 6], &layout).unwrap();
        assert_eq!(buffer.vertex_count(), 3);

        assert_eq!(
            DrawableBuffer::new(vec![0.0; 5], &layout),
            Err(LayoutError::BufferLength { len: 5, per_vertex: 2 })
        );
    }

    #[test]
    fn buffer_from_vertex_structs() {
        #[repr(C)]
        #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
        struct Vertex {
            position: [f32; 2],
            color: [f32; 3],
        }

        let layout = VertexLayout::builder(size_of::<Vertex>())
            .attribute(0, 2, 0)
            .attribute(1, 3, 8)
            .build()
            .unwrap();
        let vertices = [Vertex { position: [0.0, 1.0], color: [1.0, 0.0, 0.0] }; 3];

        let buffer = DrawableBuffer::from_vertices(&vertices[..], &layout).unwrap();
        assert_eq!(buffer.vertex_count(), 3);
        assert_eq!(&buffer.data()[..5], &[0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn vertex_structs_that_are_not_whole_floats_are_rejected() {
        let layout = VertexLayout::builder(4).attribute(0, 1, 0).build().unwrap();
        let bytes: [[u8; 3]; 1] = [[1, 2, 3]];

        assert_eq!(
            DrawableBuffer::from_vertices(&bytes[..], &layout),
            Err(LayoutError::NotFloats)
        );
    }

    #[test]
    fn bind_registers_every_slot_in_order() {
        let driver = RecordingDriver::new();
        let layout = VertexLayout::builder(20)
            .attribute(1, 3, 8)
            .attribute(0, 2, 0)
            .build()
            .unwrap();

        layout.bind(&driver);

        assert_eq!(
            driver.calls(),
            vec![
                Call::VertexAttribPointer { slot: 0, components: 2, stride: 20, offset: 0 },
                Call::EnableVertexAttrib(0),
                Call::VertexAttribPointer { slot: 1, components: 3, stride: 20, offset: 8 },
                Call::EnableVertexAttrib(1),
            ]
        );
    }
}
