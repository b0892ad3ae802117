//! Images the fragment shader can sample. A [`Texture`] is bound to unit 0 for the draw call it
//! belongs to and unbound right after.
//!
//! Decoding image files is somebody else's job; this module starts from raw RGBA bytes.

use log::debug;

use super::driver::GlDriver;
use super::error::{GraphicsError, TextureError};
use super::gl_types::TextureId;

/// Decoded RGBA8 pixels, row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSized { width, height });
        }

        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(TextureError::PixelCount {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        Ok(Self { width, height, rgba })
    }

    /// A `size`x`size` checkerboard with `cells` squares along each edge, alternating between the
    /// two colors.
    pub fn checkerboard(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Result<Self, TextureError> {
        let cell = (size / cells.max(1)).max(1);
        let mut rgba = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                rgba.extend_from_slice(if even { &a } else { &b });
            }
        }

        Self::new(size, size, rgba)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
}

/// A texture object living on the driver.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn upload<D: GlDriver + ?Sized>(driver: &D, image: &ImageData) -> Result<Self, GraphicsError> {
        let id = driver
            .create_texture()
            .ok_or_else(|| GraphicsError::no_object("texture"))?;

        driver.bind_texture(Some(id));
        driver.texture_image_rgba(image.width, image.height, &image.rgba);
        driver.bind_texture(None);

        debug!("uploaded {}x{} texture {:?}", image.width, image.height, id);

        Ok(Texture {
            id,
            width: image.width,
            height: image.height,
        })
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn delete<D: GlDriver + ?Sized>(self, driver: &D) {
        driver.delete_texture(self.id);
    }
}
