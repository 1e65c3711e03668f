//! Lazy image materialization.
//!
//! The engine only records image metadata; pixel data stays in the source
//! document until a caller asks for it. An [`ImageSource`] resolves an
//! xref to a [`PixelBuffer`] on demand, and the buffer knows how to bring
//! itself into plain RGB for downstream encoders.

use crate::error::{Error, Result};
use crate::model::ImageInfo;

/// Resolver for image pixel data, implemented by the extraction backend.
///
/// Implementations return [`Error::ImageNotFound`](crate::Error::ImageNotFound)
/// for an xref the source document does not contain.
pub trait ImageSource {
    /// Load the raw pixel buffer for an image reference.
    fn load_pixels(&self, xref: u64) -> Result<PixelBuffer>;
}

/// Raw pixel data with its declared geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color components per pixel, excluding alpha
    pub components: u8,
    /// Whether each pixel carries a trailing alpha byte
    pub has_alpha: bool,
    /// Interleaved samples, row-major
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Bytes per pixel including alpha.
    pub fn stride(&self) -> usize {
        self.components as usize + usize::from(self.has_alpha)
    }

    fn check_geometry(&self) -> Result<()> {
        let expected = self.width as usize * self.height as usize * self.stride();
        if self.data.len() != expected {
            return Err(Error::InvalidPixels(format!(
                "expected {} bytes for {}x{}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.stride(),
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Convert to a plain 3-component RGB buffer.
    ///
    /// Grayscale replicates the sample, CMYK-like buffers (four or more
    /// color components) convert channel-wise, and alpha is dropped. A
    /// buffer already in RGB without alpha is returned as-is.
    pub fn into_rgb(self) -> Result<PixelBuffer> {
        self.check_geometry()?;
        if self.components == 3 && !self.has_alpha {
            return Ok(self);
        }
        if self.components == 0 {
            return Err(Error::InvalidPixels("zero color components".to_string()));
        }

        let stride = self.stride();
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(stride) {
            match self.components {
                1 => rgb.extend_from_slice(&[px[0], px[0], px[0]]),
                2 => rgb.extend_from_slice(&[px[0], px[0], px[0]]),
                3 => rgb.extend_from_slice(&px[..3]),
                _ => {
                    // CMYK: fold the key channel into each color channel.
                    let k = px[3] as u32;
                    let to_rgb = |v: u8| (((255 - v as u32) * (255 - k)) / 255) as u8;
                    rgb.extend_from_slice(&[to_rgb(px[0]), to_rgb(px[1]), to_rgb(px[2])]);
                }
            }
        }
        Ok(PixelBuffer {
            width: self.width,
            height: self.height,
            components: 3,
            has_alpha: false,
            data: rgb,
        })
    }
}

/// Materialize one deduplicated image as an RGB pixel buffer.
pub fn materialize_rgb(source: &dyn ImageSource, image: &ImageInfo) -> Result<PixelBuffer> {
    source.load_pixels(image.xref)?.into_rgb()
}
