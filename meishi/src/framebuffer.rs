use cgmath::Vector3;
use thiserror::Error;

use crate::frame::PixelRegion;
use crate::geometry::CropRegion;

#[derive(Debug, Error)]
pub enum FrameBufferError {
    #[error("Invalid source data length")]
    InvalidSrcLength,
    #[error("Region outside frame bounds")]
    RegionOutOfBounds,
    #[error("Region rounds to zero pixels")]
    EmptyRegion,
}

/// RGBA frame storage with real-valued region extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    buffer: Vec<Pixel>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let buffer = vec![Pixel::black(); width as usize * height as usize];

        Self {
            width,
            height,
            buffer,
        }
    }

    /// Wraps tightly packed RGBA bytes, as decoders produce them.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FrameBufferError> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(FrameBufferError::InvalidSrcLength);
        }

        let buffer = bytes
            .chunks_exact(4)
            .map(|c| Pixel::new(c[0], c[1], c[2], c[3]))
            .collect();

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.buffer[y as usize * self.width as usize + x as usize])
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(&mut self.buffer[y as usize * self.width as usize + x as usize])
    }

    pub fn buffer(&self) -> &[Pixel] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [Pixel] {
        &mut self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        // Pixel is repr(C), four consecutive u8s
        unsafe {
            std::slice::from_raw_parts(self.buffer.as_ptr() as *const u8, self.buffer.len() * 4)
        }
    }

    /// Drops the alpha channel, for encoders that take opaque input.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.buffer.len() * 3);

        for pixel in &self.buffer {
            bytes.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
        }

        bytes
    }

    /// Copies the pixels under `region` into a new buffer.
    ///
    /// Region edges are rounded to the nearest pixel boundary, so a region
    /// spanning the whole frame reproduces it exactly. Regions reaching
    /// outside the frame are rejected rather than clamped.
    pub fn extract(&self, region: &CropRegion) -> Result<FrameBuffer, FrameBufferError> {
        let window = self.clip_region(region)?;

        let mut out = FrameBuffer::new(window.width(), window.height());
        let src_width = self.width as usize;
        let dst_width = window.width() as usize;

        for (row, dst) in out.buffer.chunks_exact_mut(dst_width).enumerate() {
            let y = window.y_min as usize + row;
            let start = y * src_width + window.x_min as usize;

            dst.copy_from_slice(&self.buffer[start..start + dst_width]);
        }

        Ok(out)
    }

    /// Draws a border of `thickness` pixels just inside `region`.
    pub fn stroke_region(
        &mut self,
        region: &CropRegion,
        thickness: u32,
        color: Pixel,
    ) -> Result<(), FrameBufferError> {
        let window = self.clip_region(region)?;
        let band = thickness.max(1) as usize;

        let x_min = window.x_min as usize;
        let x_max = window.x_max as usize;
        let y_min = window.y_min as usize;
        let y_max = window.y_max as usize;
        let width = self.width as usize;

        let top_end = (y_min + band).min(y_max);
        let bottom_start = y_max.saturating_sub(band).max(y_min);

        for y in y_min..y_max {
            let row = &mut self.buffer[y * width + x_min..y * width + x_max];

            if y < top_end || y >= bottom_start {
                row.fill(color);
            } else {
                let edge = band.min(row.len());
                let len = row.len();

                row[..edge].fill(color);
                row[len - edge..].fill(color);
            }
        }

        Ok(())
    }

    fn clip_region(&self, region: &CropRegion) -> Result<PixelRegion, FrameBufferError> {
        let x_min = region.x.round();
        let y_min = region.y.round();
        let x_max = (region.x + region.width).round();
        let y_max = (region.y + region.height).round();

        // negated comparisons also catch NaN coordinates
        if !(x_min >= 0.0)
            || !(y_min >= 0.0)
            || !(x_max <= self.width as f64)
            || !(y_max <= self.height as f64)
        {
            return Err(FrameBufferError::RegionOutOfBounds);
        }

        let window = PixelRegion {
            x_min: x_min as u32,
            y_min: y_min as u32,
            x_max: x_max as u32,
            y_max: y_max as u32,
        };

        if window.is_empty() {
            return Err(FrameBufferError::EmptyRegion);
        }

        Ok(window)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Vector3<f64>> for Pixel {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(
            (v.x.clamp(0.0, 1.0) * 255.0) as u8,
            (v.y.clamp(0.0, 1.0) * 255.0) as u8,
            (v.z.clamp(0.0, 1.0) * 255.0) as u8,
            255,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, height);

        for (i, pixel) in fb.buffer_mut().iter_mut().enumerate() {
            *pixel = Pixel::new(i as u8, 0, 0, 255);
        }

        fb
    }

    #[test]
    fn byte_views_keep_layout() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.buffer_mut()[0] = Pixel::new(1, 2, 3, 4);
        fb.buffer_mut()[1] = Pixel::new(5, 6, 7, 8);

        assert_eq!(fb.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(fb.to_rgb_bytes(), &[1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn rgba_roundtrip() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

        let fb = FrameBuffer::from_rgba_bytes(3, 1, &bytes).unwrap();

        assert_eq!(fb.as_bytes(), &bytes);

        let err = FrameBuffer::from_rgba_bytes(3, 2, &bytes).unwrap_err();
        assert!(matches!(err, FrameBufferError::InvalidSrcLength));
    }

    #[test]
    fn extract_inner_window() {
        let fb = numbered(4, 4);

        let region = CropRegion {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 2.0,
        };
        let out = fb.extract(&region).unwrap();

        assert_eq!(out.size(), (2, 2));
        assert_eq!(out.pixel(0, 0), fb.pixel(1, 1));
        assert_eq!(out.pixel(1, 0), fb.pixel(2, 1));
        assert_eq!(out.pixel(0, 1), fb.pixel(1, 2));
        assert_eq!(out.pixel(1, 1), fb.pixel(2, 2));
    }

    #[test]
    fn extract_rounds_edges() {
        let fb = numbered(4, 4);

        let region = CropRegion {
            x: 0.6,
            y: 0.4,
            width: 2.0,
            height: 2.0,
        };
        let out = fb.extract(&region).unwrap();

        assert_eq!(out.size(), (2, 2));
        assert_eq!(out.pixel(0, 0), fb.pixel(1, 0));
        assert_eq!(out.pixel(1, 1), fb.pixel(2, 1));
    }

    #[test]
    fn full_width_guide_is_lossless() {
        use crate::frame::FrameSize;
        use crate::geometry::{extraction_region, Viewport};
        use crate::guide::AlignmentGuide;

        let fb = numbered(16, 9);

        let region = extraction_region(
            FrameSize::new(16, 9),
            Viewport::new(1600.0, 900.0),
            AlignmentGuide::new(1.0, 16.0 / 9.0),
        )
        .unwrap();
        let out = fb.extract(&region).unwrap();

        assert_eq!(out, fb);
    }

    #[test]
    fn rejects_region_outside_frame() {
        let fb = numbered(4, 4);

        for region in [
            CropRegion {
                x: -2.0,
                y: 0.0,
                width: 2.0,
                height: 2.0,
            },
            CropRegion {
                x: 3.0,
                y: 3.0,
                width: 2.0,
                height: 2.0,
            },
            CropRegion {
                x: f64::NAN,
                y: 0.0,
                width: 2.0,
                height: 2.0,
            },
        ] {
            let err = fb.extract(&region).unwrap_err();

            assert!(matches!(err, FrameBufferError::RegionOutOfBounds));
        }
    }

    #[test]
    fn rejects_subpixel_region() {
        let fb = numbered(4, 4);

        let region = CropRegion {
            x: 1.2,
            y: 1.2,
            width: 0.1,
            height: 0.1,
        };
        let err = fb.extract(&region).unwrap_err();

        assert!(matches!(err, FrameBufferError::EmptyRegion));
    }

    #[test]
    fn stroke_paints_border_only() {
        let mut fb = FrameBuffer::new(8, 8);

        let region = CropRegion {
            x: 1.0,
            y: 1.0,
            width: 6.0,
            height: 6.0,
        };
        fb.stroke_region(&region, 2, Pixel::white()).unwrap();

        // outside the region
        assert_eq!(fb.pixel(0, 0), Some(Pixel::black()));
        assert_eq!(fb.pixel(7, 4), Some(Pixel::black()));

        // border bands
        assert_eq!(fb.pixel(1, 1), Some(Pixel::white()));
        assert_eq!(fb.pixel(4, 2), Some(Pixel::white()));
        assert_eq!(fb.pixel(2, 4), Some(Pixel::white()));
        assert_eq!(fb.pixel(6, 6), Some(Pixel::white()));

        // interior stays untouched
        assert_eq!(fb.pixel(3, 3), Some(Pixel::black()));
        assert_eq!(fb.pixel(4, 4), Some(Pixel::black()));
    }

    #[test]
    fn thick_stroke_fills_region() {
        let mut fb = FrameBuffer::new(6, 6);

        let region = CropRegion {
            x: 1.0,
            y: 1.0,
            width: 4.0,
            height: 4.0,
        };
        fb.stroke_region(&region, 10, Pixel::white()).unwrap();

        for y in 1..5 {
            for x in 1..5 {
                assert_eq!(fb.pixel(x, y), Some(Pixel::white()));
            }
        }
        assert_eq!(fb.pixel(0, 0), Some(Pixel::black()));
        assert_eq!(fb.pixel(5, 5), Some(Pixel::black()));
    }

    #[test]
    fn pixel_from_vector_clamps() {
        let pixel = Pixel::from(Vector3::new(2.0, 0.5, -1.0));

        assert_eq!(pixel, Pixel::new(255, 127, 0, 255));
    }
}
