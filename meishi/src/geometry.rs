use thiserror::Error;

use crate::frame::FrameSize;
use crate::guide::AlignmentGuide;

/// On-screen size of the element the frame is rendered into, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Sub-rectangle of the frame that is visible under cover fitting,
/// in source pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderRegion {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Extraction rectangle in source pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRegion {
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid frame dimensions {0}x{1}")]
    InvalidFrame(u32, u32),
    #[error("Invalid viewport dimensions {0}x{1}")]
    InvalidViewport(f64, f64),
    #[error("Guide width ratio {0} outside (0, 1]")]
    InvalidWidthRatio(f64),
    #[error("Guide aspect ratio {0} is not positive")]
    InvalidAspectRatio(f64),
}

/// Computes the part of `frame` that a cover fit into `viewport` leaves
/// visible.
///
/// Cover fitting scales the frame uniformly until it fills the viewport,
/// cropping the overflowing axis. When the frame is proportionally wider
/// than the viewport its full height shows and the sides are clipped;
/// otherwise its full width shows and the top and bottom are clipped. The
/// returned region is expressed in source pixels.
pub fn cover_region(frame: FrameSize, viewport: Viewport) -> Result<RenderRegion, GeometryError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(GeometryError::InvalidFrame(frame.width, frame.height));
    }

    if !(viewport.width.is_finite() && viewport.width > 0.0)
        || !(viewport.height.is_finite() && viewport.height > 0.0)
    {
        return Err(GeometryError::InvalidViewport(
            viewport.width,
            viewport.height,
        ));
    }

    let frame_aspect = frame.aspect_ratio();
    let display_aspect = viewport.aspect_ratio();

    let region = if frame_aspect > display_aspect {
        // frame wider than viewport, full height visible
        let height = frame.height as f64;
        let width = display_aspect * height;

        RenderRegion {
            offset_x: (frame.width as f64 - width) / 2.0,
            offset_y: 0.0,
            width,
            height,
        }
    } else {
        // frame taller than viewport, full width visible
        let width = frame.width as f64;
        let height = width / display_aspect;

        RenderRegion {
            offset_x: 0.0,
            offset_y: (frame.height as f64 - height) / 2.0,
            width,
            height,
        }
    };

    Ok(region)
}

/// Maps the alignment guide to the source-pixel rectangle it covers.
///
/// The guide is sized against the visible render region and centered in
/// it, so the result is independent of the device screen size and of any
/// aspect mismatch between frame and viewport. Pure and deterministic;
/// the rectangle keeps the guide's aspect ratio and, for guides that fit
/// the displayed frame, lies entirely inside it.
pub fn extraction_region(
    frame: FrameSize,
    viewport: Viewport,
    guide: AlignmentGuide,
) -> Result<CropRegion, GeometryError> {
    let visible = cover_region(frame, viewport)?;

    if !(guide.width_ratio > 0.0 && guide.width_ratio <= 1.0) {
        return Err(GeometryError::InvalidWidthRatio(guide.width_ratio));
    }

    if !(guide.aspect_ratio.is_finite() && guide.aspect_ratio > 0.0) {
        return Err(GeometryError::InvalidAspectRatio(guide.aspect_ratio));
    }

    let (crop_width, crop_height) = guide.size_in(&visible);

    Ok(CropRegion {
        x: visible.offset_x + (visible.width - crop_width) / 2.0,
        y: visible.offset_y + (visible.height - crop_height) / 2.0,
        width: crop_width,
        height: crop_height,
    })
}
