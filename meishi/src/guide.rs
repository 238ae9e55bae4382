use crate::geometry::RenderRegion;

/// On-screen alignment rectangle the user fits the card into.
///
/// `width_ratio` is the guide's width as a fraction of the displayed frame
/// width, `aspect_ratio` its width over height. Defaults match a business
/// card silhouette filling most of a phone screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AlignmentGuide {
    pub width_ratio: f64,
    pub aspect_ratio: f64,
}

impl AlignmentGuide {
    pub fn new(width_ratio: f64, aspect_ratio: f64) -> Self {
        Self {
            width_ratio,
            aspect_ratio,
        }
    }

    /// Guide size projected into a visible render region, in source pixels.
    pub fn size_in(&self, region: &RenderRegion) -> (f64, f64) {
        let width = region.width * self.width_ratio;

        (width, width / self.aspect_ratio)
    }
}

impl Default for AlignmentGuide {
    fn default() -> Self {
        Self {
            width_ratio: 0.9,
            aspect_ratio: 1.6,
        }
    }
}
