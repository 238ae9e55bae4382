use cgmath::{InnerSpace, Vector2, Vector3};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;

use crate::framebuffer::{FrameBuffer, Pixel};

/// Seeded cell noise, identical on every run for a given seed.
pub struct CellNoise2D {
    scale: f64,
    randoms: Vec<Vector2<f64>>,
}

impl CellNoise2D {
    pub fn new(scale: f64, seed: u64) -> Self {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

        let randoms = (0..256)
            .map(|_| Vector2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
            .collect();

        Self { scale, randoms }
    }

    /// Distance to the nearest jittered cell point.
    pub fn sample(&self, position: Vector2<f64>) -> f64 {
        let scaled = position * self.scale;
        let base_x = scaled.x.floor() as i32;
        let base_y = scaled.y.floor() as i32;

        let mut min_dist = 2.0_f64;

        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell_x = base_x + dx;
                let cell_y = base_y + dy;

                let index = ((cell_x & 255) ^ (cell_y & 255)) as usize;
                let point = Vector2::new(cell_x as f64, cell_y as f64) + self.randoms[index];

                min_dist = min_dist.min((scaled - point).magnitude());
            }
        }

        min_dist
    }
}

/// Renders a reproducible synthetic frame for exercising the capture
/// pipeline without camera input.
///
/// Color gradients run along both axes and the noise breaks up flat areas,
/// so misplaced or flipped crops never compare equal by accident.
pub fn render(width: u32, height: u32, seed: u64) -> FrameBuffer {
    // par_chunks_mut rejects a zero chunk size
    if width == 0 || height == 0 {
        return FrameBuffer::new(width, height);
    }

    let noise = CellNoise2D::new(8.0, seed);

    let mut fb = FrameBuffer::new(width, height);
    let w = width as f64;
    let h = height as f64;

    fb.buffer_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let u = (x as f64 + 0.5) / w;
                let v = (y as f64 + 0.5) / h;

                let dist = noise.sample(Vector2::new(u, v)).min(1.0);

                *pixel = Pixel::from(Vector3::new(0.2 + 0.6 * u, 0.2 + 0.6 * v, 1.0 - dist));
            }
        });

    fb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_in_range() {
        let noise = CellNoise2D::new(8.0, 0);

        for i in 0..64 {
            let position = Vector2::new(i as f64 / 64.0, 1.0 - i as f64 / 64.0);
            let dist = noise.sample(position);

            assert!((0.0..=2.0).contains(&dist));
        }
    }

    #[test]
    fn render_is_deterministic() {
        let first = render(64, 48, 7);
        let second = render(64, 48, 7);

        assert_eq!(first, second);
        assert_eq!(first.size(), (64, 48));
    }

    #[test]
    fn seeds_change_output() {
        assert_ne!(render(64, 48, 1), render(64, 48, 2));
    }

    #[test]
    fn zero_sized_render_yields_empty_frame() {
        assert_eq!(render(0, 48, 1).size(), (0, 48));
        assert_eq!(render(64, 0, 1).size(), (64, 0));
        assert!(render(0, 0, 1).buffer().is_empty());
    }
}
