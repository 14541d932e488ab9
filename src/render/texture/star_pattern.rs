//! Procedural speckle texture used as roughness variation on the silver stars

use image::{GrayImage, Luma};
use rand::Rng;

pub const STAR_PATTERN_SIZE: u32 = 256;
const DOT_COUNT: usize = 200;
const MAX_DOT_RADIUS: f32 = 1.5;
const CROSSHAIR_CHANCE: f64 = 0.2;
const CROSSHAIR_HALF_LENGTH: i32 = 3;

fn darken(image: &mut GrayImage, x: i32, y: i32, value: u8) {
    let size = STAR_PATTERN_SIZE as i32;
    let (x, y) = (x.rem_euclid(size) as u32, y.rem_euclid(size) as u32);
    let pixel = image.get_pixel_mut(x, y);
    pixel.0[0] = pixel.0[0].min(value);
}

/// White field with black dots and occasional cross-hairs. Wraps on both axes.
pub fn star_pattern<R: Rng + ?Sized>(rng: &mut R) -> GrayImage {
    let size = STAR_PATTERN_SIZE as f32;
    let mut image = GrayImage::from_pixel(STAR_PATTERN_SIZE, STAR_PATTERN_SIZE, Luma([255]));

    for _ in 0..DOT_COUNT {
        let cx = rng.gen_range(0.0..size);
        let cy = rng.gen_range(0.0..size);
        let radius = rng.gen_range(0.0..MAX_DOT_RADIUS);

        // Partial coverage keeps sub-pixel dots visible
        let reach = (radius + 1.0).ceil() as i32;
        let (px, py) = (cx.floor() as i32, cy.floor() as i32);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (x, y) = (px + dx, py + dy);
                let dist = ((x as f32 + 0.5 - cx).powi(2) + (y as f32 + 0.5 - cy).powi(2)).sqrt();
                let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    darken(&mut image, x, y, (255.0 * (1.0 - coverage)) as u8);
                }
            }
        }

        if rng.gen_bool(CROSSHAIR_CHANCE) {
            for d in -CROSSHAIR_HALF_LENGTH..=CROSSHAIR_HALF_LENGTH {
                darken(&mut image, px + d, py, 128);
                darken(&mut image, px, py + d, 128);
            }
        }
    }
    image
}

/// Upload the pattern as a repeating, filterable `R8Unorm` texture
pub fn upload_star_pattern(device: &wgpu::Device, queue: &wgpu::Queue, image: &GrayImage) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("star_pattern"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::R8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_mostly_white_with_dots() {
        let image = star_pattern(&mut StdRng::seed_from_u64(3));
        assert_eq!(image.dimensions(), (256, 256));
        let dark = image.pixels().filter(|p| p.0[0] < 255).count();
        let total = (256 * 256) as usize;
        assert!(dark > 100, "only {dark} marked pixels");
        assert!(dark < total / 10, "{dark} marked pixels");
    }

    #[test]
    fn test_seeded_pattern_repeats() {
        let a = star_pattern(&mut StdRng::seed_from_u64(9));
        let b = star_pattern(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_raw_bytes_are_tightly_packed_rows() {
        // Uploaded with bytes_per_row = width, one byte per R8 texel
        let image = star_pattern(&mut StdRng::seed_from_u64(5));
        let (width, height) = image.dimensions();
        assert_eq!(image.as_raw().len(), (width * height) as usize);
        for (x, y) in [(0, 0), (17, 3), (width - 1, height - 1)] {
            assert_eq!(image.as_raw()[(y * width + x) as usize], image.get_pixel(x, y).0[0]);
        }
    }
}
