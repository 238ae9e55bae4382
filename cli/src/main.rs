use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;

use log::debug;

use meishi::frame::FrameSize;
use meishi::framebuffer::{FrameBuffer, Pixel};
use meishi::geometry::{cover_region, extraction_region, Viewport};

use meishi_common::profile_loader::{CaptureProfile, ProfileLoader};

mod args;

use args::{Args, ModeArg};

fn main() {
    env_logger::init();

    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    let profile = match &args.profile {
        Some(path) => match ProfileLoader::load_from_path(path) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Could not read capture profile: {e}");
                std::process::exit(-1);
            }
        },
        None => CaptureProfile::default(),
    };

    let frame = match image::open(&args.frame) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Could not read frame: {e}");
            std::process::exit(-1);
        }
    };

    let rgba = frame.to_rgba8();
    let frame_size = FrameSize::new(rgba.width(), rgba.height());

    let fb = FrameBuffer::from_rgba_bytes(frame_size.width, frame_size.height, &rgba.into_raw())
        .unwrap();

    if frame_size != profile.camera {
        debug!(
            "frame is {}x{}, profile camera is {}x{}",
            frame_size.width, frame_size.height, profile.camera.width, profile.camera.height
        );
    }

    let viewport = resolve_viewport(&args, &profile);

    let mut guide = profile.guide;

    if let Some(ratio) = args.guide_ratio {
        guide.width_ratio = ratio;
    }

    if let Some(aspect) = args.guide_aspect {
        guide.aspect_ratio = aspect;
    }

    let visible = match cover_region(frame_size, viewport) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid capture geometry: {e}");
            std::process::exit(-1);
        }
    };

    let crop = match extraction_region(frame_size, viewport, guide) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid capture geometry: {e}");
            std::process::exit(-1);
        }
    };

    debug!("video resolution: {}x{}", frame_size.width, frame_size.height);
    debug!("display size: {}x{}", viewport.width, viewport.height);
    debug!(
        "render area: {}x{} at ({}, {})",
        visible.width, visible.height, visible.offset_x, visible.offset_y
    );
    debug!(
        "crop area: {}x{} at ({}, {})",
        crop.width, crop.height, crop.x, crop.y
    );

    match args.mode {
        ModeArg::Crop => {
            let out = match fb.extract(&crop) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Could not extract capture region: {e}");
                    std::process::exit(-1);
                }
            };

            write_out(&out, &args.output, profile.jpeg_quality);

            println!(
                "Captured {}x{} region to {}",
                out.width(),
                out.height(),
                args.output.display()
            );
        }
        ModeArg::Annotate => {
            let mut fb = fb;

            // two CSS pixels of guide border, scaled back to source pixels
            let thickness = (2.0 * visible.width / viewport.width).round().max(1.0) as u32;

            if let Err(e) = fb.stroke_region(&crop, thickness, Pixel::white()) {
                eprintln!("Could not annotate frame: {e}");
                std::process::exit(-1);
            }

            write_out(&fb, &args.output, profile.jpeg_quality);

            println!("Annotated frame saved to {}", args.output.display());
        }
        ModeArg::Inspect => {
            let json = serde_json::json!({
                "x": crop.x,
                "y": crop.y,
                "width": crop.width,
                "height": crop.height,
                "aspect_ratio": crop.aspect_ratio(),
            });

            println!("{}", serde_json::to_string_pretty(&json).unwrap());
        }
    }
}

fn resolve_viewport(args: &Args, profile: &CaptureProfile) -> Viewport {
    match (args.display_width, args.display_height) {
        (Some(width), Some(height)) => Viewport::new(width, height),
        (None, None) => {
            let device = match &args.device {
                Some(v) => v,
                None => {
                    eprintln!("No display size given, use --display-width and --display-height or --device");
                    std::process::exit(-1);
                }
            };

            match profile.viewport(device) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Unknown device: {e}");
                    std::process::exit(-1);
                }
            }
        }
        _ => {
            eprintln!("--display-width and --display-height must be given together");
            std::process::exit(-1);
        }
    }
}

fn write_out(fb: &FrameBuffer, name: &PathBuf, jpeg_quality: u8) {
    let extension = name
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => {
            let file = File::create(name).unwrap();
            let writer = BufWriter::new(file);
            let mut encoder = png::Encoder::new(writer, fb.width(), fb.height());
            encoder.set_color(png::ColorType::Rgba);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(fb.as_bytes()).unwrap();
        }
        Some("jpg") | Some("jpeg") => {
            let file = File::create(name).unwrap();
            let mut writer = BufWriter::new(file);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, jpeg_quality);
            encoder
                .encode(
                    &fb.to_rgb_bytes(),
                    fb.width(),
                    fb.height(),
                    image::ColorType::Rgb8,
                )
                .unwrap();
        }
        _ => {
            eprintln!("Unsupported output format: {}", name.display());
            std::process::exit(-1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_out_encodes_by_extension() {
        let fb = meishi::pattern::render(32, 24, 5);

        let jpeg_path = std::env::temp_dir().join("meishi_write_out_test.jpg");
        write_out(&fb, &jpeg_path, 90);

        let jpeg = std::fs::read(&jpeg_path).unwrap();
        std::fs::remove_file(&jpeg_path).unwrap();

        // JPEG start-of-image marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let png_path = std::env::temp_dir().join("meishi_write_out_test.png");
        write_out(&fb, &png_path, 90);

        let png = std::fs::read(&png_path).unwrap();
        std::fs::remove_file(&png_path).unwrap();

        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
