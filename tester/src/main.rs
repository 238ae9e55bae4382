use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;

use meishi::frame::FrameSize;
use meishi::framebuffer::FrameBuffer;
use meishi::geometry::{extraction_region, Viewport};
use meishi::guide::AlignmentGuide;
use meishi::pattern;

mod args;
mod config;

use crate::config::Case;

fn main() {
    let args = <args::Args as Parser>::parse();
    let config = std::fs::read_to_string(&args.config_path).expect("Cannot read config file");

    let cases: config::Config = toml::from_str(&config).expect("Invalid config structure");
    let cases = cases.case;

    let test_path = get_test_path(&args.config_path);

    let mut failures = 0;

    for case in &cases {
        println!("Testing {}", case.name);

        let frame = pattern::render(case.frame_width, case.frame_height, case.seed);

        let frame_name = PathBuf::from(format!("{}_frame.png", case.name));
        write_png(&test_path, &frame_name, &frame);

        let crop_name = execute_case(&test_path, case, &frame_name);

        let new_img = read_image(&test_path, &crop_name);
        let expected = expected_crop(case, &frame);

        let comp = compare(&new_img, expected.as_bytes());

        println!(
            "Total error: {}\nPercentage error: {}%",
            comp.total_err, comp.percentage_err
        );

        if comp.total_err != 0.0 {
            failures += 1;
        }
    }

    if failures != 0 {
        println!("{failures} cases failed");
        std::process::exit(1);
    }
}

fn get_test_path(config_path: impl AsRef<Path>) -> PathBuf {
    config_path
        .as_ref()
        .canonicalize()
        .unwrap()
        .parent()
        .unwrap()
        .to_owned()
}

fn execute_case(wd: impl AsRef<Path>, case: &Case, frame_name: &Path) -> PathBuf {
    let output_name = PathBuf::from(format!("{}_crop.png", case.name));

    let mut cmd = Command::new("../target/release/meishi-cli");

    cmd.current_dir(wd).arg(frame_name).args([
        "--display-width",
        &case.display_width.to_string(),
        "--display-height",
        &case.display_height.to_string(),
    ]);

    if let Some(ratio) = case.guide_ratio {
        cmd.args(["--guide-ratio", &ratio.to_string()]);
    }

    if let Some(aspect) = case.guide_aspect {
        cmd.args(["--guide-aspect", &aspect.to_string()]);
    }

    let mut child = cmd.arg("--output").arg(&output_name).spawn().unwrap();

    child.wait().unwrap();

    output_name
}

fn expected_crop(case: &Case, frame: &FrameBuffer) -> FrameBuffer {
    let mut guide = AlignmentGuide::default();

    if let Some(ratio) = case.guide_ratio {
        guide.width_ratio = ratio;
    }

    if let Some(aspect) = case.guide_aspect {
        guide.aspect_ratio = aspect;
    }

    let region = extraction_region(
        FrameSize::new(case.frame_width, case.frame_height),
        Viewport::new(case.display_width, case.display_height),
        guide,
    )
    .expect("Invalid case geometry");

    frame.extract(&region).expect("Invalid case region")
}

fn write_png(test_path: impl AsRef<Path>, name: &Path, fb: &FrameBuffer) {
    let mut img_path = test_path.as_ref().to_owned();
    img_path.push(name);

    let file = File::create(img_path).unwrap();
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, fb.width(), fb.height());
    encoder.set_color(png::ColorType::Rgba);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(fb.as_bytes()).unwrap();
}

fn read_image(test_path: impl AsRef<Path>, path: impl AsRef<Path>) -> Vec<u8> {
    let mut img_path = test_path.as_ref().to_owned();
    img_path.push(path.as_ref());
    let file = File::open(img_path).unwrap();

    let decoder = png::Decoder::new(file);

    let mut reader = decoder.read_info().unwrap();

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();

    buf.truncate(info.buffer_size());

    buf
}

fn compare(new_img: &[u8], expected: &[u8]) -> Comparison {
    if new_img.len() != expected.len() {
        panic!("sizes do not match");
    }

    let mut total_err = 0.0;

    for (n, e) in new_img.iter().zip(expected.iter()) {
        total_err += n.abs_diff(*e) as f32 / 255.0;
    }

    let percentage_err = (total_err / new_img.len() as f32) * 100.0;

    Comparison {
        total_err,
        percentage_err,
    }
}

struct Comparison {
    pub total_err: f32,
    pub percentage_err: f32,
}
