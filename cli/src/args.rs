use clap::{Parser, ValueEnum};

use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// Path to the captured frame
    #[arg()]
    pub frame: PathBuf,
    /// What to produce from the frame
    #[arg(value_enum, default_value_t = ModeArg::Crop)]
    pub mode: ModeArg,
    /// Width of the on-screen preview in CSS pixels
    #[arg(long)]
    pub display_width: Option<f64>,
    /// Height of the on-screen preview in CSS pixels
    #[arg(long)]
    pub display_height: Option<f64>,
    /// Device name to take the preview size from
    #[arg(short, long)]
    pub device: Option<String>,
    /// Path to capture profile JSON file
    #[arg(short, long)]
    pub profile: Option<PathBuf>,
    /// Guide width as a fraction of the displayed frame width
    #[arg(long)]
    pub guide_ratio: Option<f64>,
    /// Width to height ratio of the guide
    #[arg(long)]
    pub guide_aspect: Option<f64>,
    /// Path to save the result to
    #[arg(short, long, default_value_os_t = PathBuf::from("capture.png"))]
    pub output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ModeArg {
    Crop,
    Annotate,
    Inspect,
}
