use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use meishi::frame::FrameSize;
use meishi::geometry::Viewport;
use meishi::guide::AlignmentGuide;

use crate::BUILTIN_VIEWPORTS;

/// Capture settings resolved from a profile file, with defaults for
/// everything the file leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureProfile {
    pub camera: FrameSize,
    pub guide: AlignmentGuide,
    pub jpeg_quality: u8,
    pub viewports: BTreeMap<String, Viewport>,
}

impl Default for CaptureProfile {
    fn default() -> Self {
        Self {
            camera: FrameSize::new(4096, 3072),
            guide: AlignmentGuide::default(),
            jpeg_quality: 95,
            viewports: BTreeMap::new(),
        }
    }
}

impl CaptureProfile {
    /// Resolves a device name, profile entries shadowing the built-in
    /// table.
    pub fn viewport(&self, name: &str) -> Result<Viewport, LoaderError> {
        if let Some(viewport) = self.viewports.get(name) {
            return Ok(*viewport);
        }

        BUILTIN_VIEWPORTS
            .get(name)
            .copied()
            .ok_or(LoaderError::IndexError(name.to_string(), "viewports"))
    }
}

pub struct ProfileLoader {}

impl ProfileLoader {
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<CaptureProfile, LoaderError> {
        let profile_str = std::fs::read_to_string(path).map_err(LoaderError::InputError)?;

        Self::load_from_str(&profile_str)
    }

    pub fn load_from_str(profile_str: &str) -> Result<CaptureProfile, LoaderError> {
        let json: ProfileFile = json5::from_str(profile_str).map_err(LoaderError::FormatError)?;

        let mut profile = CaptureProfile::default();

        if let Some(stub) = &json.camera {
            profile.camera = load_camera(stub)?;
        }

        if let Some(stub) = &json.guide {
            profile.guide = load_guide(stub)?;
        }

        if let Some(stub) = &json.output {
            if let Some(quality) = stub.jpeg_quality {
                if !(1..=100).contains(&quality) {
                    let msg = format!("jpeg quality {quality} outside 1-100");
                    return Err(LoaderError::Other(msg));
                }

                profile.jpeg_quality = quality;
            }
        }

        for (name, stub) in &json.viewports {
            if !(stub.width.is_finite() && stub.width > 0.0)
                || !(stub.height.is_finite() && stub.height > 0.0)
            {
                let msg = format!("invalid viewport size for '{name}'");
                return Err(LoaderError::Other(msg));
            }

            profile
                .viewports
                .insert(name.clone(), Viewport::new(stub.width, stub.height));
        }

        Ok(profile)
    }
}

fn load_camera(stub: &CameraStub) -> Result<FrameSize, LoaderError> {
    if stub.width == 0 || stub.height == 0 {
        let msg = format!("invalid camera resolution {}x{}", stub.width, stub.height);
        return Err(LoaderError::Other(msg));
    }

    Ok(FrameSize::new(stub.width, stub.height))
}

fn load_guide(stub: &GuideStub) -> Result<AlignmentGuide, LoaderError> {
    let mut guide = AlignmentGuide::default();

    if let Some(ratio) = stub.width_ratio {
        if !(ratio > 0.0 && ratio <= 1.0) {
            let msg = format!("guide width ratio {ratio} outside (0, 1]");
            return Err(LoaderError::Other(msg));
        }

        guide.width_ratio = ratio;
    }

    if let Some(aspect) = stub.aspect_ratio {
        if !(aspect.is_finite() && aspect > 0.0) {
            let msg = format!("guide aspect ratio {aspect} is not positive");
            return Err(LoaderError::Other(msg));
        }

        guide.aspect_ratio = aspect;
    }

    Ok(guide)
}

#[derive(Debug)]
pub enum LoaderError {
    InputError(std::io::Error),
    FormatError(json5::Error),
    IndexError(String, &'static str),
    Other(String),
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputError(e) => f.write_fmt(format_args!("{e}")),
            Self::FormatError(e) => f.write_fmt(format_args!("{e}")),
            Self::IndexError(index, kind) => {
                f.write_fmt(format_args!("no index {index} found in {kind}"))
            }
            Self::Other(e) => f.write_fmt(format_args!("{e}")),
        }
    }
}

impl Error for LoaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputError(e) => Some(e),
            Self::FormatError(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CameraStub {
    width: u32,
    height: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GuideStub {
    width_ratio: Option<f64>,
    aspect_ratio: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OutputStub {
    jpeg_quality: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ViewportStub {
    width: f64,
    height: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileFile {
    camera: Option<CameraStub>,
    guide: Option<GuideStub>,
    output: Option<OutputStub>,
    #[serde(default)]
    viewports: BTreeMap<String, ViewportStub>,
}
