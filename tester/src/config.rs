use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    pub case: Vec<Case>,
}

#[derive(Deserialize, Debug)]
pub struct Case {
    pub name: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub seed: u64,
    pub display_width: f64,
    pub display_height: f64,
    pub guide_ratio: Option<f64>,
    pub guide_aspect: Option<f64>,
}
