use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use meishi::geometry::Viewport;

pub mod profile_loader;

/// Screen sizes of devices the capture flow is commonly run on, in CSS
/// pixels.
pub static BUILTIN_VIEWPORTS: Lazy<BTreeMap<&'static str, Viewport>> =
    Lazy::new(gen_builtin_viewports);

fn gen_builtin_viewports() -> BTreeMap<&'static str, Viewport> {
    BTreeMap::from([
        ("galaxy-s20", Viewport::new(360.0, 800.0)),
        ("ipad", Viewport::new(768.0, 1024.0)),
        ("iphone-14", Viewport::new(390.0, 844.0)),
        ("iphone-se", Viewport::new(375.0, 667.0)),
        ("iphone-x", Viewport::new(375.0, 812.0)),
        ("pixel-5", Viewport::new(393.0, 851.0)),
        ("pixel-7", Viewport::new(412.0, 915.0)),
    ])
}
