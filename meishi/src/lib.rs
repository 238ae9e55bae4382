pub mod frame;
pub mod framebuffer;
pub mod geometry;
pub mod guide;
pub mod pattern;
