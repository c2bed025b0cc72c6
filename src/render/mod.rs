//! CPU compositing of timeline state into premultiplied RGBA8 surfaces.

pub(crate) mod composite;
pub(crate) mod surface;
