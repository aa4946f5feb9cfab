//! Canvas renderer: scene composition, hit testing, gestures and rasterization.

pub(crate) mod backend;
pub(crate) mod cpu;
pub(crate) mod gesture;
pub(crate) mod metrics;
pub(crate) mod scene;
