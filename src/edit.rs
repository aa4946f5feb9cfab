//! The overlay record and the controller that is its only writer.

pub(crate) mod controller;
pub(crate) mod input;
pub(crate) mod overlay;
pub(crate) mod surface;
