//! Optional extensions to the base spin controller.

pub mod spin_to;
#[cfg(feature = "extension_trackball_indicator")]
pub mod trackball_indicator;
