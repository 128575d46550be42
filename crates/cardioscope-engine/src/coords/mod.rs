//! Coordinate types shared by the plot generators and renderers.
//!
//! Canonical GPU space is NDC: `[-1, 1] × [-1, 1]`, +X right, +Y up.
//! Grid and trace vertices are produced directly in NDC on the CPU; the
//! viewport only supplies the pixel basis for tick spacing.

mod viewport;

pub use viewport::Viewport;
