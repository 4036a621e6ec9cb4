//! Feature preprocessing.
//!
//! The only transformation this pipeline applies is standard scaling,
//! fit once by the tree trainer and reused by the neural trainer and the
//! exporter.

mod scaler;

pub use scaler::{ScalerParams, StandardScaler};
