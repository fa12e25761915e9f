//! Scene validation errors.
//!
//! Tracing itself never fails: a miss or an absorbed ray is `None`. What can
//! fail is building a scene the tracer cannot handle, and that is reported
//! here, before the first ray is cast.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("cannot build a BVH over an empty object list")]
    EmptyScene,

    #[error("object {index} has no bounding box over time [{time0}, {time1}]")]
    UnboundedPrimitive { index: usize, time0: f32, time1: f32 },

    #[error("moving primitive needs time1 > time0, got [{time0}, {time1}]")]
    InvalidTimeSpan { time0: f32, time1: f32 },

    #[error("medium density must be positive and finite, got {0}")]
    InvalidDensity(f32),
}

pub type SceneResult<T> = Result<T, SceneError>;
