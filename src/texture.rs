//! Texture lookup is an external collaborator (spec.md S1/S6): this crate
//! only defines the seam. A `Texture<T>` is either a constant value baked
//! into the material at scene-build time, or a handle to an external,
//! thread-safe source that performs the actual (mipmap-filtered) lookup.

use std::sync::Arc;

use crate::vec::Vec2;

/// Implemented by the external image/procedural texture system. `footprint`
/// is the UV-space filter width carried by `RayDifferential` (spec.md S3).
pub trait TextureSource<T>: Send + Sync {
    fn eval(&self, uv: Vec2, footprint: Vec2) -> T;
}

#[derive(Clone)]
pub enum Texture<T> {
    Constant(T),
    External(Arc<dyn TextureSource<T>>),
}

impl<T: Copy> Texture<T> {
    #[must_use]
    pub fn eval(&self, uv: Vec2, footprint: Vec2) -> T {
        match self {
            Self::Constant(v) => *v,
            Self::External(src) => src.eval(uv, footprint),
        }
    }
}

impl<T> From<T> for Texture<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}
