//! The object-safe seams between the path integrator and everything the
//! spec calls an external collaborator: acceleration-structure queries,
//! light sampling, material/medium storage. The core crate implements none
//! of these; `demo_scene` ships one trivial, in-memory `Scene` so the CLI
//! has something to render (spec.md S1/S6).

use crate::{
    Real,
    materials::Material,
    medium::Medium,
    ray::RayDifferential,
    vec::{Point3, Vec2, Vec3},
};

/// Identifies a light within a scene's light list. Opaque to the integrator.
pub type LightId = usize;

/// -1 conventionally means "vacuum" for a medium id, or "index-matching
/// interface" for a material id (spec.md S3).
pub const VACUUM: i64 = -1;
pub const INDEX_MATCHING: i64 = -1;

/// A ray/scene intersection (spec.md S3 "Surface vertex").
#[derive(Clone, Copy)]
pub struct SurfaceVertex {
    pub p: Point3,
    pub geometric_normal: Vec3,
    pub shading_normal: Vec3,
    pub uv: Vec2,
    pub uv_footprint: Vec2,
    pub shape_id: i64,
    /// -1 for a pure index-matching interface.
    pub material_id: i64,
    pub interior_medium_id: i64,
    pub exterior_medium_id: i64,
    pub t: Real,
}

impl SurfaceVertex {
    /// Resolve which medium becomes active after crossing this vertex,
    /// given the direction the ray is travelling.
    #[must_use]
    pub fn medium_after_crossing(&self, ray_dir: Vec3) -> i64 {
        if ray_dir.dot_normal(self.geometric_normal) < 0.0 {
            self.interior_medium_id
        } else {
            self.exterior_medium_id
        }
    }
}

/// Small helper so `SurfaceVertex` doesn't need to import `InnerSpace`
/// itself at every call site.
trait DotNormal {
    fn dot_normal(self, n: Vec3) -> Real;
}
impl DotNormal for Vec3 {
    fn dot_normal(self, n: Vec3) -> Real {
        cgmath::dot(self, n)
    }
}

/// Ray-primitive intersection (spec.md S6 "Ray-caster"). Deterministic for a
/// given scene snapshot; `t` is monotonic within `[ray.tmin, ray.tmax]`.
pub trait RayCaster: Send + Sync {
    fn intersect(&self, ray: &RayDifferential) -> Option<SurfaceVertex>;
}

/// Light sampling (spec.md S6 "Light sampling").
pub trait LightSampler: Send + Sync {
    fn num_lights(&self) -> usize;
    /// Discrete-pmf light selection from a single uniform sample.
    fn sample_light(&self, xi: Real) -> LightId;
    fn light_pmf(&self, light: LightId) -> Real;
    /// If `shape_id` is an emitter, the `LightId` that represents it.
    fn light_of_shape(&self, shape_id: i64) -> Option<LightId>;
    /// Sample a point on the light as seen from `reference`.
    fn sample_point_on_light(
        &self,
        light: LightId,
        reference: Point3,
        xi_uv: Vec2,
        xi_w: Real,
    ) -> (Point3, Vec3);
    /// Area-measure density of the point sampled above.
    fn pdf_point_on_light(&self, light: LightId, point: Point3, normal: Vec3, reference: Point3) -> Real;
    /// Emitted radiance leaving `point` (with normal `normal`) towards `-dir_to_ref`.
    fn emission(&self, light: LightId, dir_to_ref: Vec3, point: Point3, normal: Vec3) -> crate::vec::Color3;
}

/// The aggregate external context the path integrator is generic over.
pub trait Scene: RayCaster + LightSampler {
    fn material(&self, id: i64) -> Option<&Material>;
    fn medium(&self, id: i64) -> Option<&dyn Medium>;
    /// Medium the camera itself sits in (S4.5 initial path state).
    fn camera_medium_id(&self) -> i64;
    /// Radiance returned for rays that escape the scene entirely.
    fn background(&self, dir: Vec3) -> crate::vec::Color3;
}
