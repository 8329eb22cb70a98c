//! A tiny, self-contained `Scene` (spec.md S6): one Disney sphere lit by a
//! rectangular area light, suspended in a thin homogeneous fog. Scene
//! parsing, acceleration structures and texture filtering are external
//! collaborators the spec explicitly scopes out; this module exists only so
//! the CLI binary has something concrete to hand the integrator.

use cgmath::InnerSpace;

use crate::{
    Real,
    interfaces::{INDEX_MATCHING, LightId, RayCaster, LightSampler, Scene, SurfaceVertex, VACUUM},
    materials::{DisneyMaterial, Material},
    medium::{HomogeneousMedium, Medium, PhaseFunction, HenyeyGreenstein},
    ray::RayDifferential,
    vec::{Color3, Point3, Vec2, Vec3},
};

const FOG_MEDIUM: i64 = 0;
const SPHERE_MATERIAL: i64 = 0;
const LIGHT_MATERIAL: i64 = 1;
const LIGHT_SHAPE: i64 = 1;
const SPHERE_SHAPE: i64 = 0;

struct Sphere {
    center: Point3,
    radius: Real,
}

/// Axis-aligned rectangle (in the XZ plane) facing down (-Y), used as the
/// scene's single area light.
struct QuadLight {
    center: Point3,
    half_extent: Real,
    normal: Vec3,
    radiance: Color3,
}

impl QuadLight {
    fn area(&self) -> Real {
        (2.0 * self.half_extent) * (2.0 * self.half_extent)
    }
}

pub struct DemoScene {
    sphere: Sphere,
    light: QuadLight,
    materials: Vec<Material>,
    fog: HomogeneousMedium,
    background: Color3,
}

impl Default for DemoScene {
    fn default() -> Self {
        let sphere_material = Material::Principled(DisneyMaterial {
            base_color: Color3::new(0.8, 0.2, 0.2).into(),
            specular_transmission: 0.0.into(),
            metallic: 0.0.into(),
            subsurface: 0.0.into(),
            specular: 0.5.into(),
            roughness: 0.35.into(),
            specular_tint: 0.0.into(),
            anisotropic: 0.0.into(),
            sheen: 0.0.into(),
            sheen_tint: 0.0.into(),
            clearcoat: 0.0.into(),
            clearcoat_gloss: 0.0.into(),
            eta: 1.5,
        });
        let light_material = Material::Principled(DisneyMaterial {
            base_color: Color3::new(0.0, 0.0, 0.0).into(),
            specular_transmission: 0.0.into(),
            metallic: 0.0.into(),
            subsurface: 0.0.into(),
            specular: 0.0.into(),
            roughness: 1.0.into(),
            specular_tint: 0.0.into(),
            anisotropic: 0.0.into(),
            sheen: 0.0.into(),
            sheen_tint: 0.0.into(),
            clearcoat: 0.0.into(),
            clearcoat_gloss: 0.0.into(),
            eta: 1.5,
        });

        Self {
            sphere: Sphere { center: Point3::new(0.0, 0.0, 0.0), radius: 1.0 },
            light: QuadLight {
                center: Point3::new(0.0, 3.0, 0.0),
                half_extent: 0.75,
                normal: Vec3::new(0.0, -1.0, 0.0),
                radiance: Color3::new(15.0, 15.0, 15.0),
            },
            materials: vec![sphere_material, light_material],
            fog: HomogeneousMedium {
                sigma_a: Vec3::new(0.02, 0.02, 0.02),
                sigma_s: Vec3::new(0.01, 0.01, 0.01),
                density: 1.0,
                phase: PhaseFunction::HenyeyGreenstein(HenyeyGreenstein { g: 0.0 }),
            },
            background: Color3::new(0.02, 0.02, 0.03),
        }
    }
}

fn intersect_sphere(sphere: &Sphere, ray: &RayDifferential) -> Option<(Real, Point3, Vec3)> {
    let oc = ray.ray.o - sphere.center;
    let a = ray.ray.d.magnitude2();
    let b = 2.0 * cgmath::dot(oc, ray.ray.d);
    let c = oc.magnitude2() - sphere.radius * sphere.radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = (-b - sq) / (2.0 * a);
    let t1 = (-b + sq) / (2.0 * a);
    let t = if t0 > ray.ray.tmin && t0 < ray.ray.tmax {
        t0
    } else if t1 > ray.ray.tmin && t1 < ray.ray.tmax {
        t1
    } else {
        return None;
    };
    let p = ray.ray.point_at(t);
    let n = (p - sphere.center).normalize();
    Some((t, p, n))
}

fn intersect_light(light: &QuadLight, ray: &RayDifferential) -> Option<(Real, Point3)> {
    let denom = cgmath::dot(ray.ray.d, light.normal);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = cgmath::dot(light.center - ray.ray.o, light.normal) / denom;
    if t <= ray.ray.tmin || t >= ray.ray.tmax {
        return None;
    }
    let p = ray.ray.point_at(t);
    let local = p - light.center;
    if local.x.abs() <= light.half_extent && local.z.abs() <= light.half_extent {
        Some((t, p))
    } else {
        None
    }
}

impl DemoScene {
    fn sphere_vertex(&self, t: Real, p: Point3, n: Vec3, footprint: Vec2) -> SurfaceVertex {
        SurfaceVertex {
            p,
            geometric_normal: n,
            shading_normal: n,
            uv: Vec2::new(0.0, 0.0),
            uv_footprint: footprint,
            shape_id: SPHERE_SHAPE,
            material_id: SPHERE_MATERIAL,
            interior_medium_id: VACUUM,
            exterior_medium_id: FOG_MEDIUM,
            t,
        }
    }

    fn light_vertex(&self, t: Real, p: Point3, footprint: Vec2) -> SurfaceVertex {
        SurfaceVertex {
            p,
            geometric_normal: self.light.normal,
            shading_normal: self.light.normal,
            uv: Vec2::new(0.0, 0.0),
            uv_footprint: footprint,
            shape_id: LIGHT_SHAPE,
            material_id: LIGHT_MATERIAL,
            interior_medium_id: FOG_MEDIUM,
            exterior_medium_id: FOG_MEDIUM,
            t,
        }
    }
}

impl RayCaster for DemoScene {
    fn intersect(&self, ray: &RayDifferential) -> Option<SurfaceVertex> {
        let sphere_hit = intersect_sphere(&self.sphere, ray);
        let light_hit = intersect_light(&self.light, ray);

        match (sphere_hit, light_hit) {
            (Some((ts, p, n)), Some((tl, pl))) => {
                if ts < tl {
                    Some(self.sphere_vertex(ts, p, n, ray.footprint))
                } else {
                    Some(self.light_vertex(tl, pl, ray.footprint))
                }
            }
            (Some((t, p, n)), None) => Some(self.sphere_vertex(t, p, n, ray.footprint)),
            (None, Some((t, p))) => Some(self.light_vertex(t, p, ray.footprint)),
            (None, None) => None,
        }
    }
}

impl LightSampler for DemoScene {
    fn num_lights(&self) -> usize {
        1
    }

    fn sample_light(&self, _xi: Real) -> LightId {
        0
    }

    fn light_pmf(&self, _light: LightId) -> Real {
        1.0
    }

    fn light_of_shape(&self, shape_id: i64) -> Option<LightId> {
        if shape_id == LIGHT_SHAPE { Some(0) } else { None }
    }

    fn sample_point_on_light(&self, _light: LightId, _reference: Point3, xi_uv: Vec2, _xi_w: Real) -> (Point3, Vec3) {
        let x = (xi_uv.x * 2.0 - 1.0) * self.light.half_extent;
        let z = (xi_uv.y * 2.0 - 1.0) * self.light.half_extent;
        let p = self.light.center + Vec3::new(x, 0.0, z);
        (p, self.light.normal)
    }

    fn pdf_point_on_light(&self, _light: LightId, _point: Point3, _normal: Vec3, _reference: Point3) -> Real {
        1.0 / self.light.area()
    }

    fn emission(&self, _light: LightId, dir_to_ref: Vec3, _point: Point3, normal: Vec3) -> Color3 {
        if cgmath::dot(normal, dir_to_ref) > 0.0 {
            self.light.radiance
        } else {
            Color3::new(0.0, 0.0, 0.0)
        }
    }
}

impl Scene for DemoScene {
    fn material(&self, id: i64) -> Option<&Material> {
        if id == INDEX_MATCHING {
            return None;
        }
        usize::try_from(id).ok().and_then(|i| self.materials.get(i))
    }

    fn medium(&self, id: i64) -> Option<&dyn Medium> {
        if id == FOG_MEDIUM { Some(&self.fog) } else { None }
    }

    fn camera_medium_id(&self) -> i64 {
        FOG_MEDIUM
    }

    fn background(&self, _dir: Vec3) -> Color3 {
        self.background
    }
}
