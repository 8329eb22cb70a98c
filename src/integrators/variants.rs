//! The five progressive specialisations named in spec.md S4.6. Each is a
//! free function taking a generic `Scene` so none of them depend on a
//! concrete acceleration structure, light list or camera.

use cgmath::{ElementWise, InnerSpace};

use crate::{
    Real,
    interfaces::{INDEX_MATCHING, Scene},
    materials::EvalContext,
    medium::MediumSample,
    ray::{Ray, RayDifferential},
    samplers::Sampler,
    vec::{Color3, Frame, Point3, Vec3},
};

use super::PathState;

const SHADOW_CHAIN_DEPTH_CAP: usize = 32;

fn power_heuristic(pdf_a: Real, pdf_b: Real) -> Real {
    let a = pdf_a * pdf_a;
    let b = pdf_b * pdf_b;
    if a + b > 0.0 { a / (a + b) } else { 0.0 }
}

/// Russian roulette: returns `false` when the path should terminate.
fn russian_roulette(state: &mut PathState, sampler: &mut dyn Sampler, rr_depth: usize) -> bool {
    if state.bounce < rr_depth {
        return true;
    }
    let q = crate::vec::luminance(&state.beta).clamp(0.0, 0.95);
    if q <= 0.0 {
        return false;
    }
    if sampler.next() > q {
        return false;
    }
    state.beta /= q;
    true
}

/// What next event estimation is being computed from.
enum Vertex<'a> {
    Medium {
        p: Point3,
        wo: Vec3,
    },
    Surface {
        v: &'a crate::interfaces::SurfaceVertex,
        wo_local: Vec3,
        frame: Frame,
    },
}

/// Walk a shadow ray from `p0` (in medium `m0`) towards `target`, crossing
/// any index-matching interfaces and accumulating transmittance through the
/// media in between (spec.md S4.5 "Next event estimation", step 2).
/// Returns `None` on opaque occlusion or if the chain exceeds the depth cap.
fn trace_transmittance<S: Scene + ?Sized>(scene: &S, p0: Point3, m0: i64, target: Point3) -> Option<Color3> {
    let mut p = p0;
    let mut m = m0;
    let mut tr = Color3::new(1.0, 1.0, 1.0);

    for _ in 0..SHADOW_CHAIN_DEPTH_CAP {
        let to_target = target - p;
        let dist = to_target.magnitude();
        if dist < 1e-9 {
            return Some(tr);
        }
        let dir = to_target / dist;
        let ray = RayDifferential::new(Ray::new(&p, &dir).with_distance_max(dist - 1e-4));

        match scene.intersect(&ray) {
            None => {
                if m >= 0 {
                    if let Some(medium) = scene.medium(m) {
                        tr = tr.mul_element_wise(medium.transmittance(dist));
                    }
                }
                return Some(tr);
            }
            Some(v) => {
                if v.material_id != INDEX_MATCHING {
                    return None; // opaque occluder
                }
                if m >= 0 {
                    if let Some(medium) = scene.medium(m) {
                        tr = tr.mul_element_wise(medium.transmittance(v.t));
                    }
                }
                m = v.medium_after_crossing(dir);
                p = v.p + dir * 1e-4;
            }
        }
    }
    None
}

/// Sample a light and, if unoccluded, return its MIS-weighted contribution
/// (not yet multiplied by `beta` or, in the volume case, `sigma_s`).
fn next_event_estimation<S: Scene + ?Sized>(
    scene: &S,
    sampler: &mut dyn Sampler,
    medium_id: i64,
    vertex: &Vertex<'_>,
    use_mis: bool,
) -> Color3 {
    if scene.num_lights() == 0 {
        return Color3::new(0.0, 0.0, 0.0);
    }

    let reference = match vertex {
        Vertex::Medium { p, .. } => *p,
        Vertex::Surface { v, .. } => v.p,
    };

    let light = scene.sample_light(sampler.next());
    let pmf = scene.light_pmf(light);
    let (light_p, light_n) = scene.sample_point_on_light(light, reference, sampler.next2d(), sampler.next());
    let pdf_area = pmf * scene.pdf_point_on_light(light, light_p, light_n, reference);
    if pdf_area <= 0.0 {
        return Color3::new(0.0, 0.0, 0.0);
    }

    let Some(tr) = trace_transmittance(scene, reference, medium_id, light_p) else {
        return Color3::new(0.0, 0.0, 0.0);
    };

    let to_light = light_p - reference;
    let dist2 = to_light.magnitude2();
    if dist2 <= 0.0 {
        return Color3::new(0.0, 0.0, 0.0);
    }
    let dist = dist2.sqrt();
    let dir_to_light = to_light / dist;
    let cos_light = cgmath::dot(-dir_to_light, light_n).abs();
    let g = cos_light / dist2;

    let le = scene.emission(light, -dir_to_light, light_p, light_n);

    let (f, pdf_dir) = match vertex {
        Vertex::Medium { wo, .. } => {
            let Some(medium) = scene.medium(medium_id) else {
                return Color3::new(0.0, 0.0, 0.0);
            };
            let pf = medium.phase_function().phase_func(wo, &dir_to_light);
            (Color3::new(pf, pf, pf), pf)
        }
        Vertex::Surface { v, wo_local, frame } => {
            let Some(material) = scene.material(v.material_id) else {
                return Color3::new(0.0, 0.0, 0.0);
            };
            let wi_local = frame.to_local(&dir_to_light);
            let ctx = EvalContext { uv: v.uv, footprint: v.uv_footprint, p: v.p };
            let f = material.eval(*wo_local, wi_local, &ctx);
            let pdf = material.pdf(*wo_local, wi_local, &ctx);
            (f, pdf)
        }
    };

    let pdf_bsdf_area = pdf_dir * g;
    let weight = if use_mis { power_heuristic(pdf_area, pdf_bsdf_area) } else { 1.0 };

    tr * g * weight / pdf_area * le.mul_element_wise(f)
}

/// Variant 1: absorption-only, direct visibility. No stochastic distance
/// sampling at all — a deterministic Beer-Lambert transmittance times
/// whatever the ray eventually hits, so it reproduces property 4 exactly
/// regardless of RNG state.
pub(crate) fn absorption_only<S: Scene + ?Sized>(ray: &RayDifferential, scene: &S, state: &mut PathState) {
    let mut ray = *ray;
    let mut medium_id = state.medium_id;

    loop {
        match scene.intersect(&ray) {
            None => {
                if medium_id >= 0 {
                    if let Some(medium) = scene.medium(medium_id) {
                        state.beta = state.beta.mul_element_wise(medium.transmittance(1e6));
                    }
                }
                state.l += state.beta.mul_element_wise(scene.background(ray.ray.d));
                return;
            }
            Some(v) => {
                if medium_id >= 0 {
                    if let Some(medium) = scene.medium(medium_id) {
                        state.beta = state.beta.mul_element_wise(medium.transmittance(v.t));
                    }
                }
                if v.material_id == INDEX_MATCHING {
                    medium_id = v.medium_after_crossing(ray.ray.d);
                    ray = RayDifferential::new(Ray::new(&v.p, &ray.ray.d));
                    continue;
                }
                if let Some(light) = scene.light_of_shape(v.shape_id) {
                    state.l += state.beta.mul_element_wise(scene.emission(light, -ray.ray.d, v.p, v.geometric_normal));
                }
                return;
            }
        }
    }
}

/// Variant 2: homogeneous single-scatter with explicit light sampling. At
/// most one medium scatter event, immediately resolved via NEE; no further
/// bounces.
pub(crate) fn single_scatter_nee<S: Scene + ?Sized>(
    ray: &RayDifferential,
    scene: &S,
    sampler: &mut dyn Sampler,
    state: &mut PathState,
    _rr_depth: usize,
) {
    let its = scene.intersect(ray);
    let t_hit = its.as_ref().map_or(f64::MAX, |v| v.t);

    if state.medium_id >= 0 {
        if let Some(medium) = scene.medium(state.medium_id) {
            match medium.sample(t_hit, sampler) {
                MediumSample::Scatter { t, tr, pdf, .. } => {
                    state.beta = state.beta.mul_element_wise(tr) / pdf;
                    let p = ray.ray.point_at(t);
                    let wo = -ray.ray.d;
                    let contrib = next_event_estimation(scene, sampler, state.medium_id, &Vertex::Medium { p, wo }, false);
                    state.l += state.beta.mul_element_wise(medium.sigma_s()).mul_element_wise(contrib);
                    return;
                }
                MediumSample::None { tr } => {
                    state.beta = state.beta.mul_element_wise(tr);
                }
            }
        }
    }

    if let Some(v) = its {
        if let Some(light) = scene.light_of_shape(v.shape_id) {
            state.l += state.beta.mul_element_wise(scene.emission(light, -ray.ray.d, v.p, v.geometric_normal));
        }
    } else {
        state.l += state.beta.mul_element_wise(scene.background(ray.ray.d));
    }
}

/// Variant 3: multiple homogeneous media, multi-scatter, no MIS, no surface
/// lighting. Variant 4 reuses this function with `use_mis = true`.
pub(crate) fn multi_scatter<S: Scene + ?Sized>(
    ray: &RayDifferential,
    scene: &S,
    sampler: &mut dyn Sampler,
    state: &mut PathState,
    max_depth: isize,
    rr_depth: usize,
    use_mis: bool,
) {
    let mut ray = *ray;

    loop {
        let its = scene.intersect(&ray);
        let t_hit = its.as_ref().map_or(f64::MAX, |v| v.t);

        let mut scattered = false;
        if state.medium_id >= 0 {
            if let Some(medium) = scene.medium(state.medium_id) {
                match medium.sample(t_hit, sampler) {
                    MediumSample::Scatter { t, tr, pdf, .. } => {
                        state.beta = state.beta.mul_element_wise(tr) / pdf;
                        let p = ray.ray.point_at(t);
                        state.p_nee = p;
                        let wo = -ray.ray.d;

                        let contrib =
                            next_event_estimation(scene, sampler, state.medium_id, &Vertex::Medium { p, wo }, use_mis);
                        state.l += state.beta.mul_element_wise(medium.sigma_s()).mul_element_wise(contrib);

                        let xi = sampler.next2d();
                        let wi = medium.phase_function().sample_p(&wo, (xi.x, xi.y));
                        if wi.magnitude2() == 0.0 {
                            return;
                        }
                        let pdf_phase = medium.phase_function().phase_func(&wo, &wi);
                        state.beta = state.beta.mul_element_wise(medium.sigma_s());
                        state.dir_pdf = pdf_phase;
                        state.trans_pdf_chain = 1.0;
                        state.never_scatter = false;

                        ray = RayDifferential::new(Ray::new(&p, &wi.normalize()));
                        scattered = true;
                    }
                    MediumSample::None { tr } => {
                        state.beta = state.beta.mul_element_wise(tr);
                    }
                }
            }
        }

        if scattered {
            state.bounce += 1;
            if max_depth >= 0 && state.bounce as isize >= max_depth - 1 {
                return;
            }
            if !russian_roulette(state, sampler, rr_depth) {
                return;
            }
            continue;
        }

        let Some(v) = its else {
            state.l += state.beta.mul_element_wise(scene.background(ray.ray.d));
            return;
        };

        if v.material_id == INDEX_MATCHING {
            state.medium_id = v.medium_after_crossing(ray.ray.d);
            state.bounce += 1;
            ray = RayDifferential::new(Ray::new(&v.p, &ray.ray.d));
            continue;
        }

        // "no surface lighting": BSDF bounces continue the walk but never
        // contribute emitted or direct-lit radiance.
        let Some(material) = scene.material(v.material_id) else { return };
        let frame = Frame::new(&v.shading_normal);
        let wo_local = frame.to_local(&(-ray.ray.d));
        let ctx = EvalContext { uv: v.uv, footprint: v.uv_footprint, p: v.p };
        let Some(rec) = material.sample(wo_local, &ctx, sampler.next2d()) else { return };
        let f = material.eval(wo_local, rec.wi, &ctx);
        let pdf = material.pdf(wo_local, rec.wi, &ctx);
        if pdf <= 0.0 {
            return;
        }
        state.beta = state.beta.mul_element_wise(f) * (rec.wi.z.abs() / pdf);
        state.never_scatter = false;
        let wi_world = frame.to_world(&rec.wi).normalize();
        ray = RayDifferential::new(Ray::new(&v.p, &wi_world));
        if rec.eta != 0.0 {
            state.medium_id = v.medium_after_crossing(wi_world);
        }

        state.bounce += 1;
        if max_depth >= 0 && state.bounce as isize >= max_depth - 1 {
            return;
        }
        if !russian_roulette(state, sampler, rr_depth) {
            return;
        }
    }
}

/// Variant 5: the final integrator — adds direct lighting from surfaces
/// (emission hits weighted by MIS, plus NEE at surface vertices) on top of
/// variant 4's multi-scatter MIS volume path.
pub(crate) fn full<S: Scene + ?Sized>(
    ray: &RayDifferential,
    scene: &S,
    sampler: &mut dyn Sampler,
    state: &mut PathState,
    max_depth: isize,
    rr_depth: usize,
) {
    let mut ray = *ray;

    loop {
        let its = scene.intersect(&ray);
        let t_hit = its.as_ref().map_or(f64::MAX, |v| v.t);

        let mut scattered = false;
        if state.medium_id >= 0 {
            if let Some(medium) = scene.medium(state.medium_id) {
                match medium.sample(t_hit, sampler) {
                    MediumSample::Scatter { t, tr, pdf, .. } => {
                        state.beta = state.beta.mul_element_wise(tr) / pdf;
                        let p = ray.ray.point_at(t);
                        state.p_nee = p;
                        let wo = -ray.ray.d;

                        let contrib = next_event_estimation(scene, sampler, state.medium_id, &Vertex::Medium { p, wo }, true);
                        state.l += state.beta.mul_element_wise(medium.sigma_s()).mul_element_wise(contrib);

                        let xi = sampler.next2d();
                        let wi = medium.phase_function().sample_p(&wo, (xi.x, xi.y));
                        if wi.magnitude2() == 0.0 {
                            return;
                        }
                        let pdf_phase = medium.phase_function().phase_func(&wo, &wi);
                        state.beta = state.beta.mul_element_wise(medium.sigma_s());
                        state.dir_pdf = pdf_phase;
                        state.trans_pdf_chain = 1.0;
                        state.never_scatter = false;

                        ray = RayDifferential::new(Ray::new(&p, &wi.normalize()));
                        scattered = true;
                    }
                    MediumSample::None { tr } => {
                        state.beta = state.beta.mul_element_wise(tr);
                    }
                }
            }
        }

        if scattered {
            state.bounce += 1;
            if max_depth >= 0 && state.bounce as isize >= max_depth - 1 {
                return;
            }
            if !russian_roulette(state, sampler, rr_depth) {
                return;
            }
            continue;
        }

        let Some(v) = its else {
            state.l += state.beta.mul_element_wise(scene.background(ray.ray.d));
            return;
        };

        // Direct emitter hit. The weight collapses to 1 on the very first
        // vertex (nothing to compare the BSDF/phase pdf against yet).
        if let Some(light) = scene.light_of_shape(v.shape_id) {
            let le = scene.emission(light, -ray.ray.d, v.p, v.geometric_normal);
            if state.never_scatter {
                state.l += state.beta.mul_element_wise(le);
            } else {
                let d2 = (v.p - state.p_nee).magnitude2();
                let pdf_nee = scene.light_pmf(light) * scene.pdf_point_on_light(light, v.p, v.geometric_normal, state.p_nee);
                let g = cgmath::dot(ray.ray.d, v.geometric_normal).abs() / d2.max(1e-12);
                let pdf_bsdf_area = state.dir_pdf * state.trans_pdf_chain * g;
                let w = power_heuristic(pdf_bsdf_area, pdf_nee);
                state.l += state.beta.mul_element_wise(le) * w;
            }
        }

        if v.material_id == INDEX_MATCHING {
            state.medium_id = v.medium_after_crossing(ray.ray.d);
            state.bounce += 1;
            ray = RayDifferential::new(Ray::new(&v.p, &ray.ray.d));
            continue;
        }

        let Some(material) = scene.material(v.material_id) else { return };
        let frame_base = Frame::new(&v.shading_normal);
        let same_side = cgmath::dot(v.shading_normal, -ray.ray.d).signum()
            == cgmath::dot(v.geometric_normal, -ray.ray.d).signum();
        let frame = if same_side { frame_base } else { frame_base.flip() };
        let wo_local = frame.to_local(&(-ray.ray.d));
        let ctx = EvalContext { uv: v.uv, footprint: v.uv_footprint, p: v.p };

        let contrib = next_event_estimation(
            scene,
            sampler,
            state.medium_id,
            &Vertex::Surface { v: &v, wo_local, frame },
            true,
        );
        state.l += state.beta.mul_element_wise(contrib);

        let Some(rec) = material.sample(wo_local, &ctx, sampler.next2d()) else { return };
        let f = material.eval(wo_local, rec.wi, &ctx);
        let mut pdf = material.pdf(wo_local, rec.wi, &ctx);
        if rec.eta != 0.0 {
            pdf *= rec.eta * rec.eta;
        }
        if pdf <= 0.0 {
            return;
        }
        state.beta = state.beta.mul_element_wise(f) * (rec.wi.z.abs() / pdf);
        state.dir_pdf = pdf;
        state.trans_pdf_chain = 1.0;
        state.never_scatter = false;

        let wi_world = frame.to_world(&rec.wi).normalize();
        ray = RayDifferential::new(Ray::new(&v.p, &wi_world));
        if rec.eta != 0.0 {
            state.medium_id = v.medium_after_crossing(wi_world);
        }

        state.bounce += 1;
        if max_depth >= 0 && state.bounce as isize >= max_depth - 1 {
            return;
        }
        if !russian_roulette(state, sampler, rr_depth) {
            return;
        }
    }
}
