//! Disney clearcoat: an isotropic, fixed-roughness GTR1 (Berry) mirror lobe
//! layered on top of everything else (spec.md S4.1/S4.2).

use cgmath::InnerSpace;

use crate::{
    Real,
    materials::Resolved,
    microfacet::{clearcoat_fresnel, clearcoat_g, gtr1, sample_gtr1},
    vec::{Color3, Vec2, Vec3},
};

fn alpha_g(r: &Resolved) -> Real {
    (1.0 - r.clearcoat_gloss) * 0.1 + r.clearcoat_gloss * 0.001
}

#[must_use]
pub(crate) fn eval(r: &Resolved, wo: Vec3, wi: Vec3) -> Color3 {
    if wo.z <= 0.0 || wi.z <= 0.0 {
        return Color3::new(0.0, 0.0, 0.0);
    }
    let h = (wo + wi).normalize();
    let fc = clearcoat_fresnel(h.dot(wi));
    let dc = gtr1(h, alpha_g(r));
    let gc = clearcoat_g(wo) * clearcoat_g(wi);
    Color3::new(1.0, 1.0, 1.0) * (fc * dc * gc / (4.0 * wo.z.abs()))
}

#[must_use]
pub(crate) fn pdf(wo: Vec3, wi: Vec3, alpha: Real) -> Real {
    if wo.z < 0.0 || wi.z < 0.0 {
        return 0.0;
    }
    let h = (wo + wi).normalize();
    let dc = gtr1(h, alpha);
    dc * h.z.abs() / (4.0 * h.dot(wi).abs())
}

#[must_use]
pub(crate) fn pdf_resolved(r: &Resolved, wo: Vec3, wi: Vec3) -> Real {
    pdf(wo, wi, alpha_g(r))
}

#[must_use]
pub(crate) fn sample(r: &Resolved, wo: Vec3, u: Vec2) -> Option<Vec3> {
    let h = sample_gtr1(alpha_g(r), (u.x, u.y));
    let reflected = h * (2.0 * wo.dot(h)) - wo;
    if reflected.z <= 0.0 {
        return None;
    }
    Some(reflected.normalize())
}
