//! Disney metal: Schlick Fresnel with an anisotropic GGX/Smith microfacet
//! core (spec.md S4.2, "Metal (modified)").

use cgmath::InnerSpace;

use crate::{
    Real,
    materials::Resolved,
    microfacet::{gtr2_anisotropic, sample_visible_normal, smith_g_anisotropic},
    vec::{Color3, Vec2, Vec3},
};

#[must_use]
pub(crate) fn eval(r: &Resolved, wo: Vec3, wi: Vec3) -> Color3 {
    if wo.z.abs() < 0.05 || wi.z <= 0.0 || wo.z <= 0.0 {
        return Color3::new(0.0, 0.0, 0.0);
    }
    let h = (wo + wi).normalize();
    let one_minus_h_dot_wi_5 = (1.0 - h.dot(wi).abs()).powi(5);

    let ks = Color3::new(1.0, 1.0, 1.0) * (1.0 - r.specular_tint) + r.specular_tint * r.c_tint;
    let r0_sqrt = (r.eta - 1.0) / (r.eta + 1.0);
    let c0 = r.specular * r0_sqrt * r0_sqrt * (1.0 - r.metallic) * ks + r.metallic * r.base_color;
    let fm = c0 + (Color3::new(1.0, 1.0, 1.0) - c0) * one_minus_h_dot_wi_5;

    let dm = gtr2_anisotropic(h, r.alpha_x, r.alpha_y);
    let gm = smith_g_anisotropic(wo, r.alpha_x, r.alpha_y) * smith_g_anisotropic(wi, r.alpha_x, r.alpha_y);

    fm * dm * gm / (4.0 * wo.z.abs())
}

#[must_use]
pub(crate) fn pdf(r: &Resolved, wo: Vec3, wi: Vec3) -> Real {
    if wo.z <= 0.0 || wi.z <= 0.0 {
        return 0.0;
    }
    let h = (wo + wi).normalize();
    let dm = gtr2_anisotropic(h, r.alpha_x, r.alpha_y);
    let g_wo = smith_g_anisotropic(wo, r.alpha_x, r.alpha_y);
    dm * g_wo / (4.0 * wo.z.abs())
}

#[must_use]
pub(crate) fn sample(r: &Resolved, wo: Vec3, u: Vec2) -> Option<Vec3> {
    if wo.z <= 0.0 {
        return None;
    }
    let h = sample_visible_normal(wo, r.alpha_x, r.alpha_y, (u.x, u.y));
    let reflected = h * (2.0 * wo.dot(h)) - wo;
    if reflected.z <= 0.0 {
        return None;
    }
    Some(reflected.normalize())
}
