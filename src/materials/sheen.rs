//! Disney sheen: a weak grazing-angle retroreflective lobe. It borrows the
//! diffuse cosine-hemisphere sampler and pdf rather than its own importance
//! sampler (spec.md S4.2 — see the open question in S9 about the mixer's
//! pdf omitting the sheen term entirely).

use cgmath::InnerSpace;

use crate::{
    Real,
    materials::Resolved,
    samplers::pdf_cosine_hemisphere,
    vec::{Color3, Vec3},
};

#[must_use]
pub(crate) fn eval(r: &Resolved, wo: Vec3, wi: Vec3) -> Color3 {
    if wo.z < 0.0 || wi.z < 0.0 {
        return Color3::new(0.0, 0.0, 0.0);
    }
    let h = (wo + wi).normalize();
    let c_sheen = Color3::new(1.0, 1.0, 1.0) * (1.0 - r.sheen_tint) + r.sheen_tint * r.c_tint;
    let one_minus_h_dot_wi_5 = (1.0 - h.dot(wi).abs()).powi(5);
    c_sheen * one_minus_h_dot_wi_5 * wi.z.abs()
}

#[must_use]
pub(crate) fn pdf(wi: Vec3) -> Real {
    pdf_cosine_hemisphere(&wi)
}
