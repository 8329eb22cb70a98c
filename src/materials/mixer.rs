//! The Disney principled mixer: combines the five lobes with inside/outside
//! gating (spec.md S4.3). When the known direction is below the geometric
//! surface the whole material delegates to the glass lobe; otherwise the
//! four non-sheen weights are normalised and one lobe is drawn per sample,
//! while `eval` sums all five contributions (sheen included) and `pdf`
//! deliberately omits sheen's own pdf since it reuses the diffuse sampler
//! (documented open question, spec.md S9).

use cgmath::InnerSpace;

use crate::{
    Real,
    constants::MIN_LOBE_WEIGHT,
    materials::{BsdfSampleRecord, Resolved, clearcoat, diffuse, glass, metal, sheen},
    vec::{Color3, Vec2, Vec3},
};

struct Weights {
    diffuse: Real,
    sheen: Real,
    metal: Real,
    clearcoat: Real,
    glass: Real,
}

fn weights(r: &Resolved) -> Weights {
    Weights {
        diffuse: (1.0 - r.specular_transmission) * (1.0 - r.metallic),
        sheen: (1.0 - r.metallic) * r.sheen,
        metal: 1.0 - r.specular_transmission * (1.0 - r.metallic),
        clearcoat: 0.25 * r.clearcoat,
        glass: (1.0 - r.metallic) * r.specular_transmission,
    }
}

#[must_use]
pub(crate) fn eval(r: &Resolved, wo: Vec3, wi: Vec3) -> Color3 {
    if wo.z < 0.0 {
        return glass::eval(r, wo, wi);
    }

    let w = weights(r);
    w.diffuse * diffuse::eval(r, wo, wi)
        + w.sheen * sheen::eval(r, wo, wi)
        + w.metal * metal::eval(r, wo, wi)
        + w.clearcoat * clearcoat::eval(r, wo, wi)
        + w.glass * glass::eval(r, wo, wi)
}

#[must_use]
pub(crate) fn pdf(r: &Resolved, wo: Vec3, wi: Vec3) -> Real {
    if wo.z < 0.0 {
        return glass::pdf(r, wo, wi);
    }

    let w = weights(r);
    let total = w.diffuse + w.metal + w.clearcoat + w.glass;
    if total < MIN_LOBE_WEIGHT {
        return 0.0;
    }

    (w.diffuse * diffuse::pdf(wi)
        + w.metal * metal::pdf(r, wo, wi)
        + w.clearcoat * clearcoat::pdf_resolved(r, wo, wi)
        + w.glass * glass::pdf(r, wo, wi))
        / total
}

#[must_use]
pub(crate) fn sample(r: &Resolved, wo: Vec3, u: Vec2) -> Option<BsdfSampleRecord> {
    if wo.z < 0.0 {
        let (wi, eta) = glass::sample(r, wo, u)?;
        return Some(BsdfSampleRecord { wi, eta, roughness: r.roughness });
    }

    let w = weights(r);
    let total = w.diffuse + w.metal + w.clearcoat + w.glass;
    if total < MIN_LOBE_WEIGHT {
        return None;
    }

    let t_diffuse = w.diffuse / total;
    let t_metal = t_diffuse + w.metal / total;
    let t_glass = t_metal + w.glass / total;

    let mut u = u;
    let (wi, eta) = if u.x < t_diffuse {
        u.x /= t_diffuse;
        (diffuse::sample(wo, u)?, 0.0)
    } else if u.x < t_metal {
        u.x = (u.x - t_diffuse) / (w.metal / total);
        (metal::sample(r, wo, u)?, 0.0)
    } else if u.x < t_glass {
        u.x = (u.x - t_metal) / (w.glass / total);
        glass::sample(r, wo, u)?
    } else {
        u.x = (u.x - t_glass) / (w.clearcoat / total);
        (clearcoat::sample(r, wo, u)?, 0.0)
    };

    Some(BsdfSampleRecord { wi, eta, roughness: r.roughness })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plastic() -> Resolved {
        Resolved {
            base_color: Color3::new(0.5, 0.5, 0.5),
            specular_transmission: 0.0,
            metallic: 0.0,
            subsurface: 0.0,
            specular: 0.5,
            roughness: 0.5,
            specular_tint: 0.0,
            sheen: 0.0,
            sheen_tint: 0.0,
            clearcoat: 0.0,
            clearcoat_gloss: 0.0,
            eta: 1.5,
            alpha_x: 0.25,
            alpha_y: 0.25,
            c_tint: Color3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn purely_diffuse_weights_sum_to_one() {
        let w = weights(&plastic());
        assert!((w.diffuse + w.metal - 1.0).abs() < 1e-9); // metal=1 here too (transmission 0)
    }

    #[test]
    fn sample_then_eval_is_positive_for_a_diffuse_plastic() {
        let r = plastic();
        let wo = Vec3::new(0.0, 0.0, 1.0);
        let rec = sample(&r, wo, Vec2::new(0.2, 0.3)).expect("plastic always samples");
        assert!(rec.wi.z > 0.0);
        let f = eval(&r, wo, rec.wi);
        assert!(f.x >= 0.0 && f.y >= 0.0 && f.z >= 0.0);
    }
}
