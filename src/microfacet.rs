//! Microfacet primitives shared by the metal, clearcoat and glass lobes:
//! dielectric/Schlick Fresnel, anisotropic GTR2 (GGX), Smith masking, the
//! Heitz 2018 visible-normal sampler, and the clearcoat GTR1 (Berry) term.

use std::f64::consts::PI;

use cgmath::InnerSpace;

use crate::{
    Real,
    vec::{Frame, Vec3},
};

/// ε floor applied to both anisotropic roughness axes (spec.md S4.1).
pub const ALPHA_MIN: Real = 1e-4;

/// Unsigned dielectric Fresnel reflectance, `eta = eta_transmitted / eta_incident`.
/// `cos_theta_i` is taken as an absolute value by the caller's convention;
/// returns 1 (total internal reflection) when the radicand is negative.
#[must_use]
pub fn fresnel_dielectric(cos_theta_i: Real, eta: Real) -> Real {
    let cos_theta_i = cos_theta_i.abs();
    let sin_theta_t_sq = (1.0 - cos_theta_i * cos_theta_i) / (eta * eta);
    if sin_theta_t_sq > 1.0 {
        return 1.0;
    }
    let cos_theta_t = (1.0 - sin_theta_t_sq).sqrt();
    fresnel_dielectric_signed(cos_theta_i, cos_theta_t, eta)
}

/// Unpolarised average of the s- and p-polarisation reflectances, given both
/// cosines already resolved (used when the transmitted cosine comes from a
/// half-vector construction rather than a plain Snell solve).
#[must_use]
pub fn fresnel_dielectric_signed(cos_theta_i: Real, cos_theta_t: Real, eta: Real) -> Real {
    let rs = (cos_theta_i - eta * cos_theta_t) / (cos_theta_i + eta * cos_theta_t);
    let rp = (eta * cos_theta_i - cos_theta_t) / (eta * cos_theta_i + cos_theta_t);
    (rs * rs + rp * rp) * 0.5
}

/// Fresnel reflectance at a half-vector, resolving the transmitted cosine
/// from `h_dot_wo` and `eta` internally; returns 1 on total internal reflection.
#[must_use]
pub fn fresnel_dielectric_half(h_dot_wo: Real, eta: Real) -> Real {
    let cos_theta_t_sq = 1.0 - (1.0 - h_dot_wo * h_dot_wo) / (eta * eta);
    if cos_theta_t_sq < 0.0 {
        1.0
    } else {
        fresnel_dielectric_signed(h_dot_wo.abs(), cos_theta_t_sq.sqrt(), eta)
    }
}

/// Schlick's approximation: `F0 + (1 - F0) (1 - |cos|)^5`.
#[must_use]
pub fn fresnel_schlick(f0: Real, cos_theta: Real) -> Real {
    f0 + (1.0 - f0) * (1.0 - cos_theta.abs()).powi(5)
}

/// Derive the anisotropic alpha pair from isotropic roughness and an
/// anisotropy parameter in `[0, 1]` (spec.md S4.1).
#[must_use]
pub fn anisotropic_alphas(roughness: Real, anisotropic: Real) -> (Real, Real) {
    let aspect = (1.0 - 0.9 * anisotropic).sqrt();
    let r2 = roughness * roughness;
    ((r2 / aspect).max(ALPHA_MIN), (r2 * aspect).max(ALPHA_MIN))
}

/// Anisotropic GTR2 (GGX) normal distribution in local (half-vector) space.
#[must_use]
pub fn gtr2_anisotropic(h: Vec3, alpha_x: Real, alpha_y: Real) -> Real {
    let hx = h.x / alpha_x;
    let hy = h.y / alpha_y;
    let norm = hx * hx + hy * hy + h.z * h.z;
    1.0 / (PI * alpha_x * alpha_y * norm * norm)
}

/// Smith `Lambda` for the anisotropic GTR2 distribution.
#[must_use]
pub fn smith_lambda_anisotropic(v: Vec3, alpha_x: Real, alpha_y: Real) -> Real {
    let vx = v.x * alpha_x;
    let vy = v.y * alpha_y;
    0.5 * (-1.0 + (1.0 + (vx * vx + vy * vy) / (v.z * v.z)).sqrt())
}

/// Smith masking term `G(v) = 1 / (1 + Lambda(v))`.
#[must_use]
pub fn smith_g_anisotropic(v: Vec3, alpha_x: Real, alpha_y: Real) -> Real {
    1.0 / (1.0 + smith_lambda_anisotropic(v, alpha_x, alpha_y))
}

/// Sample a visible normal for the anisotropic GGX distribution (Heitz 2018).
/// `wo` must be in local shading space; negative hemispheres are handled by
/// sampling `-wo` and flipping the result, as the spec requires.
#[must_use]
pub fn sample_visible_normal(wo: Vec3, alpha_x: Real, alpha_y: Real, u: (Real, Real)) -> Vec3 {
    if wo.z < 0.0 {
        return -sample_visible_normal(-wo, alpha_x, alpha_y, u);
    }

    let stretched = Vec3::new(alpha_x * wo.x, alpha_y * wo.y, wo.z).normalize_to(1.0);

    let r = u.0.sqrt();
    let phi = 2.0 * PI * u.1;
    let t1 = r * phi.cos();
    let mut t2 = r * phi.sin();
    let s = 0.5 * (1.0 + stretched.z);
    t2 = (1.0 - s) * (1.0 - t1 * t1).max(0.0).sqrt() + s * t2;
    let disk_n = Vec3::new(t1, t2, (1.0 - t1 * t1 - t2 * t2).max(0.0).sqrt());

    let frame = Frame::new(&stretched);
    let n = frame.to_world(&disk_n);

    Vec3::new(alpha_x * n.x, alpha_y * n.y, n.z.max(0.0)).normalize_to(1.0)
}

/// Clearcoat GTR1 (Berry) distribution, `alpha_g = (1 - gloss) * 0.1 + gloss * 0.001`.
#[must_use]
pub fn gtr1(h: Vec3, alpha_g: Real) -> Real {
    let a2 = alpha_g * alpha_g;
    (a2 - 1.0) / (PI * a2.ln() * (1.0 + (a2 - 1.0) * h.z * h.z))
}

/// Importance-sample the GTR1 half-vector for the clearcoat lobe.
#[must_use]
pub fn sample_gtr1(alpha_g: Real, u: (Real, Real)) -> Vec3 {
    let a2 = alpha_g * alpha_g;
    let cos_h = ((1.0 - a2.powf(1.0 - u.0)) / (1.0 - a2)).sqrt();
    let sin_h = cos_h.acos().sin();
    let phi = 2.0 * PI * u.1;
    Vec3::new(sin_h * phi.cos(), sin_h * phi.sin(), cos_h)
}

/// Fixed isotropic roughness the clearcoat lobe uses for its own masking term.
pub const CLEARCOAT_ALPHA: Real = 0.25;

/// Clearcoat Smith masking `Lambda`, evaluated at the fixed roughness above.
#[must_use]
pub fn clearcoat_lambda(v: Vec3) -> Real {
    0.5 * (-1.0 + (1.0 + (0.0625 * (v.x * v.x + v.y * v.y)) / (v.z * v.z)).sqrt())
}

#[must_use]
pub fn clearcoat_g(v: Vec3) -> Real {
    1.0 / (1.0 + clearcoat_lambda(v))
}

/// Clearcoat Fresnel, Schlick with `F0` derived from `eta = 1.5`.
#[must_use]
pub fn clearcoat_fresnel(cos_theta: Real) -> Real {
    const R0: Real = 0.04; // ((1.5 - 1) / (1.5 + 1))^2
    fresnel_schlick(R0, cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    #[test]
    fn fresnel_normal_incidence_matches_schlick_r0() {
        let eta = 1.5;
        let r0 = ((eta - 1.0) / (eta + 1.0)).powi(2);
        assert!((fresnel_dielectric(1.0, eta) - r0).abs() < 1e-9);
    }

    #[test]
    fn fresnel_total_internal_reflection_saturates() {
        // Going from dense to rare medium at a grazing angle triggers TIR.
        let eta = 1.0 / 1.5;
        assert!((fresnel_dielectric(0.1, eta) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn visible_normal_sample_stays_in_upper_hemisphere() {
        let wo = Vec3::new(0.3, 0.1, 0.9).normalize_to(1.0);
        for i in 0..64 {
            let u = (
                (i as Real + 0.5) / 64.0,
                ((i * 7 % 64) as Real + 0.5) / 64.0,
            );
            let h = sample_visible_normal(wo, 0.2, 0.2, u);
            assert!(h.z >= 0.0);
            assert!((h.magnitude2() - 1.0).abs() < 1e-6);
        }
        let _ = Vec2::new(0.0, 0.0);
    }

    #[test]
    fn gtr1_integrates_to_roughly_one_over_solid_angle() {
        // Spot check the normal-incidence value is finite and positive for a
        // representative gloss value rather than a degenerate one.
        let d = gtr1(Vec3::new(0.0, 0.0, 1.0), (1.0 - 0.5) * 0.1 + 0.5 * 0.001);
        assert!(d.is_finite() && d > 0.0);
    }
}
