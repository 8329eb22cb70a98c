//! Disney principled BSDF: a tagged union over the five analytic lobes plus
//! the mixer that combines them (spec.md S9 design note — replaces the
//! teacher's `dyn Material` trait-object dispatch with exhaustive case
//! analysis over a sum type, and closures-over-references with an explicit
//! evaluation-context struct).

use crate::{
    Real,
    texture::Texture,
    vec::{Color3, Point3, Vec2, Vec3, luminance},
};

pub mod clearcoat;
pub mod diffuse;
pub mod glass;
pub mod metal;
pub mod mixer;
pub mod sheen;

/// Everything a lobe needs about *where* it is being evaluated, replacing
/// the teacher's pattern of threading `(uv, p)` through every call and
/// capturing the texture pool in a closure.
pub struct EvalContext {
    pub uv: Vec2,
    pub footprint: Vec2,
    pub p: Point3,
}

/// Result of sampling a lobe or the mixer (spec.md S3 "BSDF sample record").
/// `eta` is 0 for a reflection event, otherwise the relative IOR the ray
/// crossed (used by the integrator to multiply `dir_pdf` by `eta^2`).
#[derive(Clone, Copy)]
pub struct BsdfSampleRecord {
    pub wi: Vec3,
    pub eta: Real,
    pub roughness: Real,
}

/// The immutable, texture-backed Disney material (spec.md S3).
pub struct DisneyMaterial {
    pub base_color: Texture<Color3>,
    pub specular_transmission: Texture<Real>,
    pub metallic: Texture<Real>,
    pub subsurface: Texture<Real>,
    pub specular: Texture<Real>,
    pub roughness: Texture<Real>,
    pub specular_tint: Texture<Real>,
    pub anisotropic: Texture<Real>,
    pub sheen: Texture<Real>,
    pub sheen_tint: Texture<Real>,
    pub clearcoat: Texture<Real>,
    pub clearcoat_gloss: Texture<Real>,
    pub eta: Real,
}

/// All per-vertex quantities the five lobes need, resolved once from the
/// textured material (mirrors the teacher's `PBsdfSample`).
pub(crate) struct Resolved {
    pub base_color: Color3,
    pub specular_transmission: Real,
    pub metallic: Real,
    pub subsurface: Real,
    pub specular: Real,
    pub roughness: Real,
    pub specular_tint: Real,
    pub sheen: Real,
    pub sheen_tint: Real,
    pub clearcoat: Real,
    pub clearcoat_gloss: Real,
    pub eta: Real,
    pub alpha_x: Real,
    pub alpha_y: Real,
    pub c_tint: Color3,
}

impl DisneyMaterial {
    pub(crate) fn resolve(&self, ctx: &EvalContext) -> Resolved {
        let base_color = self.base_color.eval(ctx.uv, ctx.footprint);
        let anisotropic = self.anisotropic.eval(ctx.uv, ctx.footprint);
        let roughness = self.roughness.eval(ctx.uv, ctx.footprint).max(0.01);

        let (alpha_x, alpha_y) = crate::microfacet::anisotropic_alphas(roughness, anisotropic);

        let lum = luminance(&base_color);
        let c_tint = if lum > 0.0 {
            base_color / lum
        } else {
            Color3::new(1.0, 1.0, 1.0)
        };

        Resolved {
            base_color,
            specular_transmission: self.specular_transmission.eval(ctx.uv, ctx.footprint),
            metallic: self.metallic.eval(ctx.uv, ctx.footprint),
            subsurface: self.subsurface.eval(ctx.uv, ctx.footprint),
            specular: self.specular.eval(ctx.uv, ctx.footprint),
            roughness,
            specular_tint: self.specular_tint.eval(ctx.uv, ctx.footprint),
            sheen: self.sheen.eval(ctx.uv, ctx.footprint),
            sheen_tint: self.sheen_tint.eval(ctx.uv, ctx.footprint),
            clearcoat: self.clearcoat.eval(ctx.uv, ctx.footprint),
            clearcoat_gloss: self.clearcoat_gloss.eval(ctx.uv, ctx.footprint),
            eta: self.eta,
            alpha_x,
            alpha_y,
            c_tint,
        }
    }
}

/// The tagged union itself. Currently a single variant — room is left for
/// future material kinds (e.g. a pure emitter) without touching the
/// integrator, which only ever matches exhaustively on this enum.
pub enum Material {
    Principled(DisneyMaterial),
}

impl Material {
    #[must_use]
    pub fn eval(&self, wo: Vec3, wi: Vec3, ctx: &EvalContext) -> Color3 {
        match self {
            Self::Principled(m) => mixer::eval(&m.resolve(ctx), wo, wi),
        }
    }

    #[must_use]
    pub fn pdf(&self, wo: Vec3, wi: Vec3, ctx: &EvalContext) -> Real {
        match self {
            Self::Principled(m) => mixer::pdf(&m.resolve(ctx), wo, wi),
        }
    }

    #[must_use]
    pub fn sample(&self, wo: Vec3, ctx: &EvalContext, u: Vec2) -> Option<BsdfSampleRecord> {
        match self {
            Self::Principled(m) => mixer::sample(&m.resolve(ctx), wo, u),
        }
    }
}
