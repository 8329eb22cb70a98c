#[macro_use]
extern crate quick_error;

pub type Real = f64;

pub mod constants {
    use std::f64;

    use crate::Real;
    pub const M_PI: Real = f64::consts::PI;
    pub const INV_PI: Real = f64::consts::FRAC_1_PI;
    pub const INV_TWOPI: Real = 0.159_154_943_091_895_35;
    pub const INV_FOURPI: Real = 0.079_577_471_545_947_67;
    pub const SQRT_TWO: Real = f64::consts::SQRT_2;
    pub const INV_SQRT_TWO: Real = f64::consts::FRAC_1_SQRT_2;
    pub const RAY_EPS: Real = 0.0001;
    /// Lobes below this combined weight are treated as a degenerate material (spec.md S4.3).
    pub const MIN_LOBE_WEIGHT: Real = 0.05;
}

/// Convert radians to degrees
#[must_use]
pub fn rad2deg(value: Real) -> Real {
    value * (180.0 / constants::M_PI)
}

/// Convert degrees to radians
#[must_use]
pub fn deg2rad(value: Real) -> Real {
    value * (constants::M_PI / 180.0)
}

quick_error! {
    /// Input-time failures (spec.md S7, kind 1). Degenerate-sample and numerical-guard
    /// outcomes (kinds 2-4) are never errors; they collapse to `None`/zero spectra in place.
    #[derive(Debug)]
    pub enum Error {
        /// Scene file named on the command line does not exist or cannot be opened.
        MissingSceneFile(path: String) {
            display("scene file not found: {}", path)
        }
        /// CLI argument failed validation (e.g. non-positive thread count).
        InvalidArgument(what: String) {
            display("invalid argument: {}", what)
        }
        /// Output path has no recognized image extension.
        UnknownOutputFormat(path: String) {
            display("cannot infer image format from output path: {}", path)
        }
        /// Wraps an I/O failure while reading/writing the image or config.
        Io(err: std::io::Error) {
            source(err)
            display("I/O error: {}", err)
        }
    }
}
pub type Result<T> = std::result::Result<T, Error>;

/// Modulo function, always returns a non-negative number.
#[must_use]
pub fn modulo(a: Real, b: Real) -> Real {
    let r = a % b;
    if r < 0.0 { r + b } else { r }
}

pub mod config;
pub mod demo_scene;
pub mod integrators;
pub mod interfaces;
pub mod materials;
pub mod medium;
pub mod microfacet;
pub mod ray;
pub mod samplers;
pub mod schedule;
pub mod texture;
pub mod vec;
