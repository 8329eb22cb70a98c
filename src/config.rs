//! Renderer configuration (spec.md S4.9 supplement): a small, flat settings
//! struct overridable from the CLI, the way the teacher keeps its own
//! render parameters a handful of plain fields rather than a nested
//! config-file hierarchy. `serde`-derived so a scene or settings file can
//! supply defaults that CLI flags then override.

use serde::{Deserialize, Serialize};

use crate::{Error, Real, Result, integrators::Variant};

/// Which of the five spec.md S4.6 specialisations to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VariantConfig {
    AbsorptionOnly,
    SingleScatterNee,
    MultiScatter,
    MultiScatterMis,
    #[default]
    Full,
}

impl From<VariantConfig> for Variant {
    fn from(value: VariantConfig) -> Self {
        match value {
            VariantConfig::AbsorptionOnly => Self::AbsorptionOnly,
            VariantConfig::SingleScatterNee => Self::SingleScatterNee,
            VariantConfig::MultiScatter => Self::MultiScatter,
            VariantConfig::MultiScatterMis => Self::MultiScatterMis,
            VariantConfig::Full => Self::Full,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub spp: usize,
    /// Negative means unbounded (Russian roulette alone decides termination).
    pub max_depth: isize,
    pub rr_depth: usize,
    #[serde(default)]
    pub variant: VariantConfig,
    pub output: String,
    /// `None` lets rayon pick the global default (all cores).
    pub threads: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 384,
            spp: 16,
            max_depth: -1,
            rr_depth: 5,
            variant: VariantConfig::default(),
            output: "out.png".to_string(),
            threads: None,
        }
    }
}

impl RenderSettings {
    /// Install the requested thread count as rayon's global pool. Must be
    /// called at most once per process, before any rendering starts.
    pub fn configure_thread_pool(&self) -> Result<()> {
        let Some(n) = self.threads else { return Ok(()) };
        if n == 0 {
            return Err(Error::InvalidArgument("thread count must be positive".to_string()));
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| Error::InvalidArgument(format!("failed to start {n} worker threads: {e}")))
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> Real {
        Real::from(self.width) / Real::from(self.height)
    }
}
