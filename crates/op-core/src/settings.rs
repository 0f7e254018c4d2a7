//! Engine settings.
//!
//! [`Settings`] is a plain value handed to the dispatcher; there is no
//! process-wide state. It can be built from defaults, from environment
//! variables ([`Settings::from_env`]) or deserialized from a JSON settings
//! file where every field is optional.

use crate::errors::{Error, Result};
use crate::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable holding the Variance-Gamma path count.
pub const ENV_VG_PATHS: &str = "OPTIONPRICER_VG_PATHS";
/// Environment variable holding the base seed.
pub const ENV_SEED: &str = "OPTIONPRICER_SEED";
/// Environment variable selecting the gamma sampler.
pub const ENV_GAMMA_METHOD: &str = "OPTIONPRICER_GAMMA_METHOD";
/// Environment variable holding the paths-per-stream batch size.
pub const ENV_BATCH_SIZE: &str = "OPTIONPRICER_BATCH_SIZE";

/// Variance-Gamma path count used when nothing else is configured.
pub const DEFAULT_VG_PATHS: Size = 10_000;
/// Paths per independently seeded stream.
pub const DEFAULT_BATCH_SIZE: Size = 1_000;

/// How gamma-distributed durations are drawn for the Variance-Gamma clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GammaMethod {
    /// Product of `ceil(shape)` uniforms. Exact only for integer shapes.
    ///
    /// Draws `ceil(T/ν)` uniforms per path, so a small `ν` is expensive; the
    /// Variance-Gamma engine rejects shapes above `1e6`.
    Erlang,
    /// Marsaglia-Tsang squeeze sampler, exact for any positive shape.
    #[default]
    MarsagliaTsang,
}

impl fmt::Display for GammaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GammaMethod::Erlang => write!(f, "erlang"),
            GammaMethod::MarsagliaTsang => write!(f, "marsaglia_tsang"),
        }
    }
}

impl FromStr for GammaMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "erlang" => Ok(GammaMethod::Erlang),
            "marsaglia_tsang" | "marsaglia" => Ok(GammaMethod::MarsagliaTsang),
            other => Err(Error::Config(format!("unknown gamma method: {other}"))),
        }
    }
}

/// Configuration knobs of the pricing engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of Variance-Gamma paths per leg. Independent of the Heston
    /// `sims` parameter.
    pub vg_paths: Size,
    /// Base seed for the engine-owned random streams. `None` draws a fresh
    /// seed for every request.
    pub seed: Option<u64>,
    /// Gamma sampler for the Variance-Gamma time change.
    pub gamma_method: GammaMethod,
    /// Paths per independently seeded stream.
    pub batch_size: Size,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vg_paths: DEFAULT_VG_PATHS,
            seed: None,
            gamma_method: GammaMethod::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Settings {
    /// Read settings from `OPTIONPRICER_*` environment variables, using the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_VG_PATHS) {
            settings.vg_paths = parse_var(ENV_VG_PATHS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            settings.seed = Some(parse_var(ENV_SEED, &raw)?);
        }
        if let Some(raw) = lookup(ENV_GAMMA_METHOD) {
            settings.gamma_method = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            settings.batch_size = parse_var(ENV_BATCH_SIZE, &raw)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the path counts are usable.
    pub fn validate(&self) -> Result<()> {
        if self.vg_paths == 0 {
            return Err(Error::Config("vg_paths must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        Ok(())
    }

    /// Same settings with a fixed base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| Error::Config(format!("{key}: {e}")))
}
