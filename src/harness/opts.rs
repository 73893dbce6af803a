use std::path::PathBuf;

use crate::{harness::compare::Tolerance, pixel::PixelFormat};

pub const OUTPUT_DIR_ENV: &str = "FRAMECHECK_OUTPUT_DIR";
pub const BLESS_ENV: &str = "FRAMECHECK_BLESS";
pub const MAX_CHANNEL_DIFF_ENV: &str = "FRAMECHECK_MAX_CHANNEL_DIFF";
pub const MAX_MEAN_DIFF_ENV: &str = "FRAMECHECK_MAX_MEAN_DIFF";

/// Where the harness writes outputs, where it looks for references, and how strict it is.
#[derive(Clone, Debug, PartialEq)]
pub struct HarnessOpts {
    /// Directory holding both `<case>.out.png` outputs and `<case>.png` references.
    pub output_dir: PathBuf,
    /// Overrides the per-format tolerance for every case when set.
    pub tolerance: Option<Tolerance>,
    /// Copy each output over its reference before comparing.
    pub bless: bool,
}

impl Default for HarnessOpts {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("target")
                .join("framecheck")
                .join("Media")
                .join("Bitmap"),
            tolerance: None,
            bless: false,
        }
    }
}

impl HarnessOpts {
    /// Defaults overridden by `FRAMECHECK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `FRAMECHECK_*` keys.
    ///
    /// Unparsable values are ignored. Setting only one tolerance knob keeps the other at zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();

        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            opts.output_dir = PathBuf::from(dir);
        }
        opts.bless = lookup(BLESS_ENV).and_then(|v| parse_flag(&v)).unwrap_or(false);

        let max_channel_diff = lookup(MAX_CHANNEL_DIFF_ENV).and_then(|v| v.trim().parse::<u8>().ok());
        let max_mean_diff = lookup(MAX_MEAN_DIFF_ENV)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0);
        if max_channel_diff.is_some() || max_mean_diff.is_some() {
            opts.tolerance = Some(Tolerance {
                max_channel_diff: max_channel_diff.unwrap_or(0),
                max_mean_diff: max_mean_diff.unwrap_or(0.0),
            });
        }
        opts
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_bless(mut self, bless: bool) -> Self {
        self.bless = bless;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// The override if one is set, else [`Tolerance::for_format`].
    pub fn tolerance_for(&self, format: PixelFormat) -> Tolerance {
        self.tolerance
            .unwrap_or_else(|| Tolerance::for_format(format))
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/harness/opts.rs"]
mod tests;
