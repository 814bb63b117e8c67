//! Runtime configuration: pricing table, checkout simulation and upload limits.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::assets::upload::MAX_UPLOAD_BYTES;
use crate::foundation::error::{StudioError, StudioResult};
use crate::order::checkout::CheckoutConfig;
use crate::order::pricing::PricingConfig;

pub const ENV_CHECKOUT_DELAY_MS: &str = "TEESTUDIO_CHECKOUT_DELAY_MS";
pub const ENV_FAILURE_RATE: &str = "TEESTUDIO_FAILURE_RATE";
pub const ENV_FONTS_DIR: &str = "TEESTUDIO_FONTS_DIR";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted upload, inclusive.
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub pricing: PricingConfig,
    pub checkout: CheckoutConfig,
    pub upload: UploadConfig,
    /// Extra font files for text designs, on top of system fonts.
    pub fonts_dir: Option<PathBuf>,
}

impl StudioConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> StudioResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: StudioConfig = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, or `path` when given, with environment overrides applied on top.
    pub fn resolve(path: Option<&Path>) -> StudioResult<Self> {
        let mut cfg = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `TEESTUDIO_*` overrides looked up through `lookup`.
    ///
    /// Values that do not parse, or that would make the checkout settings invalid, are ignored
    /// and the previous value stays.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(ms) = parse_env::<u64>(&lookup, ENV_CHECKOUT_DELAY_MS) {
            self.checkout.delay_ms = ms;
        }
        if let Some(rate) = parse_env::<f64>(&lookup, ENV_FAILURE_RATE) {
            let candidate = CheckoutConfig {
                failure_rate: rate,
                ..self.checkout
            };
            match candidate.validate() {
                Ok(()) => self.checkout = candidate,
                Err(e) => {
                    tracing::warn!(
                        key = ENV_FAILURE_RATE,
                        error = %e,
                        "ignoring out-of-range environment override"
                    );
                }
            }
        }
        if let Some(dir) = lookup(ENV_FONTS_DIR).filter(|v| !v.trim().is_empty()) {
            self.fonts_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> StudioResult<()> {
        self.pricing.validate()?;
        self.checkout.validate()?;
        if self.upload.max_bytes == 0 {
            return Err(StudioError::validation("upload.max_bytes must be > 0"));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write as _;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"pricing": {{"design_fee": 6.5}}, "checkout": {{"delay_ms": 10}}}}"#
        )
        .unwrap();
        let cfg = StudioConfig::load(f.path()).unwrap();
        assert_eq!(cfg.pricing.design_fee.cents(), 650);
        assert_eq!(cfg.pricing.base_prices.fitted.cents(), 2800);
        assert_eq!(cfg.checkout.delay_ms, 10);
        assert_eq!(cfg.checkout.failure_rate, 0.1);
        assert_eq!(cfg.upload.max_bytes, MAX_UPLOAD_BYTES);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"checkout": {{"failure_rate": 2.0}}}}"#).unwrap();
        assert!(matches!(
            StudioConfig::load(f.path()),
            Err(StudioError::Validation(_))
        ));

        let cfg = StudioConfig {
            upload: UploadConfig { max_bytes: 0 },
            ..StudioConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_serde_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{not json").unwrap();
        assert!(matches!(
            StudioConfig::load(f.path()),
            Err(StudioError::Serde(_))
        ));
    }

    #[test]
    fn env_overrides_apply_and_garbage_is_ignored() {
        let mut cfg = StudioConfig::default();
        cfg.apply_overrides(env(&[
            (ENV_CHECKOUT_DELAY_MS, "0"),
            (ENV_FAILURE_RATE, "lots"),
            (ENV_FONTS_DIR, "/opt/fonts"),
        ]));
        assert_eq!(cfg.checkout.delay_ms, 0);
        assert_eq!(cfg.checkout.failure_rate, 0.1);
        assert_eq!(cfg.fonts_dir.as_deref(), Some(Path::new("/opt/fonts")));
    }

    #[test]
    fn out_of_range_failure_rate_override_keeps_previous_value() {
        let mut cfg = StudioConfig::default();
        cfg.checkout.failure_rate = 0.3;
        for bad in ["2.0", "-0.5", "NaN", "inf"] {
            cfg.apply_overrides(env(&[(ENV_FAILURE_RATE, bad)]));
            assert_eq!(cfg.checkout.failure_rate, 0.3, "override {bad}");
            assert!(cfg.validate().is_ok());
        }
        cfg.apply_overrides(env(&[(ENV_FAILURE_RATE, "1")]));
        assert_eq!(cfg.checkout.failure_rate, 1.0);
    }
}
