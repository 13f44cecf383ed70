//! Converter configuration.
//!
//! Defaults match the deployed behavior: 50 MiB per file, 20 files per batch,
//! JPEG quality 0.9, and a per-file timeout of 300 s on desktop-class hosts
//! (600 s on mobile, where decoding is slower and type reporting flakier).

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_MAX_BATCH_COUNT: usize = 20;
pub const DEFAULT_JPEG_QUALITY: f64 = 0.9;
pub const DESKTOP_TIMEOUT_SECS: u64 = 300;
pub const MOBILE_TIMEOUT_SECS: u64 = 600;

/// Host platform class. Mobile hosts get a longer per-file timeout and the
/// permissive format-sniffing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Desktop,
    Mobile,
}

impl Platform {
    pub fn default_timeout(self) -> Duration {
        match self {
            Platform::Desktop => Duration::from_secs(DESKTOP_TIMEOUT_SECS),
            Platform::Mobile => Duration::from_secs(MOBILE_TIMEOUT_SECS),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(Platform::Desktop),
            "mobile" => Ok(Platform::Mobile),
            other => bail!("invalid platform class: {}", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub max_file_size_bytes: u64,
    pub max_batch_count: usize,
    pub jpeg_quality: f64,
    pub timeout: Duration,
    pub platform: Platform,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::for_platform(Platform::Desktop)
    }
}

impl ConverterConfig {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_batch_count: DEFAULT_MAX_BATCH_COUNT,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            timeout: platform.default_timeout(),
            platform,
        }
    }

    /// Build from environment variables, falling back to platform defaults.
    ///
    /// Recognized: `HEIC2JPEG_PLATFORM`, `HEIC2JPEG_MAX_FILE_SIZE_BYTES`,
    /// `HEIC2JPEG_MAX_BATCH_COUNT`, `HEIC2JPEG_JPEG_QUALITY`,
    /// `HEIC2JPEG_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let platform = match env::var("HEIC2JPEG_PLATFORM") {
            Ok(v) => v.parse().context("HEIC2JPEG_PLATFORM")?,
            Err(_) => Platform::Desktop,
        };
        let mut config = Self::for_platform(platform);

        if let Ok(v) = env::var("HEIC2JPEG_MAX_FILE_SIZE_BYTES") {
            config.max_file_size_bytes = v.parse().context("HEIC2JPEG_MAX_FILE_SIZE_BYTES")?;
        }
        if let Ok(v) = env::var("HEIC2JPEG_MAX_BATCH_COUNT") {
            config.max_batch_count = v.parse().context("HEIC2JPEG_MAX_BATCH_COUNT")?;
        }
        if let Ok(v) = env::var("HEIC2JPEG_JPEG_QUALITY") {
            config.jpeg_quality = v.parse().context("HEIC2JPEG_JPEG_QUALITY")?;
        }
        if let Ok(v) = env::var("HEIC2JPEG_TIMEOUT_SECONDS") {
            let secs: u64 = v.parse().context("HEIC2JPEG_TIMEOUT_SECONDS")?;
            config.timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_file_size_bytes == 0 {
            bail!("max_file_size_bytes must be greater than zero");
        }
        if self.max_batch_count == 0 {
            bail!("max_batch_count must be greater than zero");
        }
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            bail!(
                "jpeg_quality must be in (0.0, 1.0], got {}",
                self.jpeg_quality
            );
        }
        if self.timeout.is_zero() {
            bail!("timeout must be greater than zero");
        }
        Ok(())
    }
}
