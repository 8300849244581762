//! Configuration loading.
//!
//! Built-in defaults, merged with an optional TOML file, then overridden
//! by `ARCHIVER_*` environment variables, then validated. Relative paths
//! in the file are resolved against `work_dir`, which itself defaults to
//! the current directory.

use crate::archive::compress::{DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH};
use crate::strings::Strings;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    /// Base directory all relative paths (and report-relative display
    /// paths) hang off.
    pub work_dir: PathBuf,
    /// Per-ticket inbox folders live under here, one folder per ticket id.
    pub inbox_dir: PathBuf,
    /// Long-term archive directory for the `<date>_<NN>_<label>_<id>.pdf`
    /// naming convention.
    pub receipts_dir: PathBuf,
    /// Parent for run-private scratch directories.
    pub temp_dir: PathBuf,
    pub logo_path: Option<PathBuf>,
    /// Cover template override; the embedded default is used when unset.
    pub template_path: Option<PathBuf>,
    /// Typst compiler; falls back to a PATH lookup when unset.
    pub typst_bin: Option<PathBuf>,
    /// Fallback label when nothing useful can be inferred from a subject.
    pub default_label: String,
    pub max_width: u32,
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub archive: ArchiveSettings,
    pub strings: Strings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialArchiveSettings {
    work_dir: Option<PathBuf>,
    inbox_dir: Option<PathBuf>,
    receipts_dir: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
    logo_path: Option<PathBuf>,
    template_path: Option<PathBuf>,
    typst_bin: Option<PathBuf>,
    default_label: Option<String>,
    max_width: Option<u32>,
    jpeg_quality: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    #[serde(default)]
    archive: PartialArchiveSettings,
    #[serde(default)]
    strings: Strings,
}

fn env_or_path(var: &str, fallback: Option<PathBuf>) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => fallback,
    }
}

fn env_or_u32(var: &str, fallback: u32) -> u32 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u32>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u8(var: &str, fallback: u8) -> u8 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u8>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn validate(settings: &ArchiveSettings) -> Result<()> {
    if settings.max_width == 0 {
        return Err(anyhow!("invalid max width: must be >= 1 pixel"));
    }
    if settings.jpeg_quality == 0 || settings.jpeg_quality > 100 {
        return Err(anyhow!("invalid jpeg quality: use 1..=100"));
    }
    if settings.default_label.trim().is_empty() {
        return Err(anyhow!("invalid default label: cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(custom) = env::var("ARCHIVER_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let home = dirs::home_dir()?;
    Some(home.join(".config/helpdesk-archiver/config.toml"))
}

fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { base.join(path) }
}

/// Load configuration, merging file values over built-in defaults and
/// environment overrides over both.
///
/// A missing explicitly-requested file is an error; a missing default
/// config path just means "use the defaults".
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    let mut partial = PartialConfig::default();

    if let Some(path) = resolve_config_path(explicit_path) {
        if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            partial = toml::from_str(&raw)
                .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
        } else if explicit_path.is_some() {
            return Err(anyhow!("config file not found: {}", path.display()));
        }
    }

    let file = partial.archive;
    let work_dir = env_or_path("ARCHIVER_WORK_DIR", file.work_dir)
        .map(|p| resolve_against(&env::current_dir().unwrap_or_default(), p))
        .unwrap_or(env::current_dir().context("current directory unavailable")?);

    let inbox_dir = env_or_path("ARCHIVER_INBOX_DIR", file.inbox_dir)
        .unwrap_or_else(|| PathBuf::from("inbox"));
    let receipts_dir = env_or_path("ARCHIVER_RECEIPTS_DIR", file.receipts_dir)
        .unwrap_or_else(|| PathBuf::from("receipts"));
    let temp_dir =
        env_or_path("ARCHIVER_TEMP_DIR", file.temp_dir).unwrap_or_else(|| PathBuf::from(".tmp"));

    let settings = ArchiveSettings {
        inbox_dir: resolve_against(&work_dir, inbox_dir),
        receipts_dir: resolve_against(&work_dir, receipts_dir),
        temp_dir: resolve_against(&work_dir, temp_dir),
        logo_path: env_or_path("ARCHIVER_LOGO_PATH", file.logo_path)
            .map(|p| resolve_against(&work_dir, p)),
        template_path: env_or_path("ARCHIVER_TEMPLATE_PATH", file.template_path)
            .map(|p| resolve_against(&work_dir, p)),
        typst_bin: env_or_path("TYPST_BIN", file.typst_bin),
        default_label: env_or_string(
            "ARCHIVER_DEFAULT_LABEL",
            file.default_label.as_deref().unwrap_or("expense"),
        ),
        max_width: env_or_u32("ARCHIVER_MAX_WIDTH", file.max_width.unwrap_or(DEFAULT_MAX_WIDTH)),
        jpeg_quality: env_or_u8(
            "ARCHIVER_JPEG_QUALITY",
            file.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY),
        ),
        work_dir,
    };

    validate(&settings)?;
    Ok(AppConfig {
        archive: settings,
        strings: partial.strings,
    })
}
