use std::path::Path;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::bucket::{BucketPolicy, DEFAULT_THRESHOLD_SECONDS};
use crate::parser::extract::{ClassMarkers, DurationMode};

pub const DEFAULT_CONFIG_FILE: &str = "course_outline";
pub const ENV_PREFIX: &str = "OUTLINE";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub threshold_seconds: u64,
    pub duration_mode: DurationMode,
    pub bucket_policy: BucketPolicy,
    pub user_agent: String,
    pub file_separator: String,
    pub preview_rows: usize,
    pub markers: ClassMarkers,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            threshold_seconds: DEFAULT_THRESHOLD_SECONDS,
            duration_mode: DurationMode::default(),
            bucket_policy: BucketPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            file_separator: "-".to_string(),
            preview_rows: 5,
            markers: ClassMarkers::default(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file (explicit path required, default path
    /// optional), then `OUTLINE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let builder = Config::builder().add_source(file).add_source(environment());
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .build()
            .context("failed to load settings")?
            .try_deserialize()
            .context("invalid settings")
    }
}

/// `OUTLINE_THRESHOLD_SECONDS` for top-level keys, `OUTLINE_MARKERS__ITEM_TITLE` for nested ones.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{FileFormat, Map};

    fn from_toml(src: &str) -> Settings {
        Settings::from_builder(Config::builder().add_source(File::from_str(src, FileFormat::Toml)))
            .unwrap()
    }

    #[test]
    fn defaults() {
        let s = from_toml("");
        assert_eq!(s, Settings::default());
        assert_eq!(s.threshold_seconds, 3000);
        assert_eq!(s.duration_mode, DurationMode::Strict);
        assert_eq!(s.bucket_policy, BucketPolicy::PerRecordReset);
        assert_eq!(s.file_separator, "-");
    }

    #[test]
    fn overrides() {
        let s = from_toml(
            r#"
            threshold_seconds = 1800
            duration_mode = "lenient"
            bucket_policy = "include_tail"
            file_separator = "_"

            [markers]
            section_title = "sec"
            "#,
        );
        assert_eq!(s.threshold_seconds, 1800);
        assert_eq!(s.duration_mode, DurationMode::Lenient);
        assert_eq!(s.bucket_policy, BucketPolicy::IncludeTail);
        assert_eq!(s.file_separator, "_");
        assert_eq!(s.markers.section_title, "sec");
        // untouched marker keys keep their defaults
        assert_eq!(s.markers.item_title, ClassMarkers::default().item_title);
    }

    fn from_env(vars: &[(&str, &str)]) -> Settings {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_builder(Config::builder().add_source(environment().source(Some(vars))))
            .unwrap()
    }

    #[test]
    fn env_overrides_top_level_keys() {
        let s = from_env(&[
            ("OUTLINE_THRESHOLD_SECONDS", "1800"),
            ("OUTLINE_DURATION_MODE", "lenient"),
            ("OUTLINE_BUCKET_POLICY", "include_tail"),
        ]);
        assert_eq!(s.threshold_seconds, 1800);
        assert_eq!(s.duration_mode, DurationMode::Lenient);
        assert_eq!(s.bucket_policy, BucketPolicy::IncludeTail);
    }

    #[test]
    fn env_overrides_nested_marker() {
        let s = from_env(&[("OUTLINE_MARKERS__ITEM_TITLE", "lecture-title")]);
        assert_eq!(s.markers.item_title, "lecture-title");
        assert_eq!(s.markers.section_title, ClassMarkers::default().section_title);
    }

    #[test]
    fn env_ignores_other_prefixes() {
        let s = from_env(&[("OTHER_THRESHOLD_SECONDS", "10"), ("OUTLINEX_PREVIEW_ROWS", "9")]);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn env_wins_over_file() {
        let vars: Map<String, String> =
            [("OUTLINE_THRESHOLD_SECONDS".to_string(), "600".to_string())].into_iter().collect();
        let s = Settings::from_builder(
            Config::builder()
                .add_source(File::from_str("threshold_seconds = 1200\npreview_rows = 2", FileFormat::Toml))
                .add_source(environment().source(Some(vars))),
        )
        .unwrap();
        assert_eq!(s.threshold_seconds, 600);
        assert_eq!(s.preview_rows, 2);
    }

    #[test]
    fn bad_value_is_an_error() {
        let res = Settings::from_builder(
            Config::builder().add_source(File::from_str(r#"bucket_policy = "sometimes""#, FileFormat::Toml)),
        );
        assert!(res.is_err());
    }

    #[test]
    fn explicit_missing_file_fails() {
        assert!(Settings::load(Some(Path::new("does/not/exist.toml"))).is_err());
    }
}
