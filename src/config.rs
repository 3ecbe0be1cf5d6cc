//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/sptoolbelt/sptoolbelt.toml`
//! 3. Local config: `<project_dir>/.sptoolbelt.toml`
//! 4. Environment variables: `SPTOOLBELT_` prefix, `__` between section and key,
//!    e.g. `SPTOOLBELT_TAXONOMY__DUPLICATE_PATHS=last-wins`

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::caml::DEFAULT_VALUE_TYPE;
use crate::domain::{DuplicatePathPolicy, PageContext};

/// CAML rendering defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CamlConfig {
    /// Value type for conditions that do not name one
    pub default_value_type: String,
}

impl Default for CamlConfig {
    fn default() -> Self {
        Self {
            default_value_type: DEFAULT_VALUE_TYPE.into(),
        }
    }
}

/// Taxonomy settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// JSON export of the term store
    pub term_store: Option<PathBuf>,
    /// Handling of terms sharing a full path
    pub duplicate_paths: DuplicatePathPolicy,
}

/// Raw sections for intermediate parsing (`None` → not specified, inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCamlConfig {
    pub default_value_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTaxonomyConfig {
    pub term_store: Option<PathBuf>,
    pub duplicate_paths: Option<DuplicatePathPolicy>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub caml: RawCamlConfig,
    pub taxonomy: RawTaxonomyConfig,
    pub page_context: PageContext,
}

/// Unified configuration for sptoolbelt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub caml: CamlConfig,
    pub taxonomy: TaxonomyConfig,
    /// URLs used for `~site` / `~sitecollection` replacement
    pub page_context: PageContext,
}

/// Get the XDG config directory for sptoolbelt.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sptoolbelt").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("sptoolbelt.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".sptoolbelt.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`; the input is returned unchanged on failure.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Merge overlay config onto self (base). Overlay wins wherever it is specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let base_ctx = &self.page_context;
        let ctx = &overlay.page_context;
        Self {
            caml: CamlConfig {
                default_value_type: overlay
                    .caml
                    .default_value_type
                    .clone()
                    .unwrap_or_else(|| self.caml.default_value_type.clone()),
            },
            taxonomy: TaxonomyConfig {
                term_store: overlay
                    .taxonomy
                    .term_store
                    .clone()
                    .or_else(|| self.taxonomy.term_store.clone()),
                duplicate_paths: overlay
                    .taxonomy
                    .duplicate_paths
                    .unwrap_or(self.taxonomy.duplicate_paths),
            },
            page_context: PageContext {
                site_absolute_url: ctx
                    .site_absolute_url
                    .clone()
                    .or_else(|| base_ctx.site_absolute_url.clone()),
                site_server_relative_url: ctx
                    .site_server_relative_url
                    .clone()
                    .or_else(|| base_ctx.site_server_relative_url.clone()),
                web_absolute_url: ctx
                    .web_absolute_url
                    .clone()
                    .or_else(|| base_ctx.web_absolute_url.clone()),
                web_server_relative_url: ctx
                    .web_server_relative_url
                    .clone()
                    .or_else(|| base_ctx.web_server_relative_url.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.sptoolbelt.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Load a single file on top of the defaults, without global config or env vars.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let mut settings = Self::default().merge_with(&raw);
        settings.expand_paths();
        Ok(settings)
    }

    /// Apply SPTOOLBELT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SPTOOLBELT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("caml.default_value_type") {
            settings.caml.default_value_type = val;
        }
        if let Ok(val) = config.get_string("taxonomy.term_store") {
            settings.taxonomy.term_store = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("taxonomy.duplicate_paths") {
            settings.taxonomy.duplicate_paths = val.parse()?;
        }
        let ctx = &mut settings.page_context;
        for (key, slot) in [
            ("page_context.site_absolute_url", &mut ctx.site_absolute_url),
            (
                "page_context.site_server_relative_url",
                &mut ctx.site_server_relative_url,
            ),
            ("page_context.web_absolute_url", &mut ctx.web_absolute_url),
            (
                "page_context.web_server_relative_url",
                &mut ctx.web_server_relative_url,
            ),
        ] {
            if let Ok(val) = config.get_string(key) {
                *slot = Some(val);
            }
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(store) = &self.taxonomy.term_store {
            self.taxonomy.term_store = Some(expand_path(store));
        }
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_text_value_type_and_first_wins() {
        let settings = Settings::default();
        assert_eq!(settings.caml.default_value_type, "Text");
        assert_eq!(
            settings.taxonomy.duplicate_paths,
            DuplicatePathPolicy::FirstWins
        );
        assert!(settings.page_context.web_absolute_url.is_none());
    }

    #[test]
    fn given_overlay_with_empty_url_when_merging_then_keeps_empty_string() {
        let overlay: RawSettings = toml::from_str(
            r#"
[page_context]
site_server_relative_url = ""
"#,
        )
        .unwrap();

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(
            merged.page_context.site_server_relative_url.as_deref(),
            Some("")
        );
        assert!(merged.page_context.site_absolute_url.is_none());
    }
}
