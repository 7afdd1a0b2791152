#![forbid(unsafe_code)]

//! Engine configuration and its layered resolution.
//!
//! A [`MoverConfig`] is resolved once, at construction, from three sources
//! in order of precedence:
//!
//! 1. explicit arguments handed to the builder,
//! 2. attributes declared on the container element
//!    (`data-mover-targets`, `data-breakpoint-scopes`),
//! 3. defaults.
//!
//! Each source is a [`ConfigLayer`] whose fields are all optional; the first
//! layer that sets a field wins.
//!
//! # Loading
//!
//! ```toml
//! # mover.toml
//! mover_targets = "panel: small up; aside: medium down"
//! breakpoint_scopes = ["down", "up"]
//! ```
//!
//! ```rust,ignore
//! let config = MoverConfig::from_toml_file("mover.toml")?;
//! let layer = ConfigLayer::from_json_str(r#"{"moverTargets": "nav: large"}"#)?;
//! ```

use std::path::Path;

use mover_core::ScopeVocabulary;
use serde::{Deserialize, Serialize};

/// Container attribute carrying the target rules.
pub const ATTR_MOVER_TARGETS: &str = "data-mover-targets";

/// Container attribute carrying the scope vocabulary.
pub const ATTR_BREAKPOINT_SCOPES: &str = "data-breakpoint-scopes";

// ---------------------------------------------------------------------------
// MoverConfig
// ---------------------------------------------------------------------------

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    /// Rule string (`"id: size [scope]; ..."`). `None` means the container is
    /// its own only target and no relocation logic runs.
    #[serde(alias = "moverTargets")]
    pub mover_targets: Option<String>,

    /// Accepted scope names.
    #[serde(alias = "breakpointScopes")]
    pub breakpoint_scopes: Vec<String>,
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            mover_targets: None,
            breakpoint_scopes: ScopeVocabulary::DEFAULT.map(String::from).to_vec(),
        }
    }
}

impl MoverConfig {
    /// Resolve explicit arguments over element-declared attributes over
    /// defaults.
    #[must_use]
    pub fn resolve(explicit: &ConfigLayer, declared: &ConfigLayer) -> Self {
        explicit.clone().or(declared.clone()).apply_to(Self::default())
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check the configuration.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.breakpoint_scopes.is_empty() {
            errors.push("breakpoint_scopes must not be empty".into());
        }
        for (i, scope) in self.breakpoint_scopes.iter().enumerate() {
            if scope.trim().is_empty() {
                errors.push(format!("breakpoint_scopes[{i}] is blank"));
            } else if scope.chars().any(char::is_whitespace) {
                errors.push(format!(
                    "breakpoint_scopes[{i}] `{scope}` contains whitespace and can never match"
                ));
            }
        }

        errors
    }

    /// Like [`validate`](Self::validate), as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The configured scope vocabulary.
    #[must_use]
    pub fn scope_vocabulary(&self) -> ScopeVocabulary {
        ScopeVocabulary::new(self.breakpoint_scopes.iter().cloned())
    }
}

// ---------------------------------------------------------------------------
// ConfigLayer
// ---------------------------------------------------------------------------

/// One configuration source. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    #[serde(alias = "moverTargets", skip_serializing_if = "Option::is_none")]
    pub mover_targets: Option<String>,
    #[serde(alias = "breakpointScopes", skip_serializing_if = "Option::is_none")]
    pub breakpoint_scopes: Option<Vec<String>>,
}

impl ConfigLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mover_targets(mut self, targets: impl Into<String>) -> Self {
        self.mover_targets = Some(targets.into());
        self
    }

    #[must_use]
    pub fn with_breakpoint_scopes<S: Into<String>>(
        mut self,
        scopes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.breakpoint_scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Read the layer declared on an element through an attribute lookup.
    pub fn from_attributes(attribute: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            mover_targets: attribute(ATTR_MOVER_TARGETS),
            breakpoint_scopes: attribute(ATTR_BREAKPOINT_SCOPES)
                .map(|raw| parse_scope_list(&raw)),
        }
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Fields set here win; unset fields come from `lower`.
    #[must_use]
    pub fn or(self, lower: ConfigLayer) -> Self {
        Self {
            mover_targets: self.mover_targets.or(lower.mover_targets),
            breakpoint_scopes: self.breakpoint_scopes.or(lower.breakpoint_scopes),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mover_targets.is_none() && self.breakpoint_scopes.is_none()
    }

    /// Overlay this layer onto a resolved config.
    #[must_use]
    pub fn apply_to(self, mut config: MoverConfig) -> MoverConfig {
        if let Some(targets) = self.mover_targets {
            config.mover_targets = Some(targets);
        }
        if let Some(scopes) = self.breakpoint_scopes {
            config.breakpoint_scopes = scopes;
        }
        config
    }
}

impl From<MoverConfig> for ConfigLayer {
    fn from(config: MoverConfig) -> Self {
        Self {
            mover_targets: config.mover_targets,
            breakpoint_scopes: Some(config.breakpoint_scopes),
        }
    }
}

/// Parse an attribute-declared scope list.
///
/// Accepts a JSON array (`["down","up"]`) or a comma and/or whitespace
/// separated list (`down, up`). A string that looks like a JSON array but
/// does not parse falls back to the separated form.
#[must_use]
pub fn parse_scope_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[')
        && let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed)
    {
        return list;
    }
    trimmed
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|token| token.trim_matches('"').trim_matches('\''))
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or checking a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
