use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

/// How model and target are brought into a common frame before computing ligand RMSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuperpositionMode {
    /// Superpose on the matched binding-site atoms of a representation, then measure the
    /// ligand without refitting.
    #[default]
    BindingSite,
    /// Superpose each candidate atom mapping of the ligand itself.
    Ligand,
    /// Use raw coordinates.
    None,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Binding-site radius around target ligand atoms (Angstroms).
    pub radius: f64,
    /// Contact radius for lDDT-PLI (Angstroms).
    pub lddt_pli_radius: f64,
    /// Inclusion radius for binding-site lDDT, used to rank chain mappings (Angstroms).
    pub lddt_bs_radius: f64,
    /// Maximum number of representations scored per target ligand.
    pub topn: usize,
    /// Maximum number of isomorphisms enumerated per ligand pair.
    pub max_symmetries: usize,
    pub superposition: SuperpositionMode,
    pub resnum_alignments: bool,
    pub ignore_hydrogens: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            lddt_pli_radius: 6.0,
            lddt_bs_radius: 10.0,
            topn: 100_000,
            max_symmetries: 100_000,
            superposition: SuperpositionMode::BindingSite,
            resnum_alignments: false,
            ignore_hydrogens: true,
        }
    }
}

impl ScoringConfig {
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::new()
    }

    /// Loads a configuration from a TOML file. Absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let path_str = || path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path_str(),
            source: e,
        })?;
        let config: ScoringConfig = toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
            path: path_str(),
            source: e,
        })?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path_str(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigLoadError> {
        let config: ScoringConfig = toml::from_str(content).map_err(|e| ConfigLoadError::Toml {
            path: "<string>".to_string(),
            source: e,
        })?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: "<string>".to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_radius("radius", self.radius)?;
        check_radius("lddt_pli_radius", self.lddt_pli_radius)?;
        check_radius("lddt_bs_radius", self.lddt_bs_radius)?;
        if self.topn == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "topn",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_symmetries == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_symmetries",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn check_radius(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("expected a positive distance, got {value}"),
        })
    }
}

#[derive(Default)]
pub struct ScoringConfigBuilder {
    radius: Option<f64>,
    lddt_pli_radius: Option<f64>,
    lddt_bs_radius: Option<f64>,
    topn: Option<usize>,
    max_symmetries: Option<usize>,
    superposition: Option<SuperpositionMode>,
    resnum_alignments: Option<bool>,
    ignore_hydrogens: Option<bool>,
}

impl ScoringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }
    pub fn lddt_pli_radius(mut self, radius: f64) -> Self {
        self.lddt_pli_radius = Some(radius);
        self
    }
    pub fn lddt_bs_radius(mut self, radius: f64) -> Self {
        self.lddt_bs_radius = Some(radius);
        self
    }
    pub fn topn(mut self, n: usize) -> Self {
        self.topn = Some(n);
        self
    }
    pub fn max_symmetries(mut self, n: usize) -> Self {
        self.max_symmetries = Some(n);
        self
    }
    pub fn superposition(mut self, mode: SuperpositionMode) -> Self {
        self.superposition = Some(mode);
        self
    }
    pub fn resnum_alignments(mut self, enabled: bool) -> Self {
        self.resnum_alignments = Some(enabled);
        self
    }
    pub fn ignore_hydrogens(mut self, enabled: bool) -> Self {
        self.ignore_hydrogens = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let defaults = ScoringConfig::default();
        let config = ScoringConfig {
            radius: self.radius.unwrap_or(defaults.radius),
            lddt_pli_radius: self.lddt_pli_radius.unwrap_or(defaults.lddt_pli_radius),
            lddt_bs_radius: self.lddt_bs_radius.unwrap_or(defaults.lddt_bs_radius),
            topn: self.topn.unwrap_or(defaults.topn),
            max_symmetries: self.max_symmetries.unwrap_or(defaults.max_symmetries),
            superposition: self.superposition.unwrap_or(defaults.superposition),
            resnum_alignments: self.resnum_alignments.unwrap_or(defaults.resnum_alignments),
            ignore_hydrogens: self.ignore_hydrogens.unwrap_or(defaults.ignore_hydrogens),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builder_without_overrides_matches_defaults() {
        let config = ScoringConfig::builder().build().unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(config.radius, 4.0);
        assert_eq!(config.lddt_pli_radius, 6.0);
        assert_eq!(config.lddt_bs_radius, 10.0);
        assert_eq!(config.topn, 100_000);
        assert_eq!(config.max_symmetries, 100_000);
        assert_eq!(config.superposition, SuperpositionMode::BindingSite);
        assert!(!config.resnum_alignments);
        assert!(config.ignore_hydrogens);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = ScoringConfigBuilder::new()
            .radius(5.0)
            .topn(3)
            .superposition(SuperpositionMode::Ligand)
            .resnum_alignments(true)
            .ignore_hydrogens(false)
            .build()
            .unwrap();
        assert_eq!(config.radius, 5.0);
        assert_eq!(config.topn, 3);
        assert_eq!(config.superposition, SuperpositionMode::Ligand);
        assert!(config.resnum_alignments);
        assert!(!config.ignore_hydrogens);
    }

    #[test]
    fn builder_rejects_non_positive_radius() {
        let result = ScoringConfigBuilder::new().radius(-1.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "radius", .. })
        ));
        let result = ScoringConfigBuilder::new().lddt_pli_radius(f64::NAN).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "lddt_pli_radius",
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_zero_limits() {
        assert!(ScoringConfigBuilder::new().topn(0).build().is_err());
        assert!(ScoringConfigBuilder::new().max_symmetries(0).build().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ScoringConfig::from_toml_str(
            r#"radius = 5.5
            superposition = "none""#,
        )
        .unwrap();
        assert_eq!(config.radius, 5.5);
        assert_eq!(config.superposition, SuperpositionMode::None);
        assert_eq!(config.topn, 100_000);
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        let result = ScoringConfig::from_toml_str("radius = 4.0\nunknown_key = 1");
        assert!(matches!(result, Err(ConfigLoadError::Toml { .. })));
    }

    #[test]
    fn invalid_toml_values_are_rejected() {
        let result = ScoringConfig::from_toml_str("max_symmetries = 0");
        assert!(matches!(result, Err(ConfigLoadError::Invalid { .. })));
    }

    #[test]
    fn load_succeeds_with_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("scoring.toml");
        fs::write(
            &file_path,
            r#"lddt_pli_radius = 8.0
            superposition = "binding-site"
            resnum_alignments = true"#,
        )
        .unwrap();

        let config = ScoringConfig::load(&file_path).unwrap();
        assert_eq!(config.lddt_pli_radius, 8.0);
        assert_eq!(config.superposition, SuperpositionMode::BindingSite);
        assert!(config.resnum_alignments);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = ScoringConfig::load(&dir.path().join("non_existent.toml"));
        assert!(matches!(result, Err(ConfigLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("malformed.toml");
        fs::write(&file_path, "this is not toml").unwrap();
        let result = ScoringConfig::load(&file_path);
        assert!(matches!(result, Err(ConfigLoadError::Toml { .. })));
    }
}
