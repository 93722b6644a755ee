use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SecureVaultError};

/// Project-level configuration, loaded from `.securevault.toml`.
///
/// Every field has a sensible default so SecureVault works
/// out-of-the-box without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) where session and
    /// vault blobs are stored.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Seed the example records into a brand-new vault (first run
    /// only; an existing vault is never touched).
    #[serde(default = "default_seed_sample_records")]
    pub seed_sample_records: bool,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".securevault".to_string()
}

fn default_seed_sample_records() -> bool {
    true
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seed_sample_records: default_seed_sample_records(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".securevault.toml";

    /// Load settings from `<project_dir>/.securevault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SecureVaultError::ConfigError(format!(
                "Failed to parse {}: {e}",
                config_path.display()
            ))
        })?;

        Ok(settings)
    }

    /// Build the full path to the data directory.
    pub fn data_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_dir)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn kdf_params(&self) -> crate::crypto::kdf::KdfParams {
        crate::crypto::kdf::KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.data_dir, ".securevault");
        assert!(s.seed_sample_records);
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.argon2_iterations, 3);
        assert_eq!(s.argon2_parallelism, 4);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, ".securevault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
data_dir = "vaultdata"
seed_sample_records = false
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
"#;
        fs::write(tmp.path().join(".securevault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "vaultdata");
        assert!(!settings.seed_sample_records);
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let config = "data_dir = \"elsewhere\"\n";
        fs::write(tmp.path().join(".securevault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "elsewhere");
        // Rest should be defaults
        assert!(settings.seed_sample_records);
        assert_eq!(settings.argon2_iterations, 3);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".securevault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn data_path_builds_correct_path() {
        let s = Settings::default();
        let project = Path::new("/home/user/myproject");
        assert_eq!(
            s.data_path(project),
            PathBuf::from("/home/user/myproject/.securevault")
        );
    }
}
