//! Site configuration: discovery and parsing of `site.kdl`

pub mod error;
mod model;
mod parser;

pub use error::{ConfigError, Result};
pub use model::{SiteConfig, WebsiteConfig};
pub use parser::parse_site;

use std::path::{Path, PathBuf};

pub const DEFAULT_STACK: &str = "dev";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Siteflow config directory (`~/.config/siteflow`), created on first use.
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("siteflow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Locate the site.kdl file.
///
/// Search order:
/// 1. `SITEFLOW_CONFIG_PATH` environment variable (direct path)
/// 2. Current directory: `site.local.kdl`, `.site.local.kdl`, `site.kdl`,
///    `.site.kdl`
/// 3. The same candidates under `./.siteflow/`
/// 4. `~/.config/siteflow/site.kdl` (global config)
pub fn find_site_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("SITEFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    let candidates = ["site.local.kdl", ".site.local.kdl", "site.kdl", ".site.kdl"];

    for filename in &candidates {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let site_dir = current_dir.join(".siteflow");
    if site_dir.is_dir() {
        for filename in &candidates {
            let path = site_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("siteflow").join("site.kdl");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::SiteFileNotFound)
}

/// Read and parse a site.kdl file.
pub fn load(path: impl AsRef<Path>) -> Result<SiteConfig> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let document: kdl::KdlDocument = content.parse()?;
    parse_site(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_load_parses_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("site.kdl");
        fs::write(&path, "site \"my-website\" {\n    stack \"prod\"\n}\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.project, "my-website");
        assert_eq!(config.stack, "prod");
    }

    #[test]
    fn test_load_rejects_invalid_kdl() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("site.kdl");
        fs::write(&path, "site \"unterminated").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Kdl(_))));
    }

    #[test]
    #[serial]
    fn test_find_site_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("site.kdl"), "// test").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_site_file();
        assert!(result.is_ok());
        assert!(result.unwrap().ends_with("site.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_site_file_local_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("site.kdl"), "// shared").unwrap();
        fs::write(temp_dir.path().join("site.local.kdl"), "// local").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_site_file().unwrap();
        assert!(result.ends_with("site.local.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_site_file_in_siteflow_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let site_dir = temp_dir.path().join(".siteflow");
        fs::create_dir(&site_dir).unwrap();
        fs::write(site_dir.join("site.kdl"), "// in siteflow dir").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_site_file().unwrap();
        assert!(result.ends_with(".siteflow/site.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_site_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.kdl");
        fs::write(&config_path, "// custom").unwrap();

        unsafe {
            std::env::set_var("SITEFLOW_CONFIG_PATH", config_path.to_str().unwrap());
        }

        let result = find_site_file().unwrap();
        assert_eq!(result, config_path);

        unsafe {
            std::env::remove_var("SITEFLOW_CONFIG_PATH");
        }
    }

    #[test]
    #[serial]
    fn test_find_site_file_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_site_file();
        assert!(matches!(result, Err(ConfigError::SiteFileNotFound)));

        std::env::set_current_dir(original_dir).unwrap();
    }
}
