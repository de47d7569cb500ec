//! Configuration loading for report-tables

mod schema;

pub use schema::Config;

use crate::dates::is_valid_date_format;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".report-tables.json";

/// Find and load config file with extends resolution. Searches `work_dir` then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    let config = match path {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            load_config_with_extends(&path, &mut HashSet::new())?
        }
        None => Config::default(),
    };
    validate(&config)?;
    Ok(config)
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference relative to the referencing config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .report-tables.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Reject values that would break rendering
fn validate(config: &Config) -> Result<()> {
    if let Some(format) = &config.date_format {
        if !is_valid_date_format(format) {
            anyhow::bail!("Invalid dateFormat in config: {:?}", format);
        }
    }
    if config.show_more_increment == Some(0) {
        anyhow::bail!("showMoreIncrement must be at least 1");
    }
    Ok(())
}

/// Write the starter config into `dir`. Returns `None` if one already exists.
pub fn write_starter_config(dir: &Path) -> Result<Option<PathBuf>> {
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Ok(None);
    }
    let json = serde_json::to_string_pretty(&Config::starter())
        .context("Failed to serialize starter config")?;
    fs::write(&config_path, json + "\n")
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(Some(config_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableType;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_missing_config_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        // A config higher up the real filesystem would leak in, so only check the search itself
        assert_eq!(find_config_in_parents(&nested).filter(|p| p.starts_with(dir.path())), None);
    }

    #[test]
    fn test_config_found_in_parent_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), CONFIG_FILENAME, r#"{"charLimit": 30}"#);
        let nested = dir.path().join("reports/2024");
        fs::create_dir_all(&nested).unwrap();
        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.char_limit, Some(30));
    }

    #[test]
    fn test_config_extends() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "base.json",
            r#"{
                "charLimit": 40,
                "maxListEntries": 5,
                "titles": { "caps": "CA Policies", "riskyApps": "Apps" }
            }"#,
        );
        write(
            dir.path(),
            CONFIG_FILENAME,
            r#"{
                "extends": "./base",
                "charLimit": 80,
                "titles": { "riskyApps": "Risky Apps" }
            }"#,
        );

        let config = load_config(dir.path(), None).unwrap();

        // Child value overrides base
        assert_eq!(config.char_limit, Some(80));
        // Base value is inherited
        assert_eq!(config.max_list_entries, Some(5));
        assert_eq!(config.titles["caps"], "CA Policies");
        assert_eq!(config.titles["riskyApps"], "Risky Apps");
    }

    #[test]
    fn test_circular_extends_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"extends": "./b.json"}"#);
        write(dir.path(), "b.json", r#"{"extends": "./a.json"}"#);
        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Circular extends"));
    }

    #[test]
    fn test_custom_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "fmt.json", r#"{"dateFormat": "%Q"}"#);
        assert!(load_config(dir.path(), Some(Path::new("fmt.json"))).is_err());
        write(dir.path(), "inc.json", r#"{"showMoreIncrement": 0}"#);
        assert!(load_config(dir.path(), Some(Path::new("inc.json"))).is_err());
    }

    #[test]
    fn test_merge_with_cli_and_page_options() {
        let config: Config = serde_json::from_str(
            r#"{"charLimit": 40, "dateFormat": "%Y", "titles": {"caps": "Policies", "bogus": "x"}}"#,
        )
        .unwrap();
        let config = config.merge_with_cli(Some(true), Some(10));
        let options = config.page_options(Utc.timestamp_millis_opt(0).unwrap());
        assert_eq!(options.ctx.char_limit, 10);
        assert_eq!(options.ctx.date_format, "%Y");
        assert_eq!(options.dark_mode, Some(true));
        assert_eq!(options.max_list_entries, 20);
        assert_eq!(options.titles.len(), 1);
        assert_eq!(options.titles[&TableType::Caps], "Policies");
    }

    #[test]
    fn test_cli_light_mode_overrides_config_dark_mode() {
        let config: Config = serde_json::from_str(r#"{"darkMode": true}"#).unwrap();
        let now = Utc.timestamp_millis_opt(0).unwrap();
        let kept = config.clone().merge_with_cli(None, None);
        assert_eq!(kept.page_options(now).dark_mode, Some(true));
        let light = config.merge_with_cli(Some(false), None);
        assert_eq!(light.page_options(now).dark_mode, Some(false));
    }

    #[test]
    fn test_starter_config_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = write_starter_config(dir.path()).unwrap().unwrap();
        let loaded = load_config(dir.path(), Some(&path)).unwrap();
        assert_eq!(loaded, Config::starter());
        assert!(write_starter_config(dir.path()).unwrap().is_none());
    }
}
