use serde::{Deserialize, Serialize};

/// Configuration for the users module, read from `modules.users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersConfig {
    /// Path prefix the REST routes are mounted under.
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// Upper bound on the number of records a list call returns.
    #[serde(default = "default_max_list_size")]
    pub max_list_size: u32,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            max_list_size: default_max_list_size(),
        }
    }
}

fn default_base_path() -> String {
    "/api".to_string()
}

fn default_max_list_size() -> u32 {
    1000
}

impl UsersConfig {
    /// Read the module section from the raw `modules` bag; absent means defaults.
    pub fn from_module_value(value: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        match value {
            Some(v) => Ok(serde_json::from_value(v.clone())?),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_yields_defaults() {
        let cfg = UsersConfig::from_module_value(None).unwrap();
        assert_eq!(cfg.base_path, "/api");
        assert_eq!(cfg.max_list_size, 1000);
    }

    #[test]
    fn partial_section_fills_defaults() {
        let v = serde_json::json!({ "max_list_size": 10 });
        let cfg = UsersConfig::from_module_value(Some(&v)).unwrap();
        assert_eq!(cfg.base_path, "/api");
        assert_eq!(cfg.max_list_size, 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let v = serde_json::json!({ "page_size": 10 });
        assert!(UsersConfig::from_module_value(Some(&v)).is_err());
    }
}
