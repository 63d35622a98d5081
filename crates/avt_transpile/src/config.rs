use serde::{Deserialize, Serialize};

/// Key under which front ends persist [`TranspilerConfig`].
pub const CONFIG_STORAGE_KEY: &str = "aiscript-version-transpiler:config";

/// Options for one transpile call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspilerConfig {
    /// Insert or update the leading `/// @ <version>` comment.
    pub set_version_notation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_no_version_notation() {
        assert!(!TranspilerConfig::default().set_version_notation);
    }

    #[test]
    fn json_form_is_camel_case() {
        let config = TranspilerConfig {
            set_version_notation: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"setVersionNotation":true}"#);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: TranspilerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TranspilerConfig::default());
        let config: TranspilerConfig =
            serde_json::from_str(r#"{"setVersionNotation":true,"unknown":1}"#).unwrap();
        assert!(config.set_version_notation);
    }
}
