//! `[output]` section

use serde::{Deserialize, Serialize};

pub use interview_domain::OutputFormat as FileOutputFormat;

/// How the final report is printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `full` or `json`; `--output` wins when given
    pub format: Option<FileOutputFormat>,
    /// ANSI colors in terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;
    use super::*;

    #[test]
    fn test_json_format_and_no_color() {
        let config: FileConfig = toml::from_str(
            r#"
[output]
format = "json"
color = false
"#,
        )
        .unwrap();
        assert_eq!(config.output.format, Some(FileOutputFormat::Json));
        assert!(!config.output.color);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[output]\nformat = \"synthesis\"\n");
        assert!(result.is_err());
    }
}
