pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "ecas-etl")]
#[command(about = "HTTP service that parses CAS statements through casparser")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:3000
    #[arg(long)]
    pub bind: Option<String>,

    /// casparser executable
    #[arg(long)]
    pub tool: Option<String>,

    #[arg(long, help = "Seconds before a casparser run is killed")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Directory for per-request scratch files")]
    pub work_dir: Option<String>,

    #[arg(long, help = "Directory served as static files")]
    pub static_dir: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入 TOML (若有指定) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// 解析並驗證，日誌初始化前呼叫
    pub fn load(&self) -> Result<TomlConfig> {
        let config = self.resolve()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(tool) = &self.tool {
            config.tool.command = tool.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.tool.timeout_seconds = timeout;
        }
        if let Some(work_dir) = &self.work_dir {
            config.tool.work_dir = work_dir.clone();
        }
        if let Some(static_dir) = &self.static_dir {
            config.server.static_dir = static_dir.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nbind = \"127.0.0.1:9000\"\n\n[tool]\ntimeout_seconds = 10\n")
            .unwrap();

        let cli = CliConfig::parse_from([
            "ecas-etl",
            "--config",
            file.path().to_str().unwrap(),
            "--timeout-secs",
            "45",
            "--tool",
            "/usr/local/bin/casparser",
            "--json-logs",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.tool.timeout_seconds, 45);
        assert_eq!(config.tool.command, "/usr/local/bin/casparser");
        assert!(config.logging.json);
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let cli = CliConfig::parse_from(["ecas-etl", "--bind", "127.0.0.1:0"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:0");
        assert_eq!(config.tool.command, "casparser");
    }

    #[test]
    fn test_load_rejects_invalid_logging_level() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[logging]\nlevel = \"loud\"\n").unwrap();

        let cli = CliConfig {
            config: Some(file.path().display().to_string()),
            ..Default::default()
        };

        assert!(cli.resolve().is_ok());
        assert!(matches!(
            cli.load(),
            Err(crate::utils::error::CasError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig {
            config: Some("/definitely/missing/ecas.toml".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            cli.resolve(),
            Err(crate::utils::error::CasError::IoError(_))
        ));
    }
}
