use crate::core::{ConfigProvider, PasswordTransport};
use crate::utils::error::{CasError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub tool: ToolConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub static_dir: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub command: String,
    pub extra_args: Vec<String>,
    pub timeout_seconds: u64,
    /// Empty means the system temp directory.
    pub work_dir: String,
    pub password_transport: PasswordTransportKind,
    pub password_env_var: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordTransportKind {
    Argument,
    Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            static_dir: "public".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: "casparser".to_string(),
            extra_args: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            work_dir: String::new(),
            password_transport: PasswordTransportKind::Argument,
            password_env_var: "CASPARSER_PASSWORD".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CasError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CasError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CASPARSER_BIN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CasError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        validation::validate_path("server.static_dir", &self.server.static_dir)?;
        validation::validate_positive_number(
            "server.max_upload_bytes",
            self.server.max_upload_bytes,
            1,
        )?;

        validation::validate_non_empty_string("tool.command", &self.tool.command)?;
        validation::validate_range("tool.timeout_seconds", self.tool.timeout_seconds, 1, 3600)?;
        if !self.tool.work_dir.is_empty() {
            validation::validate_path("tool.work_dir", &self.tool.work_dir)?;
        }
        if self.tool.password_transport == PasswordTransportKind::Environment {
            validation::validate_non_empty_string(
                "tool.password_env_var",
                &self.tool.password_env_var,
            )?;
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(CasError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> &str {
        &self.server.bind
    }

    pub fn static_dir(&self) -> &str {
        &self.server.static_dir
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_bytes
    }
}

impl ConfigProvider for TomlConfig {
    fn tool_command(&self) -> &str {
        &self.tool.command
    }

    fn tool_args(&self) -> &[String] {
        &self.tool.extra_args
    }

    fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool.timeout_seconds)
    }

    fn work_dir(&self) -> PathBuf {
        if self.tool.work_dir.is_empty() {
            std::env::temp_dir()
        } else {
            PathBuf::from(&self.tool.work_dir)
        }
    }

    fn password_transport(&self) -> PasswordTransport {
        match self.tool.password_transport {
            PasswordTransportKind::Argument => PasswordTransport::Argument,
            PasswordTransportKind::Environment => {
                PasswordTransport::Environment(self.tool.password_env_var.clone())
            }
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
