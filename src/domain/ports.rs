use crate::domain::model::ParsedData;
use crate::domain::raw::RawParseResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// How the statement password reaches the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordTransport {
    /// `-p <password>` on the command line, visible in process listings.
    Argument,
    /// Exported to the child only, under the given variable name.
    Environment(String),
}

pub trait ConfigProvider: Send + Sync {
    fn tool_command(&self) -> &str;
    fn tool_args(&self) -> &[String];
    fn tool_timeout(&self) -> Duration;
    fn work_dir(&self) -> PathBuf;
    fn password_transport(&self) -> PasswordTransport;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, document: &[u8], password: &str) -> Result<RawParseResult>;
    fn transform(&self, raw: &RawParseResult) -> ParsedData;
}

/// What the HTTP layer depends on.
#[async_trait]
pub trait StatementParser: Send + Sync {
    async fn parse(&self, document: &[u8], password: &str) -> Result<ParsedData>;
}
