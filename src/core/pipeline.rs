use crate::core::process::{run_tool, ToolInvocation};
use crate::core::scratch::Scratch;
use crate::core::transform::transform_statement;
use crate::core::{ConfigProvider, ParsedData, Pipeline, RawParseResult};
use crate::utils::error::{CasError, Result};

/// Pipeline backed by the `casparser` command line tool.
pub struct CasparserPipeline<C: ConfigProvider> {
    config: C,
}

impl<C: ConfigProvider> CasparserPipeline<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Pipeline for CasparserPipeline<C> {
    async fn extract(&self, document: &[u8], password: &str) -> Result<RawParseResult> {
        // scratch 在此函式結束時 drop，任何路徑都會清理暫存檔
        let scratch = Scratch::create(&self.config.work_dir(), document).await?;
        let transport = self.config.password_transport();

        let invocation = ToolInvocation {
            command: self.config.tool_command(),
            extra_args: self.config.tool_args(),
            input_path: scratch.input_path(),
            output_path: scratch.output_path(),
            password,
            transport: &transport,
            timeout: self.config.tool_timeout(),
        };

        run_tool(&invocation).await?;

        let content = tokio::fs::read_to_string(scratch.output_path())
            .await
            .map_err(|e| {
                tracing::error!("Could not read {}: {}", scratch.output_path().display(), e);
                CasError::data(e.to_string())
            })?;

        let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            tracing::error!("JSON parse error: {}", e);
            CasError::data(e.to_string())
        })?;

        Ok(RawParseResult::from_value(value))
    }

    fn transform(&self, raw: &RawParseResult) -> ParsedData {
        transform_statement(raw)
    }
}
