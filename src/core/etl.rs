use crate::core::{ParsedData, Pipeline, StatementParser};
use crate::utils::error::Result;
use std::time::Instant;

pub struct ParseEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ParseEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self, document: &[u8], password: &str) -> Result<ParsedData> {
        let started = Instant::now();
        tracing::info!("Starting statement parse ({} bytes)", document.len());

        // Extract
        let raw = self.pipeline.extract(document, password).await?;
        tracing::debug!(
            "Extracted {} folios",
            raw.folios.as_ref().map(Vec::len).unwrap_or(0)
        );

        // Transform
        let parsed = self.pipeline.transform(&raw);
        tracing::info!(
            "Parsed {} funds with {} transactions in {:?}",
            parsed.funds.len(),
            parsed.transaction_count(),
            started.elapsed()
        );

        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl<P: Pipeline> StatementParser for ParseEngine<P> {
    async fn parse(&self, document: &[u8], password: &str) -> Result<ParsedData> {
        self.run(document, password).await
    }
}
