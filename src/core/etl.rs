use crate::core::Pipeline;
use crate::domain::model::RunOutcome;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order. The report is only written
    /// once every lookup has finished.
    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting library analysis");

        tracing::info!("📥 Fetching libraries...");
        let items = self.pipeline.extract().await?;
        tracing::info!("Fetched {} games", items.len());

        tracing::info!("⏱️ Looking up completion times...");
        let report = self.pipeline.transform(items).await?;
        tracing::info!("Ranked {} games", report.entries.len());

        tracing::info!("📝 Writing report...");
        let summary = report.summary.clone();
        let output_path = self.pipeline.load(report).await?;

        Ok(RunOutcome {
            output_path,
            summary,
        })
    }
}
