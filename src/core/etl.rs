use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// extract → transform → load，任何一段失敗就不寫檔
    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting ShapedDevices export...");

        // Extract
        tracing::info!("Loading reference data...");
        let reference = self.pipeline.extract().await?;

        // Transform
        tracing::info!(
            "Assembling circuits for {} customers...",
            reference.customers.len()
        );
        let circuits = self.pipeline.transform(reference).await?;

        // Load
        tracing::info!("Writing {} circuits...", circuits.len());
        let output_path = self.pipeline.load(circuits).await?;

        tracing::info!("Export finished in {:?}", started.elapsed());
        Ok(output_path)
    }
}
