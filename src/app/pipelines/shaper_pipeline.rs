use crate::core::assembler::{assemble_circuits, AssemblyOptions};
use crate::core::emitter::render_csv;
use crate::core::loaders::load_reference_data;
use crate::core::{Circuit, ConfigProvider, Pipeline, ReferenceData, SplynxApi, Storage};
use crate::utils::error::Result;
use std::path::Path;

/// Splynx → ShapedDevices.csv
pub struct ShaperPipeline<S: Storage, A: SplynxApi, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) api: A,
    pub(crate) config: C,
    pub(crate) options: AssemblyOptions,
}

impl<S: Storage, A: SplynxApi, C: ConfigProvider> ShaperPipeline<S, A, C> {
    pub fn new(storage: S, api: A, config: C) -> Self {
        Self {
            storage,
            api,
            config,
            options: AssemblyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AssemblyOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, A: SplynxApi, C: ConfigProvider> Pipeline for ShaperPipeline<S, A, C> {
    async fn extract(&self) -> Result<ReferenceData> {
        tracing::debug!("Fetching reference data from: {}", self.config.api_url());
        load_reference_data(&self.api).await
    }

    async fn transform(&self, data: ReferenceData) -> Result<Vec<Circuit>> {
        assemble_circuits(&self.api, &data, &self.options).await
    }

    async fn load(&self, circuits: Vec<Circuit>) -> Result<String> {
        let filename = self.config.output_filename();
        let output_path = Path::new(self.config.output_path())
            .join(filename)
            .display()
            .to_string();

        // 先在記憶體中產生完整內容，再一次寫入
        let csv_data = render_csv(&circuits)?;
        tracing::debug!("Writing {} bytes to {}", csv_data.len(), output_path);
        self.storage.write_file(filename, &csv_data).await?;

        tracing::info!("📁 Wrote {} circuits to {}", circuits.len(), output_path);
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::ShaperConfig;
    use crate::domain::model::{Customer, InternetService, Router, SplynxId, Tariff};
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockApi {
        routers: Vec<Router>,
    }

    #[async_trait::async_trait]
    impl SplynxApi for MockApi {
        async fn tariffs(&self) -> Result<Vec<Tariff>> {
            Ok(vec![Tariff {
                id: SplynxId::from(1),
                speed_download: 100_000,
                speed_upload: 20_000,
            }])
        }

        async fn customers(&self) -> Result<Vec<Customer>> {
            Ok(vec![Customer {
                id: SplynxId::from(7),
                street_1: "221B Baker St".to_string(),
            }])
        }

        async fn routers(&self) -> Result<Vec<Router>> {
            Ok(self.routers.clone())
        }

        async fn internet_services(&self, _customer_id: &SplynxId) -> Result<Vec<InternetService>> {
            Ok(vec![InternetService {
                id: SplynxId::from(55),
                router_id: SplynxId::from(3),
                tariff_id: SplynxId::from(1),
            }])
        }
    }

    fn config() -> ShaperConfig {
        ShaperConfig::from_toml_str(
            r#"
[splynx]
api_url = "https://splynx.example.net"
api_key = "key"
api_secret = "secret"

[output]
output_path = "./test-output"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_pipeline_stages_produce_shaped_devices() {
        let storage = MockStorage::new();
        let api = MockApi {
            routers: vec![Router {
                id: SplynxId::from(3),
                ip: "10.0.0.3".to_string(),
            }],
        };
        let pipeline = ShaperPipeline::new(storage.clone(), api, config());

        let reference = pipeline.extract().await.unwrap();
        let circuits = pipeline.transform(reference).await.unwrap();
        let output_path = pipeline.load(circuits).await.unwrap();

        assert!(output_path.ends_with("ShapedDevices.csv"));
        let csv = String::from_utf8(storage.get_file("ShapedDevices.csv").await.unwrap()).unwrap();
        assert!(csv.contains(
            "\"55\",\"221B Baker St\",\"3\",\"\",\"\",\"\",\"10.0.0.3\",\"\",\"98\",\"20\",\"100\",\"20\",\"\""
        ));
    }

    #[tokio::test]
    async fn test_missing_router_stops_before_load() {
        let storage = MockStorage::new();
        let pipeline = ShaperPipeline::new(storage.clone(), MockApi { routers: vec![] }, config());

        let reference = pipeline.extract().await.unwrap();
        let err = pipeline.transform(reference).await.unwrap_err();

        assert!(matches!(err, EtlError::MissingRouterError { .. }));
        assert!(storage.get_file("ShapedDevices.csv").await.is_none());
    }
}
