use crate::domain::model::{
    Circuit, Customer, InternetService, ReferenceData, Router, SplynxId, Tariff,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Splynx 管理端 API 的唯讀介面
#[async_trait]
pub trait SplynxApi: Send + Sync {
    async fn tariffs(&self) -> Result<Vec<Tariff>>;
    async fn customers(&self) -> Result<Vec<Customer>>;
    async fn routers(&self) -> Result<Vec<Router>>;
    async fn internet_services(&self, customer_id: &SplynxId) -> Result<Vec<InternetService>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn api_secret(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_filename(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ReferenceData>;
    async fn transform(&self, data: ReferenceData) -> Result<Vec<Circuit>>;
    async fn load(&self, circuits: Vec<Circuit>) -> Result<String>;
}
