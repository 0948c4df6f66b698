use crate::domain::model::{Customer, InternetService, Router, SplynxId, Tariff};
use crate::domain::ports::{ConfigProvider, SplynxApi};
use crate::utils::error::{EtlError, Result};
use base64::engine::general_purpose::STANDARD as Base64Engine;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_PREFIX: &str = "api/2.0";

pub const TARIFFS_PATH: &str = "admin/tariffs/internet";
pub const CUSTOMERS_PATH: &str = "admin/customers/customer";
pub const ROUTERS_PATH: &str = "admin/networking/routers";

pub fn internet_services_path(customer_id: &SplynxId) -> String {
    format!("{}/{}/internet-services", CUSTOMERS_PATH, customer_id)
}

/// `Basic base64(key:secret)`
pub fn basic_auth_header(api_key: &str, api_secret: &str) -> String {
    let credentials = Base64Engine.encode(format!("{}:{}", api_key, api_secret));
    format!("Basic {}", credentials)
}

/// Splynx REST client. 授權標頭在建立時算好一次，之後每個請求共用
#[derive(Debug, Clone)]
pub struct SplynxClient {
    client: Client,
    base_url: String,
}

impl SplynxClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        api_secret: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&basic_auth_header(api_key, api_secret)).map_err(
            |e| EtlError::InvalidConfigValueError {
                field: "splynx.api_key".to_string(),
                value: "<redacted>".to_string(),
                reason: format!("credentials cannot be sent as a header: {}", e),
            },
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C, timeout: Option<Duration>) -> Result<Self> {
        Self::new(
            config.api_url(),
            config.api_key(),
            config.api_secret(),
            timeout,
        )
    }

    pub fn resource_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, path)
    }

    /// GET 一個資源並解析成 JSON 陣列；非 2xx 直接回錯
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.resource_url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| EtlError::SchemaError {
            resource: path.to_string(),
            source,
        })
    }
}

#[async_trait::async_trait]
impl SplynxApi for SplynxClient {
    async fn tariffs(&self) -> Result<Vec<Tariff>> {
        self.get_json(TARIFFS_PATH).await
    }

    async fn customers(&self) -> Result<Vec<Customer>> {
        self.get_json(CUSTOMERS_PATH).await
    }

    async fn routers(&self) -> Result<Vec<Router>> {
        self.get_json(ROUTERS_PATH).await
    }

    async fn internet_services(&self, customer_id: &SplynxId) -> Result<Vec<InternetService>> {
        self.get_json(&internet_services_path(customer_id)).await
    }
}
