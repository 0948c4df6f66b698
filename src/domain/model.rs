use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Splynx 的 id 有時是字串、有時是整數，統一轉成十進位字串
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SplynxId(String);

impl SplynxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SplynxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SplynxId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for SplynxId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for SplynxId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = SplynxId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or string id")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SplynxId, E> {
                Ok(SplynxId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SplynxId, E> {
                Ok(SplynxId(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SplynxId, E> {
                Ok(SplynxId(v.trim().to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// kbps 欄位可能是數字或數字字串
fn deserialize_kbps<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    struct KbpsVisitor;

    impl Visitor<'_> for KbpsVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative speed in kbps")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative speed: {}", v)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                Ok(v as u64)
            } else {
                Err(E::custom(format!("speed is not a whole number: {}", v)))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("speed is not an integer: {:?}", v)))
        }
    }

    deserializer.deserialize_any(KbpsVisitor)
}

/// null 的地址當作空字串，但欄位本身仍是必填
fn deserialize_nullable_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tariff {
    pub id: SplynxId,
    #[serde(deserialize_with = "deserialize_kbps")]
    pub speed_download: u64,
    #[serde(deserialize_with = "deserialize_kbps")]
    pub speed_upload: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: SplynxId,
    #[serde(deserialize_with = "deserialize_nullable_string")]
    pub street_1: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Router {
    pub id: SplynxId,
    pub ip: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InternetService {
    pub id: SplynxId,
    pub router_id: SplynxId,
    pub tariff_id: SplynxId,
}

/// 套餐速率 (Mbps)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TariffSpeed {
    pub download_mbps: u64,
    pub upload_mbps: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TariffTable {
    speeds: HashMap<SplynxId, TariffSpeed>,
}

impl TariffTable {
    pub fn insert(&mut self, id: SplynxId, speed: TariffSpeed) {
        self.speeds.insert(id, speed);
    }

    pub fn get(&self, id: &SplynxId) -> Option<TariffSpeed> {
        self.speeds.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.speeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeds.is_empty()
    }
}

/// 客戶地址表，同時保留 API 回傳的順序
#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    order: Vec<SplynxId>,
    addresses: HashMap<SplynxId, String>,
}

impl CustomerDirectory {
    pub fn insert(&mut self, id: SplynxId, address: String) {
        self.order.push(id.clone());
        self.addresses.insert(id, address);
    }

    pub fn ids(&self) -> &[SplynxId] {
        &self.order
    }

    pub fn address(&self, id: &SplynxId) -> Option<&str> {
        self.addresses.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouterTable {
    ips: HashMap<SplynxId, String>,
}

impl RouterTable {
    pub fn insert(&mut self, id: SplynxId, ip: String) {
        self.ips.insert(id, ip);
    }

    pub fn ip(&self, id: &SplynxId) -> Option<&str> {
        self.ips.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}

/// extract 階段的產出：三張查詢表
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub tariffs: TariffTable,
    pub customers: CustomerDirectory,
    pub routers: RouterTable,
}

/// ShapedDevices.csv 的一列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    pub circuit_id: String,
    pub circuit_name: String,
    pub device_id: String,
    pub device_name: String,
    pub parent_node: String,
    pub mac: String,
    pub ipv4: String,
    pub ipv6: String,
    pub min_download: u64,
    pub min_upload: u64,
    pub max_download: u64,
    pub max_upload: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let service: InternetService =
            serde_json::from_str(r#"{"id": 55, "router_id": "3", "tariff_id": 1}"#).unwrap();
        assert_eq!(service.id, SplynxId::from(55));
        assert_eq!(service.router_id, SplynxId::from("3"));
        assert_eq!(service.tariff_id.as_str(), "1");
    }

    #[test]
    fn test_tariff_speed_accepts_numeric_strings() {
        let tariff: Tariff = serde_json::from_str(
            r#"{"id": "1", "title": "Home 100", "speed_download": "100000", "speed_upload": 20000}"#,
        )
        .unwrap();
        assert_eq!(tariff.speed_download, 100_000);
        assert_eq!(tariff.speed_upload, 20_000);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result = serde_json::from_str::<Customer>(r#"{"id": 7, "name": "Holmes"}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<Router>(r#"{"id": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_street_becomes_empty() {
        let customer: Customer = serde_json::from_str(r#"{"id": 7, "street_1": null}"#).unwrap();
        assert_eq!(customer.street_1, "");
    }

    #[test]
    fn test_customer_directory_keeps_api_order() {
        let mut directory = CustomerDirectory::default();
        directory.insert(SplynxId::from(9), "B".to_string());
        directory.insert(SplynxId::from(2), "A".to_string());

        assert_eq!(directory.ids(), &[SplynxId::from(9), SplynxId::from(2)]);
        assert_eq!(directory.address(&SplynxId::from(2)), Some("A"));
    }
}
