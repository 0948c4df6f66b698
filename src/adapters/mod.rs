// Adapters layer: concrete implementations for external systems (Splynx HTTP API, local files).

pub mod http;
pub mod storage;
