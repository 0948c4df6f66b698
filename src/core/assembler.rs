use crate::core::filter::CircuitFilter;
use crate::domain::model::{Circuit, InternetService, ReferenceData, SplynxId};
use crate::domain::ports::SplynxApi;
use crate::utils::error::{EtlError, Result};

/// 最低保證頻寬 = 上限的 98%
pub const MIN_RATE_RATIO: f64 = 0.98;

pub fn min_rate(max_mbps: u64) -> u64 {
    (max_mbps as f64 * MIN_RATE_RATIO).round_ties_even() as u64
}

pub fn apply_overhead(mbps: u64, factor: f64) -> u64 {
    (mbps as f64 * factor).round_ties_even() as u64
}

#[derive(Debug, Clone)]
pub struct AssemblyOptions {
    pub bandwidth_overhead_factor: f64,
    /// None 表示不篩選，每個 service 都輸出
    pub filter: Option<CircuitFilter>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            bandwidth_overhead_factor: 1.0,
            filter: None,
        }
    }
}

/// 把一個 service 和三張查詢表 join 成一筆 circuit，找不到 router 或 tariff 就失敗
pub fn build_circuit(
    service: &InternetService,
    circuit_name: &str,
    reference: &ReferenceData,
    bandwidth_overhead_factor: f64,
) -> Result<Circuit> {
    let ipv4 = reference
        .routers
        .ip(&service.router_id)
        .ok_or_else(|| EtlError::MissingRouterError {
            service_id: service.id.to_string(),
            router_id: service.router_id.to_string(),
        })?;

    let speed = reference
        .tariffs
        .get(&service.tariff_id)
        .ok_or_else(|| EtlError::MissingTariffError {
            service_id: service.id.to_string(),
            tariff_id: service.tariff_id.to_string(),
        })?;

    let max_download = apply_overhead(speed.download_mbps, bandwidth_overhead_factor);
    let max_upload = apply_overhead(speed.upload_mbps, bandwidth_overhead_factor);

    Ok(Circuit {
        circuit_id: service.id.to_string(),
        circuit_name: circuit_name.to_string(),
        device_id: service.router_id.to_string(),
        device_name: String::new(),
        parent_node: String::new(),
        mac: String::new(),
        ipv4: ipv4.to_string(),
        ipv6: String::new(),
        min_download: min_rate(max_download),
        min_upload: min_rate(max_upload),
        max_download,
        max_upload,
    })
}

pub fn build_customer_circuits(
    customer_id: &SplynxId,
    services: &[InternetService],
    reference: &ReferenceData,
    options: &AssemblyOptions,
) -> Result<Vec<Circuit>> {
    let address = reference.customers.address(customer_id).ok_or_else(|| {
        EtlError::MissingCustomerError {
            customer_id: customer_id.to_string(),
        }
    })?;

    let mut circuits = Vec::with_capacity(services.len());
    for service in services {
        let circuit = build_circuit(service, address, reference, options.bandwidth_overhead_factor)?;

        if let Some(filter) = &options.filter {
            if !filter.allows(&circuit) {
                tracing::warn!(
                    "⏭️ Skipping circuit {} ({}): outside allowed subnets",
                    circuit.circuit_id,
                    circuit.ipv4
                );
                continue;
            }
        }

        circuits.push(circuit);
    }

    Ok(circuits)
}

/// 逐一客戶抓 internet services 並組成 circuit。順序：客戶依 API 順序，其下 service 依 API 順序
pub async fn assemble_circuits<A: SplynxApi>(
    api: &A,
    reference: &ReferenceData,
    options: &AssemblyOptions,
) -> Result<Vec<Circuit>> {
    let mut circuits = Vec::new();

    for customer_id in reference.customers.ids() {
        let services = api.internet_services(customer_id).await?;
        tracing::debug!(
            "Customer {} has {} internet services",
            customer_id,
            services.len()
        );

        circuits.extend(build_customer_circuits(
            customer_id,
            &services,
            reference,
            options,
        )?);
    }

    tracing::info!(
        "🔗 Assembled {} circuits from {} customers",
        circuits.len(),
        reference.customers.len()
    );
    Ok(circuits)
}
