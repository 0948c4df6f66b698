use crate::domain::model::{
    Customer, CustomerDirectory, ReferenceData, Router, RouterTable, Tariff, TariffSpeed,
    TariffTable,
};
use crate::domain::ports::SplynxApi;
use crate::utils::error::Result;

/// kbps → Mbps，四捨六入五成雙
pub fn kbps_to_mbps(kbps: u64) -> u64 {
    (kbps as f64 / 1000.0).round_ties_even() as u64
}

pub fn build_tariff_table(tariffs: Vec<Tariff>) -> TariffTable {
    let mut table = TariffTable::default();
    for tariff in tariffs {
        table.insert(
            tariff.id,
            TariffSpeed {
                download_mbps: kbps_to_mbps(tariff.speed_download),
                upload_mbps: kbps_to_mbps(tariff.speed_upload),
            },
        );
    }
    table
}

pub fn build_customer_directory(customers: Vec<Customer>) -> CustomerDirectory {
    let mut directory = CustomerDirectory::default();
    for customer in customers {
        directory.insert(customer.id, customer.street_1);
    }
    directory
}

pub fn build_router_table(routers: Vec<Router>) -> RouterTable {
    let mut table = RouterTable::default();
    for router in routers {
        table.insert(router.id, router.ip);
    }
    table
}

/// 依序載入三張查詢表，任何一個請求失敗就整體失敗
pub async fn load_reference_data<A: SplynxApi>(api: &A) -> Result<ReferenceData> {
    let tariffs = build_tariff_table(api.tariffs().await?);
    tracing::info!("📋 Loaded {} internet tariffs", tariffs.len());

    let customers = build_customer_directory(api.customers().await?);
    tracing::info!("👥 Loaded {} customers", customers.len());

    let routers = build_router_table(api.routers().await?);
    tracing::info!("🌐 Loaded {} routers", routers.len());

    Ok(ReferenceData {
        tariffs,
        customers,
        routers,
    })
}
