use crate::domain::model::Circuit;
use crate::utils::error::{EtlError, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

pub const DEFAULT_OUTPUT_FILENAME: &str = "ShapedDevices.csv";

pub const CSV_HEADER: [&str; 13] = [
    "Circuit ID",
    "Circuit Name",
    "Device ID",
    "Device Name",
    "Parent Node",
    "MAC",
    "IPv4",
    "IPv6",
    "Download Min",
    "Upload Min",
    "Download Max",
    "Upload Max",
    "Comment",
];

fn circuit_record(circuit: &Circuit) -> [String; 13] {
    [
        circuit.circuit_id.clone(),
        circuit.circuit_name.clone(),
        circuit.device_id.clone(),
        circuit.device_name.clone(),
        circuit.parent_node.clone(),
        circuit.mac.clone(),
        circuit.ipv4.clone(),
        circuit.ipv6.clone(),
        circuit.min_download.to_string(),
        circuit.min_upload.to_string(),
        circuit.max_download.to_string(),
        circuit.max_upload.to_string(),
        // Comment 欄位永遠留空
        String::new(),
    ]
}

/// 產生完整的 CSV 內容：固定表頭 + 每個 circuit 一列，所有欄位都加引號
pub fn render_csv(circuits: &[Circuit]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for circuit in circuits {
        writer.write_record(circuit_record(circuit))?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}
