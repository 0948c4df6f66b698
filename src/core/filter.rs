use crate::domain::model::Circuit;
use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// 依子網路與站點篩選 circuit。ignore 清單優先於 allowed 清單
#[derive(Debug, Clone, Default)]
pub struct CircuitFilter {
    allowed_subnets: Vec<IpNetwork>,
    ignore_subnets: Vec<IpNetwork>,
    exclude_sites: Vec<String>,
}

impl CircuitFilter {
    pub fn new(
        allowed_subnets: Vec<IpNetwork>,
        ignore_subnets: Vec<IpNetwork>,
        exclude_sites: Vec<String>,
    ) -> Self {
        Self {
            allowed_subnets,
            ignore_subnets,
            exclude_sites,
        }
    }

    /// 位址可帶 `/prefix`，只取前半段比對
    pub fn is_in_allowed_subnets(&self, ip: &str) -> bool {
        match parse_host(ip) {
            Some(addr) => self.allowed_subnets.iter().any(|net| net.contains(addr)),
            None => false,
        }
    }

    pub fn is_in_ignored_subnets(&self, ip: &str) -> bool {
        match parse_host(ip) {
            Some(addr) => self.ignore_subnets.iter().any(|net| net.contains(addr)),
            None => false,
        }
    }

    pub fn allows(&self, circuit: &Circuit) -> bool {
        if !circuit.parent_node.is_empty()
            && self.exclude_sites.iter().any(|site| *site == circuit.parent_node)
        {
            return false;
        }

        self.is_in_allowed_subnets(&circuit.ipv4) && !self.is_in_ignored_subnets(&circuit.ipv4)
    }
}

fn parse_host(ip: &str) -> Option<IpAddr> {
    let host = ip.split('/').next().unwrap_or(ip).trim();
    host.parse().ok()
}
