use log::{debug, info, warn};
use std::collections::HashMap;

/// 名前解決がどこで成立したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Records,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub address: String,
    pub source: LookupSource,
}

/// 静的レコード + 無期限キャッシュのDNS
///
/// レコードは生成時に固定されるため、キャッシュの値は常にレコードと一致する。
/// 失効は行わない。
#[derive(Debug)]
pub struct DnsResolver {
    records: HashMap<String, String>,
    cache: HashMap<String, String>,
    lookup_count: u64,
}

impl DnsResolver {
    pub fn new() -> Self {
        Self::with_records([
            ("google.com", "192.168.1.1"),
            ("bank.com", "192.168.1.2"),
            ("email.com", "192.168.1.3"),
            ("cloud.com", "192.168.1.4"),
            ("youtube.com", "192.168.1.5"),
            ("github.com", "192.168.1.6"),
            ("facebook.com", "192.168.1.7"),
            ("twitter.com", "192.168.1.8"),
            ("localhost", "127.0.0.1"),
        ])
    }

    pub fn with_records<I, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(domain, address)| (domain.into(), address.into()))
                .collect(),
            cache: HashMap::new(),
            lookup_count: 0,
        }
    }

    pub fn resolve(&mut self, domain: &str) -> Option<Resolution> {
        self.lookup_count += 1;

        if let Some(address) = self.cache.get(domain) {
            debug!("DNSキャッシュヒット: {}", domain);
            return Some(Resolution {
                address: address.clone(),
                source: LookupSource::Cache,
            });
        }

        match self.records.get(domain) {
            Some(address) => {
                self.cache.insert(domain.to_string(), address.clone());
                info!("名前解決しました: {} -> {}", domain, address);
                Some(Resolution {
                    address: address.clone(),
                    source: LookupSource::Records,
                })
            }
            None => {
                warn!("NXDOMAIN: {}", domain);
                None
            }
        }
    }

    pub fn lookup_count(&self) -> u64 {
        self.lookup_count
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    pub fn is_cached(&self, domain: &str) -> bool {
        self.cache.contains_key(domain)
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new()
    }
}
