use crate::config::AppConfig;
use crate::core::error::{RouteError, RouteResult};
use crate::core::routing_table::RoutingTable;
use crate::network::dns::DnsResolver;
use crate::network::packet::{Packet, PacketIdSource, Protocol};
use crate::network::server::{Server, ServerReply};
use crate::security::firewall::{Firewall, FirewallRules, Verdict};
use log::{debug, info, warn};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RouterStats {
    pub packets_routed: u64,
    pub packets_blocked: u64,
    pub dns_requests: u64,
    pub avg_latency_ms: f64,
    pub last_latency_ms: Option<f64>,
}

impl RouterStats {
    /// 指数移動平均 (0.9/0.1) で平均レイテンシを更新する。初回はそのまま採用
    pub fn record_latency(&mut self, latency_ms: f64) {
        self.avg_latency_ms = if self.avg_latency_ms == 0.0 {
            latency_ms
        } else {
            self.avg_latency_ms * 0.9 + latency_ms * 0.1
        };
        self.last_latency_ms = Some(latency_ms);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsSnapshot {
    pub router: String,
    pub packets_routed: u64,
    pub packets_blocked: u64,
    pub dns_requests: u64,
    pub avg_latency_ms: f64,
    pub last_latency_ms: Option<f64>,
    pub firewall_blocks: u64,
    pub firewall_history: usize,
    pub dns_lookups: u64,
    pub dns_cache_size: usize,
}

/// `.` を含み、`.` を除いた残りが数字だけではない入力をドメイン名とみなす
///
/// "1.2.3.a" のような不正な入力もドメイン名として扱われる。
pub fn is_domain_name(destination: &str) -> bool {
    let stripped: String = destination.chars().filter(|c| *c != '.').collect();
    let all_digits = !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit());
    destination.contains('.') && !all_digits
}

pub struct Router {
    name: String,
    client_source_ip: String,
    routing_table: RoutingTable,
    dns: DnsResolver,
    firewall: Firewall,
    ids: Box<dyn PacketIdSource>,
    stats: RouterStats,
}

impl Router {
    pub fn new(config: &AppConfig, ids: Box<dyn PacketIdSource>) -> Self {
        Self::with_parts(
            config.router.name.clone(),
            config.router.client_source_ip.clone(),
            DnsResolver::new(),
            Firewall::new(
                FirewallRules::with_rate_limit(config.firewall.rate_limit),
                config.firewall.history_capacity,
            ),
            ids,
        )
    }

    pub fn with_parts(
        name: String,
        client_source_ip: String,
        dns: DnsResolver,
        firewall: Firewall,
        ids: Box<dyn PacketIdSource>,
    ) -> Self {
        Self {
            name,
            client_source_ip,
            routing_table: RoutingTable::new(),
            dns,
            firewall,
            ids,
            stats: RouterStats::default(),
        }
    }

    pub fn add_server(&mut self, server: Server) {
        info!(
            "[{}] ルーティングテーブルに追加しました: {} ({})",
            self.name,
            server.name(),
            server.ip_address()
        );
        if let Some(previous) = self.routing_table.insert(server) {
            warn!("[{}] {} のエントリを上書きしました", self.name, previous.ip_address());
        }
    }

    /// 既定のクライアントアドレスからルーティングする
    pub fn route(&mut self, destination: &str, protocol: Protocol) -> RouteResult<ServerReply> {
        let source = self.client_source_ip.clone();
        self.route_from(&source, destination, protocol)
    }

    /// 名前解決 → パケット生成 → ファイアウォール → ルーティング → サーバー処理
    ///
    /// 最初に失敗した段階で終了する。DNS失敗ではカウンタは `dns_requests` 以外動かない。
    pub fn route_from(
        &mut self,
        source_ip: &str,
        destination: &str,
        protocol: Protocol,
    ) -> RouteResult<ServerReply> {
        let start = Instant::now();
        info!("[{}] リクエストを処理します: {} ({})", self.name, destination, protocol);

        let address = if is_domain_name(destination) {
            self.stats.dns_requests += 1;
            match self.dns.resolve(destination) {
                Some(resolution) => resolution.address,
                None => {
                    return Err(RouteError::DnsNotFound {
                        domain: destination.to_string(),
                    })
                }
            }
        } else {
            destination.to_string()
        };

        let packet = Packet::new(
            self.ids.next_id(),
            source_ip,
            address.as_str(),
            format!("Request for {}", destination),
            protocol,
        );
        debug!("{}", packet);

        if let Verdict::Deny(reason) = self.firewall.inspect(&packet) {
            self.stats.packets_blocked += 1;
            return Err(RouteError::FirewallRejected { reason });
        }

        let server = match self.routing_table.get_mut(&address) {
            Some(server) => server,
            None => {
                self.stats.packets_blocked += 1;
                warn!("[{}] 経路がありません: {}", self.name, address);
                return Err(RouteError::RouteNotFound { address });
            }
        };

        let reply = server.process(&packet);

        self.stats.packets_routed += 1;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.stats.record_latency(latency_ms);
        info!(
            "[{}] レイテンシ: {:.2}ms | 転送済み: {}",
            self.name, latency_ms, self.stats.packets_routed
        );

        Ok(reply)
    }

    pub fn statistics(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            router: self.name.clone(),
            packets_routed: self.stats.packets_routed,
            packets_blocked: self.stats.packets_blocked,
            dns_requests: self.stats.dns_requests,
            avg_latency_ms: self.stats.avg_latency_ms,
            last_latency_ms: self.stats.last_latency_ms,
            firewall_blocks: self.firewall.blocked_count(),
            firewall_history: self.firewall.history_len(),
            dns_lookups: self.dns.lookup_count(),
            dns_cache_size: self.dns.cache_size(),
        }
    }

    pub fn stats(&self) -> &RouterStats {
        &self.stats
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    pub fn server_mut(&mut self, address: &str) -> Option<&mut Server> {
        self.routing_table.get_mut(address)
    }

    pub fn dns(&self) -> &DnsResolver {
        &self.dns
    }

    pub fn firewall(&self) -> &Firewall {
        &self.firewall
    }
}
