use crate::config::AppConfig;
use crate::core::error::{ManagerError, ManagerResult, RouteResult};
use crate::core::router::{Router, StatisticsSnapshot};
use crate::network::packet::{PacketIdSource, Protocol};
use crate::network::server::{SecurityLevel, Server, ServerReply, ServerType};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// 攻撃シミュレーションで使う送信元 (ブラックリスト登録済み)
pub const ATTACKER_IP: &str = "192.168.2.100";

pub const STRESS_TEST_DOMAINS: [&str; 3] = ["google.com", "bank.com", "youtube.com"];

#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub address: String,
    pub name: String,
    pub online: bool,
    pub requests_served: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub name: String,
    pub online: bool,
}

impl fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.online { "ONLINE" } else { "OFFLINE" };
        write!(f, "Server '{}' is now {}", self.name, status)
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub router: String,
    pub servers_online: usize,
    pub servers_total: usize,
    pub total_requests: u64,
}

#[derive(Debug, Clone)]
pub struct FirewallView {
    pub blacklist: Vec<String>,
    pub rules: Vec<(&'static str, String)>,
    pub blocked_count: u64,
}

/// ルーティング1回分の記録 (プロトコル試験・負荷試験・攻撃シミュレーション用)
#[derive(Debug, Clone)]
pub struct Attempt {
    pub destination: String,
    pub protocol: Protocol,
    pub outcome: RouteResult<ServerReply>,
}

/// デモ用ネットワーク全体を所有し、CLIに操作を提供する
pub struct NetworkManager {
    router: Router,
    roster: Vec<String>,
}

impl NetworkManager {
    pub fn new(config: &AppConfig, ids: Box<dyn PacketIdSource>) -> Self {
        Self {
            router: Router::new(config, ids),
            roster: Vec::new(),
        }
    }

    /// 8台の固定サーバーを登録し、MailServerとDatabaseをオフラインにする
    pub fn setup_network(&mut self) {
        let servers = [
            Server::new("192.168.1.1", "Google", "Welcome to Google Search", SecurityLevel::Medium, ServerType::Web),
            Server::new("192.168.1.2", "SecureBank", "🔒 Banking Portal - $10,284.52", SecurityLevel::High, ServerType::Web),
            Server::new("192.168.1.3", "MailServer", "📧 5 Unread Messages", SecurityLevel::Medium, ServerType::Mail),
            Server::new("192.168.1.4", "CloudDrive", "☁️ 15.2GB of 20GB used", SecurityLevel::Low, ServerType::File),
            Server::new("192.168.1.5", "YouTube", "▶️ Trending Videos", SecurityLevel::Low, ServerType::Web),
            Server::new("192.168.1.6", "GitHub", "💻 Repositories: 12", SecurityLevel::Medium, ServerType::Web),
            Server::new("192.168.1.7", "Database", "🗄️ MySQL Server v8.0", SecurityLevel::High, ServerType::Db),
            Server::new("192.168.1.8", "FirewallLog", "📊 Security Monitoring", SecurityLevel::High, ServerType::Web),
        ];

        for server in servers {
            self.roster.push(server.ip_address().to_string());
            self.router.add_server(server);
        }

        for offline in ["192.168.1.3", "192.168.1.7"] {
            if let Some(server) = self.router.server_mut(offline) {
                server.set_online(false);
            }
        }

        info!(
            "ネットワークの初期化が完了しました: サーバー{}台, DNSレコード{}件, ブラックリスト{}件",
            self.roster.len(),
            self.router.dns().record_count(),
            self.router.firewall().blacklist().len()
        );
    }

    pub fn route(&mut self, destination: &str, protocol: Protocol) -> RouteResult<ServerReply> {
        self.router.route(destination, protocol)
    }

    /// `index` は1始まり (メニュー表示と同じ番号)
    pub fn toggle_server(&mut self, index: usize) -> ManagerResult<ToggleOutcome> {
        let count = self.roster.len();
        let address = index
            .checked_sub(1)
            .and_then(|slot| self.roster.get(slot))
            .ok_or(ManagerError::InvalidServerIndex { index, count })?;

        let server = self
            .router
            .server_mut(address)
            .ok_or(ManagerError::InvalidServerIndex { index, count })?;
        let online = server.toggle_status();

        Ok(ToggleOutcome {
            name: server.name().to_string(),
            online,
        })
    }

    pub fn routing_table_view(&self) -> Vec<RouteEntry> {
        self.router
            .routing_table()
            .iter()
            .map(|server| RouteEntry {
                address: server.ip_address().to_string(),
                name: server.name().to_string(),
                online: server.is_online(),
                requests_served: server.requests_served(),
            })
            .collect()
    }

    pub fn statistics_view(&self) -> StatisticsSnapshot {
        self.router.statistics()
    }

    pub fn statistics_json(&self) -> ManagerResult<String> {
        serde_json::to_string_pretty(&self.statistics_view())
            .map_err(|e| ManagerError::Serialization(e.to_string()))
    }

    pub fn dashboard(&self) -> Dashboard {
        let table = self.router.routing_table();
        Dashboard {
            router: self.router.name().to_string(),
            servers_online: table.iter().filter(|s| s.is_online()).count(),
            servers_total: table.len(),
            total_requests: table.iter().map(|s| s.requests_served()).sum(),
        }
    }

    pub fn firewall_view(&self) -> FirewallView {
        let firewall = self.router.firewall();
        FirewallView {
            blacklist: firewall.blacklist().to_vec(),
            rules: firewall.rules().entries(),
            blocked_count: firewall.blocked_count(),
        }
    }

    /// 同じ宛先に全プロトコルで1回ずつリクエストする
    pub fn protocol_suite(&mut self, destination: &str) -> Vec<Attempt> {
        Protocol::ALL
            .iter()
            .map(|&protocol| Attempt {
                destination: destination.to_string(),
                protocol,
                outcome: self.router.route(destination, protocol),
            })
            .collect()
    }

    pub fn stress_test<R: Rng>(&mut self, rounds: usize, rng: &mut R) -> Vec<Attempt> {
        (0..rounds)
            .filter_map(|_| STRESS_TEST_DOMAINS.choose(&mut *rng).copied())
            .map(|domain| Attempt {
                destination: domain.to_string(),
                protocol: Protocol::Http,
                outcome: self.router.route(domain, Protocol::Http),
            })
            .collect()
    }

    /// ブラックリストの送信元から google.com へリクエストを送る
    pub fn simulate_attack(&mut self, attempts: usize) -> Vec<Attempt> {
        (0..attempts)
            .map(|_| Attempt {
                destination: "google.com".to_string(),
                protocol: Protocol::Http,
                outcome: self.router.route_from(ATTACKER_IP, "google.com", Protocol::Http),
            })
            .collect()
    }

    pub fn server_uptime(&self, index: usize) -> ManagerResult<String> {
        let count = self.roster.len();
        index
            .checked_sub(1)
            .and_then(|slot| self.roster.get(slot))
            .and_then(|address| self.router.routing_table().get(address))
            .map(|server| server.uptime_text())
            .ok_or(ManagerError::InvalidServerIndex { index, count })
    }

    /// 登録順のサーバー一覧 (トグル用メニュー表示)
    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.roster
            .iter()
            .filter_map(|address| self.router.routing_table().get(address))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RouteError;
    use crate::network::packet::SequentialIds;
    use crate::security::firewall::RejectReason;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn demo() -> NetworkManager {
        let mut manager = NetworkManager::new(&AppConfig::for_testing(), Box::new(SequentialIds::new()));
        manager.setup_network();
        manager
    }

    #[test]
    fn demo_topology() {
        let manager = demo();
        let view = manager.routing_table_view();

        assert_eq!(view.len(), 8);
        assert_eq!(view[0].address, "192.168.1.1");
        assert_eq!(view[0].name, "Google");
        assert_eq!(view[7].name, "FirewallLog");

        let offline: Vec<&str> = view.iter().filter(|e| !e.online).map(|e| e.name.as_str()).collect();
        assert_eq!(offline, ["MailServer", "Database"]);

        let dashboard = manager.dashboard();
        assert_eq!(dashboard.servers_online, 6);
        assert_eq!(dashboard.servers_total, 8);
        assert_eq!(dashboard.total_requests, 0);
        assert_eq!(dashboard.router, "CoreRouter-01");
    }

    #[test]
    fn demo_server_content_is_exact() {
        let manager = demo();
        let contents: Vec<(&str, &str)> = manager.servers().map(|s| (s.name(), s.content())).collect();
        assert_eq!(
            contents,
            [
                ("Google", "Welcome to Google Search"),
                ("SecureBank", "🔒 Banking Portal - $10,284.52"),
                ("MailServer", "📧 5 Unread Messages"),
                ("CloudDrive", "☁️ 15.2GB of 20GB used"),
                ("YouTube", "▶️ Trending Videos"),
                ("GitHub", "💻 Repositories: 12"),
                ("Database", "🗄️ MySQL Server v8.0"),
                ("FirewallLog", "📊 Security Monitoring"),
            ]
        );
    }

    #[test]
    fn bank_over_https_embeds_content() {
        let mut manager = demo();
        let reply = manager.route("bank.com", Protocol::Https).unwrap();
        assert_eq!(reply.to_string(), "200 OK [SecureBank]: 🔒 Banking Portal - $10,284.52");
    }

    #[test]
    fn google_over_http_is_served() {
        let mut manager = demo();
        let reply = manager.route("google.com", Protocol::Http).unwrap();

        assert!(reply.is_success());
        assert!(reply.to_string().contains("Welcome to Google Search"));
        assert!(reply.to_string().starts_with("200 OK"));

        let stats = manager.statistics_view();
        assert_eq!(stats.packets_routed, 1);
        assert_eq!(stats.dns_requests, 1);
        assert_eq!(stats.packets_blocked, 0);
        assert_eq!(stats.dns_cache_size, 1);
        assert_eq!(manager.routing_table_view()[0].requests_served, 1);
    }

    #[test]
    fn bank_without_https_is_forbidden_but_routed() {
        let mut manager = demo();
        let reply = manager.route("bank.com", Protocol::Http).unwrap();

        assert_eq!(reply.to_string(), "403 Forbidden: HTTPS required for SecureBank");
        // サーバー内部での拒否も転送済みとして数える
        let stats = manager.statistics_view();
        assert_eq!(stats.packets_routed, 1);
        assert_eq!(stats.packets_blocked, 0);
        assert_eq!(manager.routing_table_view()[1].requests_served, 1);

        assert!(manager.route("bank.com", Protocol::Https).unwrap().is_success());
    }

    #[test]
    fn offline_mail_server_is_unavailable() {
        let mut manager = demo();
        let reply = manager.route("email.com", Protocol::Smtp).unwrap();
        assert_eq!(reply.to_string(), "503 Service Unavailable: Server 'MailServer' is offline");
        assert_eq!(manager.statistics_view().packets_routed, 1);
    }

    #[test]
    fn unknown_literal_address_is_not_found() {
        let mut manager = demo();
        let result = manager.route("192.168.9.9", Protocol::Http);

        assert_eq!(result, Err(RouteError::RouteNotFound { address: "192.168.9.9".to_string() }));
        let stats = manager.statistics_view();
        assert_eq!(stats.packets_blocked, 1);
        assert_eq!(stats.packets_routed, 0);
    }

    #[test]
    fn name_without_record_fails_dns() {
        let mut manager = demo();
        // 名前解決に失敗したらファイアウォールまで到達しない
        let result = manager.route("example.org", Protocol::Http);
        assert!(matches!(result, Err(RouteError::DnsNotFound { .. })));
        assert_eq!(manager.statistics_view().firewall_history, 0);
    }

    #[test]
    fn toggle_server_by_menu_number() {
        let mut manager = demo();

        let outcome = manager.toggle_server(3).unwrap();
        assert_eq!(outcome, ToggleOutcome { name: "MailServer".to_string(), online: true });
        assert_eq!(outcome.to_string(), "Server 'MailServer' is now ONLINE");
        assert!(manager.route("email.com", Protocol::Smtp).unwrap().is_success());

        assert_eq!(manager.toggle_server(1).unwrap().to_string(), "Server 'Google' is now OFFLINE");

        assert_eq!(
            manager.toggle_server(0),
            Err(ManagerError::InvalidServerIndex { index: 0, count: 8 })
        );
        assert_eq!(
            manager.toggle_server(9),
            Err(ManagerError::InvalidServerIndex { index: 9, count: 8 })
        );
    }

    #[test]
    fn protocol_suite_hits_every_template() {
        let mut manager = demo();
        let attempts = manager.protocol_suite("google.com");

        assert_eq!(attempts.len(), Protocol::ALL.len());
        let rendered: Vec<String> = attempts
            .iter()
            .map(|a| a.outcome.as_ref().map(|r| r.to_string()).unwrap_or_default())
            .collect();
        assert!(rendered[0].starts_with("200 OK [Google]"));
        assert!(rendered[1].starts_with("200 OK [Google]"));
        assert!(rendered[2].starts_with("226 Transfer complete"));
        assert!(rendered[3].starts_with("250 OK"));
        assert!(rendered[4].starts_with("DNS Response"));

        let stats = manager.statistics_view();
        assert_eq!(stats.dns_requests, 5);
        assert_eq!(stats.dns_lookups, 5);
        assert_eq!(stats.packets_routed, 5);
    }

    #[test]
    fn stress_test_is_reproducible_with_seed() {
        let mut first = demo();
        let mut second = demo();

        let a = first.stress_test(5, &mut StdRng::seed_from_u64(7));
        let b = second.stress_test(5, &mut StdRng::seed_from_u64(7));

        assert_eq!(a.len(), 5);
        let destinations = |attempts: &[Attempt]| -> Vec<String> {
            attempts.iter().map(|a| a.destination.clone()).collect()
        };
        assert_eq!(destinations(&a[..]), destinations(&b[..]));
        assert!(a.iter().all(|attempt| STRESS_TEST_DOMAINS.contains(&attempt.destination.as_str())));
        assert_eq!(first.statistics_view().packets_routed, 5);
    }

    #[test]
    fn attack_is_blocked_by_blacklist() {
        let mut manager = demo();
        let attempts = manager.simulate_attack(3);

        assert!(attempts.iter().all(|a| a.outcome
            == Err(RouteError::FirewallRejected { reason: RejectReason::Blacklisted })));
        let stats = manager.statistics_view();
        assert_eq!(stats.firewall_blocks, 3);
        assert_eq!(stats.packets_blocked, 3);
        assert_eq!(stats.dns_requests, 3);
        assert_eq!(stats.packets_routed, 0);
        assert_eq!(manager.firewall_view().blocked_count, 3);
    }

    #[test]
    fn statistics_export_as_json() {
        let mut manager = demo();
        manager.route("youtube.com", Protocol::Http).unwrap();

        let json = manager.statistics_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["packets_routed"], 1);
        assert_eq!(value["router"], "CoreRouter-01");
        assert_eq!(value["dns_cache_size"], 1);
    }

    #[test]
    fn uptime_lookup_uses_menu_numbers() {
        let manager = demo();
        assert_eq!(manager.server_uptime(1).unwrap(), "0h 0m");
        assert!(manager.server_uptime(42).is_err());
        assert_eq!(manager.servers().count(), 8);
    }
}
