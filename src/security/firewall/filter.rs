use super::rules::{FirewallRules, RejectReason, Verdict};
use crate::config::app_config::RATE_WINDOW;
use crate::network::packet::Packet;
use log::{debug, warn};
use std::collections::VecDeque;

pub struct Firewall {
    blacklist: Vec<String>,
    rules: FirewallRules,
    history: VecDeque<Packet>,
    history_capacity: usize,
    blocked_count: u64,
}

impl Firewall {
    pub fn new(rules: FirewallRules, history_capacity: usize) -> Self {
        Self {
            blacklist: vec![
                "192.168.2.100".to_string(), // 既知の攻撃元
                "10.0.0.666".to_string(),    // 不正なアドレス
                "185.143.223.1".to_string(), // 不審なアドレス
            ],
            rules,
            history: VecDeque::with_capacity(history_capacity),
            history_capacity: history_capacity.max(RATE_WINDOW),
            blocked_count: 0,
        }
    }

    /// パケットを検査する。拒否されるパケットも含めて必ず履歴に積む
    ///
    /// 判定順: ブラックリスト → TTL → レートリミット。最初に一致したもので確定する。
    /// `blocked_count` はブラックリストによる拒否でのみ増える。
    pub fn inspect(&mut self, packet: &Packet) -> Verdict {
        self.record(packet);

        if self.is_blacklisted(packet.source_ip()) {
            self.blocked_count += 1;
            warn!("ブラックリストの送信元をブロックしました: {}", packet.source_ip());
            return Verdict::Deny(RejectReason::Blacklisted);
        }

        if self.rules.require_ttl_check && packet.ttl() == 0 {
            warn!("TTL切れのパケットを破棄しました: {}", packet.id());
            return Verdict::Deny(RejectReason::TtlExpired);
        }

        let recent = self.recent_from(packet.source_ip());
        if recent > self.rules.rate_limit {
            warn!(
                "レートリミット超過: {} (直近{}件中{}件)",
                packet.source_ip(),
                RATE_WINDOW,
                recent
            );
            return Verdict::Deny(RejectReason::RateLimited);
        }

        debug!("ファイアウォール通過: パケット {}", packet.id());
        Verdict::Allow
    }

    fn record(&mut self, packet: &Packet) {
        if self.history.len() == self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(packet.clone());
    }

    /// 直近 `RATE_WINDOW` 件のうち同じ送信元のパケット数
    fn recent_from(&self, source_ip: &str) -> usize {
        self.history
            .iter()
            .rev()
            .take(RATE_WINDOW)
            .filter(|p| p.source_ip() == source_ip)
            .count()
    }

    pub fn is_blacklisted(&self, address: &str) -> bool {
        self.blacklist.iter().any(|entry| entry == address)
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn rules(&self) -> &FirewallRules {
        &self.rules
    }

    pub fn blocked_count(&self) -> u64 {
        self.blocked_count
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
