use serde::{Deserialize, Serialize};
use std::fmt;

/// ファイアウォールの名前付きルール
///
/// 判定に使うのは `require_ttl_check` と `rate_limit` のみ。
/// 残りのフラグは状態表示用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRules {
    pub block_malformed_packets: bool,
    pub require_ttl_check: bool,
    pub block_private_to_public: bool,
    pub rate_limit: usize,
}

impl FirewallRules {
    pub fn with_rate_limit(rate_limit: usize) -> Self {
        Self {
            rate_limit,
            ..Self::default()
        }
    }

    /// 表示用に (ルール名, 値) の一覧を返す
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("block_malformed_packets", self.block_malformed_packets.to_string()),
            ("require_ttl_check", self.require_ttl_check.to_string()),
            ("block_private_to_public", self.block_private_to_public.to_string()),
            ("rate_limit", self.rate_limit.to_string()),
        ]
    }
}

impl Default for FirewallRules {
    fn default() -> Self {
        Self {
            block_malformed_packets: true,
            require_ttl_check: true,
            block_private_to_public: false,
            rate_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    Blacklisted,
    TtlExpired,
    RateLimited,
}

impl RejectReason {
    pub fn tag(&self) -> &'static str {
        match self {
            RejectReason::Blacklisted => "blacklisted",
            RejectReason::TtlExpired => "ttl_expired",
            RejectReason::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            RejectReason::Blacklisted => "BLOCKED: Source IP in blacklist",
            RejectReason::TtlExpired => "BLOCKED: Packet TTL expired",
            RejectReason::RateLimited => "BLOCKED: Rate limit exceeded",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(RejectReason),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Verdict::Allow => "ok",
            Verdict::Deny(reason) => reason.tag(),
        }
    }
}
