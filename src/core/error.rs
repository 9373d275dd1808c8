use crate::security::firewall::RejectReason;
use thiserror::Error;

/// ルーティング1回分の終端的な失敗。いずれもプロセスを止めない
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("DNS Resolution Failed: Cannot resolve '{domain}'")]
    DnsNotFound { domain: String },

    #[error("{reason}")]
    FirewallRejected { reason: RejectReason },

    #[error("404 Not Found: No route to {address}")]
    RouteNotFound { address: String },
}

pub type RouteResult<T> = Result<T, RouteError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("無効なサーバー番号です: {index} (1-{count})")]
    InvalidServerIndex { index: usize, count: usize },

    #[error("統計のシリアライズに失敗しました: {0}")]
    Serialization(String),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_operator_facing() {
        let dns = RouteError::DnsNotFound { domain: "nowhere.net".to_string() };
        assert_eq!(dns.to_string(), "DNS Resolution Failed: Cannot resolve 'nowhere.net'");

        let firewall = RouteError::FirewallRejected { reason: RejectReason::Blacklisted };
        assert_eq!(firewall.to_string(), "BLOCKED: Source IP in blacklist");

        let route = RouteError::RouteNotFound { address: "10.9.9.9".to_string() };
        assert_eq!(route.to_string(), "404 Not Found: No route to 10.9.9.9");
    }
}
