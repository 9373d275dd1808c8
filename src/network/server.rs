use crate::network::packet::{Packet, Protocol};
use chrono::{DateTime, Local};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// セキュリティレベル2以上のサーバーが拒否する送信元ネットワーク
pub const UNAUTHORIZED_NETWORK_PREFIX: &str = "192.168.2.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerType {
    Web,
    Mail,
    File,
    Dns,
    Db,
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ServerType::Web => "WEB",
            ServerType::Mail => "MAIL",
            ServerType::File => "FILE",
            ServerType::Dns => "DNS",
            ServerType::Db => "DB",
        };
        f.pad(tag)
    }
}

/// 1=低, 2=中, 3=高
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SecurityLevel {
    Low = 1,
    Medium = 2,
    High = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    HttpsRequired,
    UnauthorizedNetwork,
}

/// `Server::process` の結果。拒否も含めて処理済みリクエストとして数える
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    Served {
        server: String,
        protocol: Protocol,
        content: String,
    },
    Unavailable {
        server: String,
    },
    Forbidden {
        server: String,
        reason: ForbiddenReason,
    },
}

impl ServerReply {
    pub fn is_success(&self) -> bool {
        matches!(self, ServerReply::Served { .. })
    }
}

impl fmt::Display for ServerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerReply::Served { server, protocol, content } => match protocol {
                Protocol::Ftp => write!(f, "226 Transfer complete: {}", content),
                Protocol::Smtp => write!(f, "250 OK: Message accepted for {}", content),
                Protocol::Dns => write!(f, "DNS Response: {}", content),
                Protocol::Http | Protocol::Https => write!(f, "200 OK [{}]: {}", server, content),
            },
            ServerReply::Unavailable { server } => {
                write!(f, "503 Service Unavailable: Server '{}' is offline", server)
            }
            ServerReply::Forbidden { server, reason } => match reason {
                ForbiddenReason::HttpsRequired => {
                    write!(f, "403 Forbidden: HTTPS required for {}", server)
                }
                ForbiddenReason::UnauthorizedNetwork => {
                    write!(f, "403 Forbidden: Unauthorized network")
                }
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessRecord {
    pub timestamp: DateTime<Local>,
    pub source_ip: String,
    pub packet_id: u32,
}

#[derive(Debug)]
pub struct Server {
    ip_address: String,
    name: String,
    content: String,
    server_type: ServerType,
    is_online: bool,
    security_level: SecurityLevel,
    requests_served: u64,
    access_log: Vec<AccessRecord>,
    uptime_start: DateTime<Local>,
}

impl Server {
    pub fn new(
        ip_address: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        security_level: SecurityLevel,
        server_type: ServerType,
    ) -> Self {
        Self {
            ip_address: ip_address.into(),
            name: name.into(),
            content: content.into(),
            server_type,
            is_online: true,
            security_level,
            requests_served: 0,
            access_log: Vec::new(),
            uptime_start: Local::now(),
        }
    }

    /// リクエストを処理する。オフラインや拒否の場合もカウントとアクセスログは残す
    pub fn process(&mut self, packet: &Packet) -> ServerReply {
        self.requests_served += 1;
        self.access_log.push(AccessRecord {
            timestamp: Local::now(),
            source_ip: packet.source_ip().to_string(),
            packet_id: packet.id(),
        });

        if !self.is_online {
            debug!("{} はオフラインです", self.name);
            return ServerReply::Unavailable { server: self.name.clone() };
        }

        if self.security_level >= SecurityLevel::High && packet.protocol() != Protocol::Https {
            info!("{}: HTTPS以外のリクエストを拒否しました ({})", self.name, packet.protocol());
            return ServerReply::Forbidden {
                server: self.name.clone(),
                reason: ForbiddenReason::HttpsRequired,
            };
        }

        if self.security_level >= SecurityLevel::Medium
            && packet.source_ip().contains(UNAUTHORIZED_NETWORK_PREFIX)
        {
            info!("{}: 許可されていないネットワークからのリクエストを拒否しました ({})", self.name, packet.source_ip());
            return ServerReply::Forbidden {
                server: self.name.clone(),
                reason: ForbiddenReason::UnauthorizedNetwork,
            };
        }

        ServerReply::Served {
            server: self.name.clone(),
            protocol: packet.protocol(),
            content: self.content.clone(),
        }
    }

    /// 状態を反転して新しい状態を返す
    pub fn toggle_status(&mut self) -> bool {
        self.is_online = !self.is_online;
        info!("{} の状態を変更しました: online={}", self.name, self.is_online);
        self.is_online
    }

    pub fn set_online(&mut self, online: bool) {
        self.is_online = online;
    }

    pub fn uptime(&self) -> chrono::Duration {
        Local::now() - self.uptime_start
    }

    pub fn uptime_text(&self) -> String {
        let uptime = self.uptime();
        format!("{}h {}m", uptime.num_hours(), uptime.num_minutes() % 60)
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn server_type(&self) -> ServerType {
        self.server_type
    }

    pub fn is_online(&self) -> bool {
        self.is_online
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.security_level
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served
    }

    pub fn access_log(&self) -> &[AccessRecord] {
        &self.access_log
    }
}
