use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// アプリケーション層プロトコルのタグ。応答テンプレートの選択にのみ使う
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[default]
    Http,
    Https,
    Ftp,
    Smtp,
    Dns,
}

impl Protocol {
    pub const ALL: [Protocol; 5] = [
        Protocol::Http,
        Protocol::Https,
        Protocol::Ftp,
        Protocol::Smtp,
        Protocol::Dns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
            Protocol::Ftp => "FTP",
            Protocol::Smtp => "SMTP",
            Protocol::Dns => "DNS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("未対応のプロトコルです: {0}")]
pub struct ParseProtocolError(pub String);

impl FromStr for Protocol {
    type Err = ParseProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HTTP" => Ok(Protocol::Http),
            "HTTPS" => Ok(Protocol::Https),
            "FTP" => Ok(Protocol::Ftp),
            "SMTP" => Ok(Protocol::Smtp),
            "DNS" => Ok(Protocol::Dns),
            _ => Err(ParseProtocolError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketType {
    Request,
    Response,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("https".parse::<Protocol>(), Ok(Protocol::Https));
        assert_eq!(" Smtp ".parse::<Protocol>(), Ok(Protocol::Smtp));
        assert_eq!("GOPHER".parse::<Protocol>(), Err(ParseProtocolError("GOPHER".to_string())));
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("[{:5}]", Protocol::Ftp), "[FTP  ]");
        assert_eq!(format!("[{:>5}]", Protocol::Dns), "[  DNS]");
        assert_eq!(Protocol::default(), Protocol::Http);
    }

    #[test]
    fn display_uses_wire_tag() {
        let tags: Vec<String> = Protocol::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(tags, ["HTTP", "HTTPS", "FTP", "SMTP", "DNS"]);
    }
}
