use crate::network::server::Server;
use std::collections::HashMap;

/// アドレス -> サーバー。登録順を保持する
#[derive(Default)]
pub struct RoutingTable {
    servers: Vec<Server>,
    index: HashMap<String, usize>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同じアドレスが既にあれば置き換える。置き換えた場合は古いサーバーを返す
    pub fn insert(&mut self, server: Server) -> Option<Server> {
        match self.index.get(server.ip_address()) {
            Some(&slot) => Some(std::mem::replace(&mut self.servers[slot], server)),
            None => {
                self.index.insert(server.ip_address().to_string(), self.servers.len());
                self.servers.push(server);
                None
            }
        }
    }

    pub fn get_mut(&mut self, address: &str) -> Option<&mut Server> {
        let slot = *self.index.get(address)?;
        self.servers.get_mut(slot)
    }

    pub fn get(&self, address: &str) -> Option<&Server> {
        self.index.get(address).and_then(|&slot| self.servers.get(slot))
    }

    pub fn contains(&self, address: &str) -> bool {
        self.index.contains_key(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Server> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::server::{SecurityLevel, ServerType};

    fn server(address: &str, name: &str) -> Server {
        Server::new(address, name, "", SecurityLevel::Low, ServerType::Web)
    }

    #[test]
    fn keeps_insertion_order() {
        let mut table = RoutingTable::new();
        table.insert(server("10.0.0.3", "c"));
        table.insert(server("10.0.0.1", "a"));
        table.insert(server("10.0.0.2", "b"));

        let names: Vec<&str> = table.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn same_address_overwrites_in_place() {
        let mut table = RoutingTable::new();
        table.insert(server("10.0.0.1", "old"));
        table.insert(server("10.0.0.2", "other"));

        let replaced = table.insert(server("10.0.0.1", "new"));
        assert_eq!(replaced.map(|s| s.name().to_string()), Some("old".to_string()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("10.0.0.1").map(|s| s.name()), Some("new"));
        assert_eq!(table.iter().next().map(|s| s.name()), Some("new"));
    }

    #[test]
    fn missing_address() {
        let mut table = RoutingTable::new();
        assert!(table.is_empty());
        assert!(table.get_mut("10.0.0.1").is_none());
        assert!(!table.contains("10.0.0.1"));
    }
}
