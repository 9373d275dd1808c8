use rand::Rng;

/// パケットIDの払い出し元
pub trait PacketIdSource {
    fn next_id(&mut self) -> u32;
}

/// 1000から順番に払い出す。テストで再現性が必要な場合に使う
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u32,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1000)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketIdSource for SequentialIds {
    fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// 1000..=9999 の乱数ID
#[derive(Debug, Default, Clone)]
pub struct RandomIds;

impl PacketIdSource for RandomIds {
    fn next_id(&mut self) -> u32 {
        rand::thread_rng().gen_range(1000..=9999)
    }
}
