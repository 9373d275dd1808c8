use crate::core::manager::{Attempt, NetworkManager};
use crate::core::router::StatisticsSnapshot;
use crate::error::InitProcessError;
use crate::network::packet::Protocol;
use std::io::{self, BufRead, Write};
use tokio::time::{sleep, Duration};

const RULE: &str = "════════════════════════════════════════════════════════════";

/// 表示の間に挟む待ち時間。0なら待たない
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    step: Duration,
}

impl Pacing {
    pub fn new(pacing_ms: u64) -> Self {
        Self {
            step: Duration::from_millis(pacing_ms),
        }
    }

    pub async fn pause(&self, steps: u32) {
        if !self.step.is_zero() {
            sleep(self.step * steps).await;
        }
    }
}

enum MenuChoice {
    Domain,
    Address,
    Toggle,
    RoutingTable,
    Statistics,
    ProtocolSuite,
    StressTest,
    Attack,
    Firewall,
    ExportJson,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Domain),
            "2" => Some(MenuChoice::Address),
            "3" => Some(MenuChoice::Toggle),
            "4" => Some(MenuChoice::RoutingTable),
            "5" => Some(MenuChoice::Statistics),
            "6" => Some(MenuChoice::ProtocolSuite),
            "7" => Some(MenuChoice::StressTest),
            "8" => Some(MenuChoice::Attack),
            "9" => Some(MenuChoice::Firewall),
            "10" => Some(MenuChoice::ExportJson),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub async fn run(manager: &mut NetworkManager, pacing: Pacing) -> Result<(), InitProcessError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        draw_dashboard(manager);
        draw_topology(manager);
        print_menu();

        let Some(line) = prompt(&mut input, "\nメニュー番号を選択してください (0-10): ")? else {
            // EOF
            break;
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Domain) => {
                let domain = prompt_or(&mut input, "ドメイン名 (例: google.com): ", "")?;
                let protocol = read_protocol(&mut input)?;
                if let Some(protocol) = protocol {
                    show_request(manager, &domain, protocol, pacing).await;
                }
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::Address) => {
                let address = prompt_or(&mut input, "IPアドレス (例: 192.168.1.1): ", "")?;
                show_request(manager, &address, Protocol::Http, pacing).await;
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::Toggle) => {
                println!("\n切り替えるサーバーを選択してください:");
                for (i, server) in manager.servers().enumerate() {
                    let status = if server.is_online() { "ONLINE" } else { "OFFLINE" };
                    println!("{}. {:<15} ({}) - {}", i + 1, server.name(), server.ip_address(), status);
                }
                let count = manager.servers().count();
                let raw = prompt_or(&mut input, &format!("\nサーバー番号 (1-{}): ", count), "")?;
                match raw.trim().parse::<usize>() {
                    Ok(index) => match manager.toggle_server(index) {
                        Ok(outcome) => println!("\n{}", outcome),
                        Err(e) => println!("{}", e),
                    },
                    Err(_) => println!("入力が不正です"),
                }
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::RoutingTable) => {
                draw_routing_table(manager);
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::Statistics) => {
                draw_statistics(&manager.statistics_view());
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::ProtocolSuite) => {
                println!("\nプロトコル試験:");
                for attempt in manager.protocol_suite("google.com") {
                    print_attempt(&attempt);
                    pacing.pause(2).await;
                }
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::StressTest) => {
                println!("\n負荷試験を開始します...");
                let attempts = manager.stress_test(5, &mut rand::thread_rng());
                for (i, attempt) in attempts.iter().enumerate() {
                    println!("\nTest {}: {}", i + 1, attempt.destination);
                    print_attempt(attempt);
                    pacing.pause(1).await;
                }
                println!("\n負荷試験が完了しました");
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::Attack) => {
                println!("\n攻撃をシミュレートします: ブラックリストの送信元からリクエストを送信");
                let attempts = manager.simulate_attack(3);
                let blocked = attempts.iter().filter(|a| a.outcome.is_err()).count();
                for (i, attempt) in attempts.iter().enumerate() {
                    println!("\nAttack attempt {}...", i + 1);
                    print_attempt(attempt);
                    pacing.pause(2).await;
                }
                println!("\n{}/{} 件の攻撃をブロックしました", blocked, attempts.len());
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::Firewall) => {
                draw_firewall(manager);
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::ExportJson) => {
                match manager.statistics_json() {
                    Ok(json) => println!("\n{}", json),
                    Err(e) => println!("{}", e),
                }
                wait_enter(&mut input)?;
            }
            Some(MenuChoice::Exit) => break,
            None => {
                println!("無効な選択です。もう一度入力してください");
                pacing.pause(5).await;
            }
        }
    }

    println!("\n{:=^60}", " SHUTTING DOWN NETWORK ");
    draw_statistics(&manager.statistics_view());
    Ok(())
}

async fn show_request(manager: &mut NetworkManager, destination: &str, protocol: Protocol, pacing: Pacing) {
    println!("\n{}", RULE);
    println!("[{}] リクエスト処理中: {} ({})", manager.router().name(), destination, protocol);
    pacing.pause(2).await;

    let result = manager.route(destination, protocol);
    match result {
        Ok(reply) => println!("\n[RESULT] {}", reply),
        Err(e) => println!("\n[RESULT] {}", e),
    }
    if let Some(latency) = manager.statistics_view().last_latency_ms {
        println!("[STATS] Latency: {:.2}ms", latency);
    }
}

fn print_attempt(attempt: &Attempt) {
    match &attempt.outcome {
        Ok(reply) => println!("  {:5} {} -> {}", attempt.protocol, attempt.destination, reply),
        Err(e) => println!("  {:5} {} -> {}", attempt.protocol, attempt.destination, e),
    }
}

fn read_protocol<R: BufRead>(input: &mut R) -> Result<Option<Protocol>, InitProcessError> {
    let raw = prompt_or(input, "プロトコル (HTTP/HTTPS/FTP/SMTP/DNS) [HTTP]: ", "HTTP")?;
    match raw.parse::<Protocol>() {
        Ok(protocol) => Ok(Some(protocol)),
        Err(e) => {
            println!("{}", e);
            Ok(None)
        }
    }
}

fn prompt<R: BufRead>(input: &mut R, message: &str) -> Result<Option<String>, InitProcessError> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_or<R: BufRead>(input: &mut R, message: &str, default: &str) -> Result<String, InitProcessError> {
    let line = prompt(input, message)?.unwrap_or_default();
    if line.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(line)
    }
}

fn wait_enter<R: BufRead>(input: &mut R) -> Result<(), InitProcessError> {
    prompt(input, "\nEnterキーで続行...")?;
    Ok(())
}

fn print_menu() {
    println!("\n{:=^60}", " MAIN MENU ");
    println!("1. ドメイン名で接続");
    println!("2. IPアドレスで接続");
    println!("3. サーバーの状態を切り替え");
    println!("4. ルーティングテーブル");
    println!("5. ネットワーク統計");
    println!("6. プロトコル試験");
    println!("7. 負荷試験");
    println!("8. 攻撃シミュレーション");
    println!("9. ファイアウォール状態");
    println!("10. 統計をJSONで出力");
    println!("0. 終了");
}

fn draw_dashboard(manager: &NetworkManager) {
    let dashboard = manager.dashboard();
    println!("\n{:=^60}", " NETWORK DASHBOARD ");
    println!("Status:         OPERATIONAL");
    println!("Servers Online: {}/{}", dashboard.servers_online, dashboard.servers_total);
    println!("Total Requests: {}", dashboard.total_requests);
    println!("Router:         {}", dashboard.router);
    println!("{}", "─".repeat(60));
}

fn draw_topology(manager: &NetworkManager) {
    println!("\n{:=^60}", " NETWORK TOPOLOGY MAP ");
    println!("     [CLIENT]");
    println!("        │");
    println!("        ▼");
    println!("  ┌────────────────────┐");
    println!("  │  {:^16}  │", manager.router().name());
    println!("  │   CORE ROUTER      │");
    println!("  └─────────┬──────────┘");
    println!("            │");

    let entries = manager.routing_table_view();
    if !entries.is_empty() {
        println!("     ┌─────┴─────┐");
        for pair in entries.chunks(2) {
            let line: Vec<String> = pair
                .iter()
                .map(|e| {
                    let mark = if e.online { "[UP]" } else { "[DOWN]" };
                    format!("{:<6} {:<12} ({})", mark, e.name, e.address)
                })
                .collect();
            println!("     │  {}", line.join("   "));
        }
    }
    println!("\n{:=^60}", " Legend: [UP]=Online [DOWN]=Offline ");
}

fn draw_routing_table(manager: &NetworkManager) {
    println!("\n{}", RULE);
    println!("{:^60}", format!("{} - ROUTING TABLE", manager.router().name()));
    println!("{}", RULE);
    println!("{:<15} {:<20} {:<10} {:<10}", "IP ADDRESS", "SERVER NAME", "STATUS", "REQUESTS");
    println!("{}", "-".repeat(60));
    for entry in manager.routing_table_view() {
        let status = if entry.online { "ONLINE" } else { "OFFLINE" };
        println!("{:<15} {:<20} {:<10} {:<10}", entry.address, entry.name, status, entry.requests_served);
    }
    println!("{}", RULE);
}

fn draw_statistics(stats: &StatisticsSnapshot) {
    println!("\n[{}] NETWORK STATISTICS:", stats.router);
    println!("{}", "─".repeat(40));
    println!("Packets Routed:    {}", stats.packets_routed);
    println!("Packets Blocked:   {}", stats.packets_blocked);
    println!("DNS Requests:      {}", stats.dns_requests);
    println!("Avg Latency:       {:.2}ms", stats.avg_latency_ms);
    println!("Firewall Blocks:   {}", stats.firewall_blocks);
    println!("DNS Cache Size:    {} entries", stats.dns_cache_size);
    println!("{}", "─".repeat(40));
}

fn draw_firewall(manager: &NetworkManager) {
    let view = manager.firewall_view();
    println!("\n{:=^60}", " FIREWALL ");
    println!("Blacklist:");
    for address in &view.blacklist {
        println!("  - {}", address);
    }
    println!("Rules:");
    for (name, value) in &view.rules {
        println!("  {:<25} {}", name, value);
    }
    println!("Blocked packets: {}", view.blocked_count);
}
