use glass_router::cli::{self, Pacing};
use glass_router::config::AppConfig;
use glass_router::core::NetworkManager;
use glass_router::error::InitProcessError;
use glass_router::network::packet::RandomIds;
use glass_router::setup_logger::setup_logger;

#[tokio::main]
async fn main() -> Result<(), InitProcessError> {
    let config = AppConfig::from_env()?;
    setup_logger(&config.log)?;

    println!("\n{}", "=".repeat(60));
    println!("{:^60}", "PROJECT GLASS v2.0");
    println!("{:^60}", "Advanced Virtual Internet Simulator");
    println!("{}", "=".repeat(60));

    // ネットワークの初期化
    let mut manager = NetworkManager::new(&config, Box::new(RandomIds));
    manager.setup_network();
    let dashboard = manager.dashboard();
    println!("ネットワークの初期化が完了しました: サーバー{}台", dashboard.servers_total);

    if let Err(e) = cli::run(&mut manager, Pacing::new(config.presentation.pacing_ms)).await {
        println!("致命的なエラーが発生しました: {}", e);
        log::error!("致命的なエラー: {}", e);
    }

    println!("Project Glass v2.0 を終了しました");
    Ok(())
}
