//! 诊断服务主程序

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use derma_core::{fixtures, DermaError, Result};
use derma_gateway::{
    DiagnosisGateway, HttpGateway, HttpGatewayConfig, MockGateway, MockGatewayConfig,
};
use derma_store::RecordStore;
use derma_web::{ApiServer, AppState};

mod config;
use config::AppConfig;

/// 诊断服务命令行参数
#[derive(Parser, Debug)]
#[command(name = "derma-server")]
#[command(about = "皮肤病变AI诊断工作流服务")]
struct Args {
    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 使用Mock网关
    #[arg(long)]
    mock: bool,

    /// Mock随机种子
    #[arg(long)]
    mock_seed: Option<u64>,

    /// 后端服务地址
    #[arg(long)]
    endpoint: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.mock {
        config.gateway.use_mock = true;
    }
    if let Some(seed) = args.mock_seed {
        config.gateway.mock_seed = seed;
    }
    if let Some(endpoint) = &args.endpoint {
        config.gateway.endpoint = endpoint.clone();
        config.gateway.use_mock = false;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    info!("启动皮肤病变诊断服务...");

    let mut config = AppConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    info!("服务配置:");
    info!("  监听地址: {}:{}", config.server.host, config.server.port);
    info!("  网关模式: {}", if config.gateway.use_mock { "mock" } else { "http" });
    if !config.gateway.use_mock {
        info!("  后端地址: {}", config.gateway.endpoint);
    }

    // 构建网关
    let gateway: Arc<dyn DiagnosisGateway> = if config.gateway.use_mock {
        Arc::new(MockGateway::new(MockGatewayConfig {
            seed: config.gateway.mock_seed,
            latency_enabled: config.gateway.mock_latency,
        }))
    } else {
        Arc::new(HttpGateway::new(HttpGatewayConfig {
            endpoint: config.gateway.endpoint.clone(),
            request_timeout: Duration::from_secs(config.gateway.request_timeout_secs),
        })?)
    };

    // 预置演示数据集
    let store = RecordStore::with_records(fixtures::seed_records());
    info!("已载入 {} 条演示诊断记录", store.len());

    let state = AppState::new(store, gateway);
    let server = ApiServer::new(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    if let Err(e) = server.run(&addr).await {
        error!("服务器启动失败: {}", e);
        return Err(DermaError::Internal(e.to_string()));
    }

    Ok(())
}
