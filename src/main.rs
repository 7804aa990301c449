use claims_validator::models::ClaimsPacket;
use claims_validator::{api, export, AppConfig, AppError, ValidatorService};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

/// 命令行模式: 校验一个文档包 JSON 文件, 报告打印到 stdout;
/// 可选第二个参数为 CSV 导出路径
fn run_once(service: &ValidatorService, input: &Path, csv_path: Option<&Path>) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(input)?;
    let packet: ClaimsPacket = serde_json::from_str(&raw)?;
    let report = service.validate_packet(&packet);

    if let Some(csv_path) = csv_path {
        export::export_to_csv(&report.validation_results, csv_path)?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Loaded config: {:?}", config);

    let service = Arc::new(ValidatorService::new(config.validation.clone()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(input) = args.first() {
        run_once(&service, Path::new(input), args.get(1).map(Path::new))?;
        return Ok(());
    }

    let app = api::router(service).layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/validate        - single packet report");
    info!("  POST /api/validate/batch  - multiple packets");
    info!("  POST /api/validate/csv    - findings as CSV");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
