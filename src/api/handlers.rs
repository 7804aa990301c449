use crate::error::AppError;
use crate::export::results_to_csv;
use crate::models::{ClaimsPacket, PacketReport};
use crate::service::ValidatorService;
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 多个文档包
#[derive(Debug, Deserialize)]
pub struct BatchValidateRequest {
    pub packets: Vec<ClaimsPacket>,
}

/// 批量校验响应体
#[derive(Debug, Serialize)]
pub struct BatchValidateResponse {
    pub success: bool,
    pub message: String,
    pub reports: Option<Vec<PacketReport>>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 校验在 rayon 上并行执行, 放到阻塞线程池避免占住 tokio worker
async fn run_packet(service: Arc<ValidatorService>, packet: ClaimsPacket) -> Result<PacketReport, AppError> {
    let report = tokio::task::spawn_blocking(move || service.validate_packet(&packet)).await?;
    Ok(report)
}

/// 单个文档包校验
pub async fn validate(
    State(service): State<Arc<ValidatorService>>,
    Json(packet): Json<ClaimsPacket>,
) -> Result<Response, AppError> {
    let report = run_packet(service, packet).await?;
    Ok((StatusCode::OK, Json(report)).into_response())
}

/// 批量校验
pub async fn validate_batch(
    State(service): State<Arc<ValidatorService>>,
    Json(req): Json<BatchValidateRequest>,
) -> Response {
    let packet_count = req.packets.len();
    let result = tokio::task::spawn_blocking(move || service.validate_batch(&req.packets)).await;

    match result {
        Ok(reports) => {
            let findings: usize = reports.iter().map(|r| r.severity_counts.total()).sum();
            let flagged: usize = reports.iter().map(|r| r.financial_summary.flagged_issues).sum();
            let response = BatchValidateResponse {
                success: true,
                message: format!(
                    "Validated {} packets, {} findings, {} flagged issues",
                    packet_count, findings, flagged
                ),
                reports: Some(reports),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("batch validation task failed: {}", e);
            let response = BatchValidateResponse {
                success: false,
                message: format!("Error: {}", e),
                reports: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}

/// 校验并以 CSV 返回发现项
pub async fn validate_csv(
    State(service): State<Arc<ValidatorService>>,
    Json(packet): Json<ClaimsPacket>,
) -> Result<Response, AppError> {
    let report = run_packet(service, packet).await?;
    let body = results_to_csv(&report.validation_results)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}
