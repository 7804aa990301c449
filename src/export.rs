use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::error::AppError;
use crate::models::ValidationResult;

const HEADER: [&str; 7] = [
    "check_name",
    "status",
    "severity",
    "detail",
    "potential_overcharge",
    "recommendation",
    "document_ids",
];

fn option_to_csv<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn write_results<W: Write>(writer: &mut Writer<W>, results: &[ValidationResult]) -> Result<(), AppError> {
    writer.write_record(HEADER)?;
    for result in results {
        writer.write_record(&[
            result.check_name.as_str().to_string(),
            result.status.as_str().to_string(),
            result.severity.as_str().to_string(),
            result.detail.clone(),
            option_to_csv(&result.potential_overcharge.map(|v| format!("{:.2}", v))),
            option_to_csv(&result.recommendation),
            // 多个文档 ID 用分号分隔
            result.document_ids.join(";"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// 校验结果 -> CSV 文本 (含表头)
pub fn results_to_csv(results: &[ValidationResult]) -> Result<String, AppError> {
    let mut writer = Writer::from_writer(Vec::new());
    write_results(&mut writer, results)?;
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 导出校验结果到 CSV 文件
pub fn export_to_csv(results: &[ValidationResult], output_path: &Path) -> Result<(), AppError> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    write_results(&mut writer, results)?;
    tracing::info!("Exported {} findings to {}", results.len(), output_path.display());
    Ok(())
}
