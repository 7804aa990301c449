//! 宽松反序列化
//!
//! 抽取服务给出的字段类型并不可靠: 金额可能是字符串, 编码可能是数字,
//! 列表可能是 null。这里的函数把类型不符的值当作缺失处理, 从不返回错误,
//! 因此任何一个字段异常都只会关闭依赖它的那一项检查。

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 金额: 数字或数字字符串 (允许 `$` 和千分位逗号)
pub fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_amount(&Value::deserialize(deserializer)?))
}

/// 日期: ISO `YYYY-MM-DD`, 可带时间后缀; 解析失败视为缺失
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_date(&Value::deserialize(deserializer)?))
}

/// 文本: 字符串或数字 (编码经常被抽成数字), 空白串视为缺失
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_text(&Value::deserialize(deserializer)?))
}

pub fn count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

/// 对象列表: 非数组视为空, 无法解析的元素被丢弃
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// 文本列表 (remark codes, 诊断编码等)
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(parse_text).collect(),
        _ => Vec::new(),
    })
}

/// 嵌套信息块 (patient / provider / insurance): 非对象视为空块
pub fn block<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(parse_block(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn optional_block<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(parse_block(Value::deserialize(deserializer)?))
}

pub fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ','))
                .collect();
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    let day = match raw.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &raw[..idx],
        _ => raw,
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub fn parse_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_block<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_object() {
        serde_json::from_value(value).ok()
    } else {
        None
    }
}
