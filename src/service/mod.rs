pub mod billing;
pub mod context;
pub mod coverage;
pub mod duplicate;
pub mod matching;
pub mod math;
pub mod summary;
pub mod validator;

pub use context::{AppealUrgency, CheckContext};
pub use validator::{run_all_validations, ValidatorService};

/// 金额展示: 两位小数, 带 `$` 前缀
pub(crate) fn money(value: f64) -> String {
    format!("${:.2}", value)
}
