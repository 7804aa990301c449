use chrono::{Local, NaiveDate};

use crate::config::ValidationSettings;

/// 一次校验运行的只读上下文: 阈值 + 作为"今天"的日期
#[derive(Debug, Clone, PartialEq)]
pub struct CheckContext {
    pub settings: ValidationSettings,
    pub today: NaiveDate,
}

impl CheckContext {
    pub fn new(settings: ValidationSettings, today: NaiveDate) -> Self {
        Self { settings, today }
    }

    /// 默认阈值, 以本地日期为今天
    pub fn today() -> Self {
        Self::new(ValidationSettings::default(), Local::now().date_naive())
    }

    pub fn tolerance(&self) -> f64 {
        self.settings.tolerance
    }

    /// 两个金额之差是否超出容差
    pub fn differs(&self, a: f64, b: f64) -> bool {
        (a - b).abs() > self.settings.tolerance
    }

    pub fn appeal_urgency(&self, deadline: Option<NaiveDate>) -> AppealUrgency {
        let Some(deadline) = deadline else {
            return AppealUrgency::Unknown;
        };
        let days_remaining = (deadline - self.today).num_days();
        if days_remaining <= self.settings.urgent_days {
            AppealUrgency::Urgent
        } else if days_remaining <= self.settings.soon_days {
            AppealUrgency::Soon
        } else {
            AppealUrgency::Normal
        }
    }

    pub fn days_until(&self, date: NaiveDate) -> i64 {
        (date - self.today).num_days()
    }
}

impl Default for CheckContext {
    fn default() -> Self {
        Self::today()
    }
}

/// 申诉截止日的紧急程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppealUrgency {
    Urgent,
    Soon,
    Normal,
    Unknown,
}
