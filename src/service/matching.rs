//! 跨文档匹配的启发式规则: 机构名称模糊比对 + 服务日期重叠。
//! 日期信息不足时一律放行。

use chrono::NaiveDate;

/// 常见机构缩写 (全称, 缩写), 按顺序替换
const ABBREVIATIONS: [(&str, &str); 4] = [
    ("hospital", "hosp"),
    ("medical", "med"),
    ("center", "ctr"),
    ("healthcare", "health"),
];

/// 名称归一化: 小写 + 去首尾空白
pub fn normalize_provider_name(name: Option<&str>) -> String {
    name.map(|n| n.trim().to_lowercase()).unwrap_or_default()
}

/// 两个 (已归一化的) 机构名称是否可能是同一家
pub fn providers_match(name1: &str, name2: &str) -> bool {
    if name1.is_empty() || name2.is_empty() {
        return false;
    }
    if name1 == name2 || name1.contains(name2) || name2.contains(name1) {
        return true;
    }

    let folded1 = fold_abbreviations(name1);
    let folded2 = fold_abbreviations(name2);
    folded1 == folded2 || folded1.contains(&folded2) || folded2.contains(&folded1)
}

fn fold_abbreviations(name: &str) -> String {
    ABBREVIATIONS
        .iter()
        .fold(name.to_string(), |acc, (full, abbr)| acc.replace(full, abbr))
}

/// 服务日期区间是否重叠
///
/// - 四个日期全缺失: 放行
/// - 至少一方没有结束日期且双方都有代表日期: 代表日期需相等
/// - 双方区间完整: 区间相交
/// - 其余部分信息的情况: 放行
pub fn dates_overlap(
    start1: Option<NaiveDate>,
    end1: Option<NaiveDate>,
    start2: Option<NaiveDate>,
    end2: Option<NaiveDate>,
) -> bool {
    if start1.is_none() && end1.is_none() && start2.is_none() && end2.is_none() {
        return true;
    }

    let date1 = start1.or(end1);
    let date2 = start2.or(end2);

    if let (Some(d1), Some(d2)) = (date1, date2) {
        if end1.is_none() || end2.is_none() {
            return d1 == d2;
        }
    }

    if let (Some(s1), Some(e1), Some(s2), Some(e2)) = (start1, end1, start2, end2) {
        return s1 <= e2 && s2 <= e1;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 3, d)
    }

    #[test]
    fn provider_names_match_fuzzily() {
        let n = |s: &str| normalize_provider_name(Some(s));
        assert!(providers_match(&n("Hospital A"), &n("  hospital a ")));
        assert!(providers_match(&n("Mercy General Hospital"), &n("Mercy General")));
        assert!(providers_match(&n("St. Mary Medical Center"), &n("St. Mary Med Ctr")));
        assert!(providers_match(&n("Valley Healthcare"), &n("valley health")));
        assert!(!providers_match(&n("Hospital A"), &n("Clinic B")));
        assert!(!providers_match("", &n("Clinic B")));
        assert!(!providers_match("", ""));
    }

    #[test]
    fn missing_dates_are_permissive() {
        assert!(dates_overlap(None, None, None, None));
        // 一方完整区间, 另一方无日期
        assert!(dates_overlap(day(1), day(5), None, None));
    }

    #[test]
    fn single_dates_require_equality() {
        assert!(dates_overlap(day(3), None, day(3), None));
        assert!(!dates_overlap(day(3), None, day(4), None));
        // 只有结束日期时用结束日期作代表
        assert!(dates_overlap(None, day(4), day(4), None));
        // 一方有完整区间, 另一方只有开始日期: 仍按代表日期比较
        assert!(!dates_overlap(day(1), day(10), day(5), None));
    }

    #[test]
    fn complete_ranges_must_intersect() {
        assert!(dates_overlap(day(1), day(5), day(5), day(9)));
        assert!(dates_overlap(day(4), day(6), day(1), day(10)));
        assert!(!dates_overlap(day(1), day(4), day(5), day(9)));
    }
}
