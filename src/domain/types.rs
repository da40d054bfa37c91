// ==========================================
// 路线客户对账工具 - 领域类型定义
// ==========================================
// 职责: 路线号 / 客户号 / 路线白名单 / 路线号提取规则
// 红线: 路线号提取失败必须报错，不允许静默回落到 0 或空值
// ==========================================

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// 客户号（快照内唯一）
pub type CustomerNumber = i64;

/// 路线号（小整数，由 "2502-<n>" 提取）
pub type RouteNumber = u32;

/// 默认路线白名单
pub const DEFAULT_ROUTES: [RouteNumber; 6] = [5, 9, 11, 12, 33, 75];

/// 默认路线号前缀（工厂编码）
pub const DEFAULT_ROUTE_PREFIX: &str = "2502";

// ==========================================
// 数据来源 (Snapshot Source)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotSource {
    RouteCsv, // 路线优化 CSV 导出
    Database, // 客户数据库快照
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::RouteCsv => write!(f, "CSV"),
            SnapshotSource::Database => write!(f, "DB"),
        }
    }
}

// ==========================================
// 路线号解析错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteParseError {
    #[error("路线号格式不匹配: 期望 {prefix}-<数字>，实际 '{value}'")]
    PatternMismatch { prefix: String, value: String },

    #[error("路线号超出范围: '{0}'")]
    OutOfRange(String),

    #[error("路线号前缀无效: '{0}'")]
    InvalidPrefix(String),
}

// ==========================================
// RoutePattern - 路线号提取规则
// ==========================================
// 规则: 在原始字符串中查找 "<prefix>-<digits>"，取数字后缀
// 例: "2502-12" → 12, "2502-05" → 5
#[derive(Debug, Clone)]
pub struct RoutePattern {
    prefix: String,
    regex: Regex,
}

impl RoutePattern {
    /// 按前缀构建提取规则
    pub fn new(prefix: &str) -> Result<Self, RouteParseError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(RouteParseError::InvalidPrefix(prefix.to_string()));
        }

        let regex = Regex::new(&format!(r"{}-(\d+)", regex::escape(prefix)))
            .map_err(|_| RouteParseError::InvalidPrefix(prefix.to_string()))?;

        Ok(Self {
            prefix: prefix.to_string(),
            regex,
        })
    }

    /// 提取路线号
    ///
    /// # 返回
    /// - Ok(RouteNumber): 数字后缀
    /// - Err(PatternMismatch): 字符串不含 "<prefix>-<digits>"
    /// - Err(OutOfRange): 数字后缀超出 u32
    pub fn extract(&self, value: &str) -> Result<RouteNumber, RouteParseError> {
        let digits = self
            .regex
            .captures(value)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| RouteParseError::PatternMismatch {
                prefix: self.prefix.clone(),
                value: value.to_string(),
            })?;

        digits
            .as_str()
            .parse::<RouteNumber>()
            .map_err(|_| RouteParseError::OutOfRange(value.to_string()))
    }
}

// ==========================================
// RouteAllowList - 路线白名单
// ==========================================
// 只有白名单内的路线参与对账
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAllowList {
    routes: BTreeSet<RouteNumber>,
}

impl RouteAllowList {
    pub fn new<I: IntoIterator<Item = RouteNumber>>(routes: I) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    pub fn contains(&self, route: RouteNumber) -> bool {
        self.routes.contains(&route)
    }

    /// 记录路线号可能为空（数据库侧 NULL），空值一律视为不在白名单内
    pub fn admits(&self, route: Option<RouteNumber>) -> bool {
        route.map_or(false, |r| self.contains(r))
    }

    /// 升序遍历
    pub fn iter(&self) -> impl Iterator<Item = RouteNumber> + '_ {
        self.routes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn to_vec(&self) -> Vec<RouteNumber> {
        self.iter().collect()
    }
}

impl Default for RouteAllowList {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_route_number() {
        let pattern = RoutePattern::new("2502").unwrap();
        assert_eq!(pattern.extract("2502-12"), Ok(12));
        assert_eq!(pattern.extract("2502-05"), Ok(5));
        assert_eq!(pattern.extract(" 2502-75 "), Ok(75));
    }

    #[test]
    fn test_extract_route_number_mismatch_fails() {
        let pattern = RoutePattern::new("2502").unwrap();
        for value in ["", "12", "2503-12", "2502-", "2502_12", "ROUTE 9"] {
            let result = pattern.extract(value);
            assert!(
                matches!(result, Err(RouteParseError::PatternMismatch { .. })),
                "'{}' 应解析失败, 实际 {:?}",
                value,
                result
            );
        }
    }

    #[test]
    fn test_extract_route_number_overflow() {
        let pattern = RoutePattern::new("2502").unwrap();
        let result = pattern.extract("2502-99999999999");
        assert!(matches!(result, Err(RouteParseError::OutOfRange(_))));
    }

    #[test]
    fn test_prefix_is_escaped() {
        // 前缀中的正则元字符按字面匹配
        let pattern = RoutePattern::new("25.2").unwrap();
        assert_eq!(pattern.extract("25.2-9"), Ok(9));
        assert!(pattern.extract("2502-9").is_err());
    }

    #[test]
    fn test_empty_prefix_rejected() {
        assert!(matches!(
            RoutePattern::new("  "),
            Err(RouteParseError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_default_allow_list() {
        let allow = RouteAllowList::default();
        assert_eq!(allow.to_vec(), vec![5, 9, 11, 12, 33, 75]);
        assert!(allow.contains(33));
        assert!(!allow.contains(1));
        assert!(!allow.admits(None));
        assert!(allow.admits(Some(9)));
    }
}
