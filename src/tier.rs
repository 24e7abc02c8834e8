//! 数据湖分层定义
//!
//! 数据湖按照 bronze / silver / gold 三层组织：
//! - bronze：原始数据
//! - silver：清洗、转换后的数据
//! - gold：可直接用于分析的数据

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 数据湖中的一个存储层级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

/// 无法识别的层级名称
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("未知的数据层级 `{0}`（应为 bronze、silver 或 gold）")]
pub struct UnknownTier(pub String);

impl Tier {
    /// 按创建顺序排列的全部层级
    pub const ALL: [Tier; 3] = [Tier::Bronze, Tier::Silver, Tier::Gold];

    /// 层级的小写名称，同时用于存储桶命名和 `DataTier` 标签。
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
        }
    }

    /// 层级用途说明，用于日志输出。
    pub fn description(self) -> &'static str {
        match self {
            Tier::Bronze => "raw data storage",
            Tier::Silver => "processed/transformed data",
            Tier::Gold => "analytics-ready data",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}
