//! 数据湖配置文件
//!
//! 初始化成功后把项目、环境、区域和三个存储桶名称写入 JSON 文件，
//! 供下游作业读取。

use crate::config::{Environment, Settings};
use crate::tier::Tier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件读写错误
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("无法读写 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("数据湖配置文件 {} 格式错误: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 各层级的存储桶名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBuckets {
    pub bronze: String,
    pub silver: String,
    pub gold: String,
}

impl TierBuckets {
    pub fn get(&self, tier: Tier) -> &str {
        match tier {
            Tier::Bronze => &self.bronze,
            Tier::Silver => &self.silver,
            Tier::Gold => &self.gold,
        }
    }
}

/// 写入 `data_lake_config.json` 的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLakeSummary {
    pub project: String,
    pub environment: Environment,
    pub region: String,
    pub buckets: TierBuckets,
}

impl DataLakeSummary {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            project: settings.project.clone(),
            environment: settings.environment,
            region: settings.region.clone(),
            buckets: TierBuckets {
                bronze: settings.bucket_name(Tier::Bronze),
                silver: settings.bucket_name(Tier::Silver),
                gold: settings.bucket_name(Tier::Gold),
            },
        }
    }

    /// 以两个空格缩进的 JSON 写入 `path`，已存在的文件会被覆盖。
    pub fn write_to(&self, path: &Path) -> Result<(), SummaryError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SummaryError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SummaryError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_from(path: &Path) -> Result<Self, SummaryError> {
        let content = fs::read_to_string(path).map_err(|source| SummaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SummaryError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
