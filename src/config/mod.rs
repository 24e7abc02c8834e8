//! 数据湖初始化工具的配置模块。
//!
//! 配置来自命令行参数和环境变量（启动时会先加载 `.env` 文件），
//! 并负责根据配置创建 S3 客户端。

use crate::provision::BucketRecord;
use crate::tier::Tier;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_config::SdkConfig;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client;
use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// 默认项目名称
pub const DEFAULT_PROJECT: &str = "patient-outcome";

/// 默认区域
pub const DEFAULT_REGION: &str = "us-west-2";

/// 默认的 `Project` 标签值
pub const DEFAULT_PROJECT_TAG: &str = "PatientOutcomePrediction";

/// 默认的输出文件
pub const DEFAULT_OUTPUT: &str = "data_lake_config.json";

/// 部署环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("存储桶名称 `{name}` 不合法: {reason}")]
    InvalidBucketName { name: String, reason: &'static str },
}

/// 运行配置
#[derive(Debug, Clone, Parser)]
#[command(
    name = "data-lake-provisioner",
    version,
    about = "创建医疗数据湖 bronze/silver/gold 三层 S3 存储桶"
)]
pub struct Settings {
    /// 项目名称，作为存储桶名称前缀
    #[arg(long, env = "DATA_LAKE_PROJECT", default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// 部署环境
    #[arg(long, env = "DATA_LAKE_ENVIRONMENT", value_enum, default_value_t = Environment::Dev)]
    pub environment: Environment,

    /// 创建存储桶的 AWS 区域
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// `Project` 合规标签的值
    #[arg(long, env = "DATA_LAKE_PROJECT_TAG", default_value = DEFAULT_PROJECT_TAG)]
    pub project_tag: String,

    /// 存储桶信息输出文件
    #[arg(long, env = "DATA_LAKE_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// S3 兼容服务的端点 URL
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// 使用路径风格访问存储桶（MinIO 等本地服务需要）
    #[arg(long, env = "S3_FORCE_PATH_STYLE", value_parser = FalseyValueParser::new())]
    pub force_path_style: bool,
}

impl Settings {
    /// 使用默认值创建配置，只指定项目、环境和区域。
    pub fn new(project: impl Into<String>, environment: Environment, region: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            environment,
            region: region.into(),
            project_tag: DEFAULT_PROJECT_TAG.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            endpoint_url: None,
            force_path_style: false,
        }
    }

    /// 指定层级的存储桶名称：`{project}-{environment}-{tier}-data`
    pub fn bucket_name(&self, tier: Tier) -> String {
        format!("{}-{}-{}-data", self.project, self.environment, tier)
    }

    /// 生成三个层级的存储桶记录。
    ///
    /// # Errors
    ///
    /// 任一存储桶名称不符合 S3 命名规则时返回 [`ConfigError::InvalidBucketName`]。
    pub fn bucket_records(&self) -> Result<Vec<BucketRecord>, ConfigError> {
        Tier::ALL
            .iter()
            .map(|&tier| {
                let name = self.bucket_name(tier);
                validate_bucket_name(&name)?;
                Ok(BucketRecord {
                    tier,
                    name,
                    region: self.region.clone(),
                })
            })
            .collect()
    }
}

/// 校验 S3 存储桶命名规则。
///
/// # 参数
///
/// * `name` - 存储桶名称。
///
/// # Errors
///
/// 名称长度不在 3..=63、包含非法字符、首尾不是字母数字、含有 `..`
/// 或形如 IPv4 地址时返回错误。
pub fn validate_bucket_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason| {
        Err(ConfigError::InvalidBucketName {
            name: name.to_string(),
            reason,
        })
    };

    if !(3..=63).contains(&name.len()) {
        return invalid("长度必须在 3 到 63 个字符之间");
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return invalid("只能包含小写字母、数字、连字符和点");
    }
    let alnum = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = name.as_bytes();
    if !alnum(bytes[0]) || !alnum(bytes[bytes.len() - 1]) {
        return invalid("必须以字母或数字开头和结尾");
    }
    if name.contains("..") {
        return invalid("不能包含连续的点");
    }
    if name.parse::<Ipv4Addr>().is_ok() {
        return invalid("不能是 IP 地址格式");
    }
    Ok(())
}

/// 根据配置创建 S3 客户端。
///
/// 凭据使用 AWS 标准的凭据链（环境变量、配置文件、实例角色等）。
pub async fn build_s3_client(settings: &Settings) -> Client {
    let region_provider = RegionProviderChain::first_try(Some(Region::new(settings.region.clone())));

    let shared_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;

    Client::from_conf(s3_config(settings, &shared_config))
}

/// 在共享 AWS 配置之上应用端点和路径风格设置。
pub fn s3_config(settings: &Settings, shared_config: &SdkConfig) -> aws_sdk_s3::Config {
    let mut builder = aws_sdk_s3::config::Builder::from(shared_config)
        .force_path_style(settings.force_path_style);
    if let Some(endpoint) = &settings.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    builder.build()
}
