//! 生命周期策略模块
//!
//! 每个层级对应一条固定的生命周期规则，按对象年龄把数据转移到更便宜的存储类别。

use crate::tier::Tier;
use aws_sdk_s3::error::BuildError;
use aws_sdk_s3::types::{
    BucketLifecycleConfiguration, ExpirationStatus, LifecycleRule, LifecycleRuleFilter,
    Transition as S3Transition, TransitionStorageClass,
};

/// 生命周期转换的目标存储类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// 低频访问（`STANDARD_IA`）
    InfrequentAccess,
    /// 归档（`GLACIER`）
    Archive,
}

impl StorageClass {
    /// S3 API 中使用的存储类别名称
    pub fn as_str(self) -> &'static str {
        match self {
            StorageClass::InfrequentAccess => "STANDARD_IA",
            StorageClass::Archive => "GLACIER",
        }
    }

    fn to_sdk(self) -> TransitionStorageClass {
        match self {
            StorageClass::InfrequentAccess => TransitionStorageClass::StandardIa,
            StorageClass::Archive => TransitionStorageClass::Glacier,
        }
    }
}

/// 对象达到 `days` 天后转移到 `storage_class`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub days: i32,
    pub storage_class: StorageClass,
}

impl Transition {
    const fn new(days: i32, storage_class: StorageClass) -> Self {
        Self {
            days,
            storage_class,
        }
    }
}

/// 单条规则的生命周期策略，规则作用于桶内全部对象。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub rule_id: &'static str,
    pub transitions: &'static [Transition],
}

const IA_AND_GLACIER_RULE: &str = "Move to IA and Glacier";
const IA_RULE: &str = "Move to IA";

/// 原始数据：60 天后低频访问，180 天后归档
const BRONZE_TRANSITIONS: &[Transition] = &[
    Transition::new(60, StorageClass::InfrequentAccess),
    Transition::new(180, StorageClass::Archive),
];

/// 处理后数据：30 天后低频访问，90 天后归档
const SILVER_TRANSITIONS: &[Transition] = &[
    Transition::new(30, StorageClass::InfrequentAccess),
    Transition::new(90, StorageClass::Archive),
];

/// 分析数据：30 天后低频访问
const GOLD_TRANSITIONS: &[Transition] = &[Transition::new(30, StorageClass::InfrequentAccess)];

/// 根据层级选择生命周期策略。
///
/// # 参数
///
/// * `tier` - 数据层级。
///
/// # 返回值
///
/// 该层级固定的生命周期策略。
pub fn lifecycle_policy(tier: Tier) -> LifecyclePolicy {
    match tier {
        Tier::Bronze => LifecyclePolicy {
            rule_id: IA_AND_GLACIER_RULE,
            transitions: BRONZE_TRANSITIONS,
        },
        Tier::Silver => LifecyclePolicy {
            rule_id: IA_AND_GLACIER_RULE,
            transitions: SILVER_TRANSITIONS,
        },
        Tier::Gold => LifecyclePolicy {
            rule_id: IA_RULE,
            transitions: GOLD_TRANSITIONS,
        },
    }
}

impl LifecyclePolicy {
    /// 转换为 S3 SDK 的生命周期配置。
    ///
    /// 规则状态为 `Enabled`，过滤前缀为空字符串，即匹配所有对象。
    ///
    /// # Errors
    ///
    /// 只有 SDK builder 缺少必填字段时才会返回错误。
    pub fn to_bucket_configuration(&self) -> Result<BucketLifecycleConfiguration, BuildError> {
        let transitions = self
            .transitions
            .iter()
            .map(|t| {
                S3Transition::builder()
                    .days(t.days)
                    .storage_class(t.storage_class.to_sdk())
                    .build()
            })
            .collect();

        let rule = LifecycleRule::builder()
            .id(self.rule_id)
            .status(ExpirationStatus::Enabled)
            .filter(LifecycleRuleFilter::builder().prefix("").build())
            .set_transitions(Some(transitions))
            .build()?;

        BucketLifecycleConfiguration::builder().rules(rule).build()
    }
}
