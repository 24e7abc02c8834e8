//! 存储桶管理接口
//!
//! 初始化流程只依赖 [`BucketAdmin`]，真实实现见 [`crate::s3::client::S3AdminClient`]。

use crate::lifecycle::LifecyclePolicy;
use crate::s3::error::S3Error;
use async_trait::async_trait;

/// 创建存储桶的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// 新建成功
    Created,
    /// 存储桶已存在且属于当前账号
    AlreadyOwned,
}

/// 存储桶标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceTag {
    pub key: &'static str,
    pub value: String,
}

impl ComplianceTag {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// S3 存储桶管理操作
///
/// 每个方法对应一次独立的管理接口调用，调用之间没有事务语义。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BucketAdmin: Send + Sync {
    /// 在 `region` 中创建存储桶。已属于当前账号的存储桶视为成功。
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<CreateOutcome, S3Error>;

    /// 开启版本控制
    async fn enable_versioning(&self, bucket: &str) -> Result<(), S3Error>;

    /// 开启默认的 AES256 服务端加密
    async fn enable_default_encryption(&self, bucket: &str) -> Result<(), S3Error>;

    /// 阻止一切公共访问
    async fn block_public_access(&self, bucket: &str) -> Result<(), S3Error>;

    /// 设置生命周期策略
    async fn put_lifecycle(&self, bucket: &str, policy: &LifecyclePolicy) -> Result<(), S3Error>;

    /// 覆盖存储桶标签
    async fn put_tags(&self, bucket: &str, tags: &[ComplianceTag]) -> Result<(), S3Error>;
}

#[async_trait]
impl<T: BucketAdmin + ?Sized> BucketAdmin for &T {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<CreateOutcome, S3Error> {
        (**self).create_bucket(bucket, region).await
    }

    async fn enable_versioning(&self, bucket: &str) -> Result<(), S3Error> {
        (**self).enable_versioning(bucket).await
    }

    async fn enable_default_encryption(&self, bucket: &str) -> Result<(), S3Error> {
        (**self).enable_default_encryption(bucket).await
    }

    async fn block_public_access(&self, bucket: &str) -> Result<(), S3Error> {
        (**self).block_public_access(bucket).await
    }

    async fn put_lifecycle(&self, bucket: &str, policy: &LifecyclePolicy) -> Result<(), S3Error> {
        (**self).put_lifecycle(bucket, policy).await
    }

    async fn put_tags(&self, bucket: &str, tags: &[ComplianceTag]) -> Result<(), S3Error> {
        (**self).put_tags(bucket, tags).await
    }
}
