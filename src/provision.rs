//! 存储桶初始化流程
//!
//! 对每个层级依次执行：创建存储桶、开启版本控制、开启默认加密、
//! 阻止公共访问、设置生命周期策略、添加合规标签。
//! 某一步失败时记录错误并跳过该存储桶的剩余步骤，已完成的步骤不会回滚。

use crate::config::{ConfigError, Settings};
use crate::lifecycle::lifecycle_policy;
use crate::s3::{BucketAdmin, ComplianceTag, CreateOutcome, S3Error};
use crate::summary::{DataLakeSummary, SummaryError};
use crate::tier::Tier;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

/// 单个存储桶的初始化记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRecord {
    pub tier: Tier,
    pub name: String,
    pub region: String,
}

/// 初始化步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreateBucket,
    Versioning,
    Encryption,
    PublicAccessBlock,
    Lifecycle,
    Tagging,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CreateBucket => "创建存储桶",
            Step::Versioning => "开启版本控制",
            Step::Encryption => "开启默认加密",
            Step::PublicAccessBlock => "阻止公共访问",
            Step::Lifecycle => "设置生命周期策略",
            Step::Tagging => "添加合规标签",
        };
        f.write_str(name)
    }
}

/// 某个步骤失败
#[derive(Debug, Error)]
#[error("{step}失败: {source}")]
pub struct StepFailure {
    pub step: Step,
    #[source]
    pub source: S3Error,
}

impl StepFailure {
    fn at(step: Step) -> impl FnOnce(S3Error) -> StepFailure {
        move |source| StepFailure { step, source }
    }
}

/// 单个存储桶的初始化结果
#[derive(Debug)]
pub struct BucketReport {
    pub record: BucketRecord,
    pub outcome: Result<CreateOutcome, StepFailure>,
}

impl BucketReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// 整个数据湖的初始化结果
#[derive(Debug)]
pub struct DataLakeReport {
    /// 按 bronze、silver、gold 顺序排列
    pub buckets: Vec<BucketReport>,
    /// 全部成功时写入的配置文件路径
    pub summary_path: Option<PathBuf>,
}

impl DataLakeReport {
    pub fn is_success(&self) -> bool {
        self.buckets.iter().all(BucketReport::is_success)
    }

    /// 失败的存储桶
    pub fn failures(&self) -> impl Iterator<Item = &BucketReport> {
        self.buckets.iter().filter(|b| !b.is_success())
    }
}

/// 初始化前或结束后无法继续的错误
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// 某个层级存储桶的合规标签，顺序固定。
pub fn compliance_tags(settings: &Settings, tier: Tier) -> Vec<ComplianceTag> {
    vec![
        ComplianceTag::new("Project", settings.project_tag.as_str()),
        ComplianceTag::new("Environment", settings.environment.as_str()),
        ComplianceTag::new("DataTier", tier.as_str()),
        ComplianceTag::new("Contains-PHI", "True"),
        ComplianceTag::new("Compliance", "HIPAA"),
    ]
}

/// 数据湖存储桶初始化器
#[derive(Debug)]
pub struct Provisioner<A> {
    admin: A,
    settings: Settings,
}

impl<A: BucketAdmin> Provisioner<A> {
    pub fn new(admin: A, settings: Settings) -> Self {
        Self { admin, settings }
    }

    /// 初始化单个存储桶。
    ///
    /// # 参数
    ///
    /// * `record` - 要初始化的存储桶。
    ///
    /// # 返回值
    ///
    /// 初始化结果。失败时结果中包含失败的步骤，错误已经写入日志。
    pub async fn provision_bucket(&self, record: &BucketRecord) -> BucketReport {
        info!("正在创建 {} 层存储桶: {}", record.tier, record.name);

        let outcome = self.apply_steps(record).await;
        if let Err(failure) = &outcome {
            error!(
                bucket = %record.name,
                step = %failure.step,
                code = failure.source.code().unwrap_or("-"),
                "存储桶初始化失败: {}",
                failure.source
            );
        }

        BucketReport {
            record: record.clone(),
            outcome,
        }
    }

    async fn apply_steps(&self, record: &BucketRecord) -> Result<CreateOutcome, StepFailure> {
        let bucket = record.name.as_str();
        let created = self
            .admin
            .create_bucket(bucket, &record.region)
            .await
            .map_err(StepFailure::at(Step::CreateBucket))?;
        match created {
            CreateOutcome::Created => info!("存储桶 {bucket} 创建成功"),
            CreateOutcome::AlreadyOwned => info!("存储桶 {bucket} 已存在且属于当前账号"),
        }

        self.admin
            .enable_versioning(bucket)
            .await
            .map_err(StepFailure::at(Step::Versioning))?;
        info!("已为 {bucket} 开启版本控制");

        self.admin
            .enable_default_encryption(bucket)
            .await
            .map_err(StepFailure::at(Step::Encryption))?;
        info!("已为 {bucket} 开启默认加密");

        self.admin
            .block_public_access(bucket)
            .await
            .map_err(StepFailure::at(Step::PublicAccessBlock))?;
        info!("已阻止 {bucket} 的公共访问");

        let policy = lifecycle_policy(record.tier);
        self.admin
            .put_lifecycle(bucket, &policy)
            .await
            .map_err(StepFailure::at(Step::Lifecycle))?;
        info!("已为 {bucket} 设置 {} 层生命周期策略", record.tier);

        let tags = compliance_tags(&self.settings, record.tier);
        self.admin
            .put_tags(bucket, &tags)
            .await
            .map_err(StepFailure::at(Step::Tagging))?;
        info!("已为 {bucket} 添加合规标签");

        Ok(created)
    }

    /// 初始化全部三个层级的存储桶。
    ///
    /// 即使某个存储桶失败，其余层级也会继续执行。全部成功时把存储桶信息
    /// 写入配置中的输出文件。
    ///
    /// # Errors
    ///
    /// 存储桶名称不合法（此时不会发出任何请求）或输出文件写入失败时返回错误。
    /// 单个存储桶的失败不作为错误返回，而是记录在 [`DataLakeReport`] 中。
    pub async fn provision_data_lake(&self) -> Result<DataLakeReport, ProvisionError> {
        let records = self.settings.bucket_records()?;

        let mut buckets = Vec::with_capacity(records.len());
        for record in &records {
            buckets.push(self.provision_bucket(record).await);
        }

        let mut report = DataLakeReport {
            buckets,
            summary_path: None,
        };

        if !report.is_success() {
            let failed: Vec<_> = report.failures().map(|b| b.record.name.as_str()).collect();
            error!("部分数据湖存储桶创建失败: {}", failed.join(", "));
            return Ok(report);
        }

        info!("数据湖 S3 存储桶创建成功");
        for record in &records {
            info!(
                "{} 层: {} ({})",
                record.tier,
                record.name,
                record.tier.description()
            );
        }

        let summary = DataLakeSummary::from_settings(&self.settings);
        summary.write_to(&self.settings.output)?;
        info!("配置已保存到 {}", self.settings.output.display());
        report.summary_path = Some(self.settings.output.clone());

        Ok(report)
    }
}
