use async_trait::async_trait;
use data_lake_provisioner::lifecycle::LifecyclePolicy;
use data_lake_provisioner::provision::Step;
use data_lake_provisioner::s3::{BucketAdmin, ComplianceTag, CreateOutcome, S3Error};
use data_lake_provisioner::summary::DataLakeSummary;
use data_lake_provisioner::{Environment, Provisioner, Settings, Tier};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// 内存中的 S3，只记录存储桶及其配置
#[derive(Default)]
struct FakeS3 {
    owned: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    tags: Mutex<BTreeMap<String, Vec<ComplianceTag>>>,
    lifecycles: Mutex<BTreeMap<String, LifecyclePolicy>>,
    /// 对该存储桶的 PutBucketTagging 返回 AccessDenied
    deny_tagging_for: Option<String>,
}

impl FakeS3 {
    fn record(&self, call: &str, bucket: &str) {
        self.calls.lock().unwrap().push(format!("{call} {bucket}"));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BucketAdmin for FakeS3 {
    async fn create_bucket(&self, bucket: &str, _region: &str) -> Result<CreateOutcome, S3Error> {
        self.record("CreateBucket", bucket);
        if self.owned.lock().unwrap().insert(bucket.to_string()) {
            Ok(CreateOutcome::Created)
        } else {
            Ok(CreateOutcome::AlreadyOwned)
        }
    }

    async fn enable_versioning(&self, bucket: &str) -> Result<(), S3Error> {
        self.record("PutBucketVersioning", bucket);
        Ok(())
    }

    async fn enable_default_encryption(&self, bucket: &str) -> Result<(), S3Error> {
        self.record("PutBucketEncryption", bucket);
        Ok(())
    }

    async fn block_public_access(&self, bucket: &str) -> Result<(), S3Error> {
        self.record("PutPublicAccessBlock", bucket);
        Ok(())
    }

    async fn put_lifecycle(&self, bucket: &str, policy: &LifecyclePolicy) -> Result<(), S3Error> {
        self.record("PutBucketLifecycleConfiguration", bucket);
        self.lifecycles
            .lock()
            .unwrap()
            .insert(bucket.to_string(), *policy);
        Ok(())
    }

    async fn put_tags(&self, bucket: &str, tags: &[ComplianceTag]) -> Result<(), S3Error> {
        self.record("PutBucketTagging", bucket);
        if self.deny_tagging_for.as_deref() == Some(bucket) {
            return Err(S3Error::Service {
                operation: "PutBucketTagging",
                code: Some("AccessDenied".to_string()),
                message: "Access Denied".to_string(),
            });
        }
        self.tags
            .lock()
            .unwrap()
            .insert(bucket.to_string(), tags.to_vec());
        Ok(())
    }
}

fn settings_in(dir: &tempfile::TempDir) -> Settings {
    let mut settings = Settings::new("patient-outcome", Environment::Dev, "us-west-2");
    settings.output = dir.path().join("data_lake_config.json");
    settings
}

/// 集成测试：完整初始化流程
///
/// 验证三个存储桶按顺序配置，并写出配置文件
#[tokio::test]
async fn test_provision_data_lake_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    let provisioner = Provisioner::new(FakeS3::default(), settings.clone());

    let report = provisioner.provision_data_lake().await.unwrap();
    assert!(report.is_success());

    let summary = DataLakeSummary::read_from(&settings.output).unwrap();
    assert_eq!(summary, DataLakeSummary::from_settings(&settings));
    assert_eq!(summary.buckets.bronze, "patient-outcome-dev-bronze-data");
    assert_eq!(summary.buckets.silver, "patient-outcome-dev-silver-data");
    assert_eq!(summary.buckets.gold, "patient-outcome-dev-gold-data");
}

/// 集成测试：每个存储桶的调用顺序
#[tokio::test]
async fn test_calls_follow_step_order() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeS3::default();
    let settings = settings_in(&dir);
    let records = settings.bucket_records().unwrap();
    let provisioner = Provisioner::new(&fake, settings);
    provisioner.provision_bucket(&records[0]).await;

    assert_eq!(
        fake.calls(),
        [
            "CreateBucket patient-outcome-dev-bronze-data",
            "PutBucketVersioning patient-outcome-dev-bronze-data",
            "PutBucketEncryption patient-outcome-dev-bronze-data",
            "PutPublicAccessBlock patient-outcome-dev-bronze-data",
            "PutBucketLifecycleConfiguration patient-outcome-dev-bronze-data",
            "PutBucketTagging patient-outcome-dev-bronze-data",
        ]
    );
}

/// 集成测试：重复运行
///
/// 验证对已创建的存储桶再次运行仍然成功
#[tokio::test]
async fn test_rerun_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeS3::default();

    let first = Provisioner::new(&fake, settings_in(&dir))
        .provision_data_lake()
        .await
        .unwrap();
    assert!(first.is_success());
    assert!(
        first
            .buckets
            .iter()
            .all(|b| matches!(b.outcome, Ok(CreateOutcome::Created)))
    );

    let second = Provisioner::new(&fake, settings_in(&dir))
        .provision_data_lake()
        .await
        .unwrap();
    assert!(second.is_success());
    assert!(
        second
            .buckets
            .iter()
            .all(|b| matches!(b.outcome, Ok(CreateOutcome::AlreadyOwned)))
    );
}

/// 集成测试：生命周期策略和标签按层级下发
#[tokio::test]
async fn test_tier_specific_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let fake = FakeS3::default();
    Provisioner::new(&fake, settings_in(&dir))
        .provision_data_lake()
        .await
        .unwrap();

    let lifecycles = fake.lifecycles.lock().unwrap();
    let gold = &lifecycles["patient-outcome-dev-gold-data"];
    assert_eq!(gold.rule_id, "Move to IA");
    assert_eq!(gold.transitions.len(), 1);
    let bronze = &lifecycles["patient-outcome-dev-bronze-data"];
    assert_eq!(bronze.transitions[1].days, 180);

    let tags = fake.tags.lock().unwrap();
    let silver_tags = &tags["patient-outcome-dev-silver-data"];
    assert!(
        silver_tags
            .iter()
            .any(|t| t.key == "DataTier" && t.value == Tier::Silver.as_str())
    );
    assert!(
        silver_tags
            .iter()
            .any(|t| t.key == "Contains-PHI" && t.value == "True")
    );
}

/// 集成测试：部分失败
///
/// 验证某个存储桶失败时其他层级照常执行且不写配置文件
#[tokio::test]
async fn test_partial_failure_skips_summary() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    let fake = FakeS3 {
        deny_tagging_for: Some("patient-outcome-dev-bronze-data".to_string()),
        ..FakeS3::default()
    };

    let report = Provisioner::new(&fake, settings.clone())
        .provision_data_lake()
        .await
        .unwrap();

    assert!(!report.is_success());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].record.tier, Tier::Bronze);
    assert_eq!(
        failures[0].outcome.as_ref().unwrap_err().step,
        Step::Tagging
    );

    // silver 和 gold 仍然完成了全部步骤
    assert_eq!(fake.tags.lock().unwrap().len(), 2);
    assert!(!settings.output.exists());
}
