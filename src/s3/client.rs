//! 基于 AWS SDK 的存储桶管理实现

use crate::lifecycle::LifecyclePolicy;
use crate::s3::admin::{BucketAdmin, ComplianceTag, CreateOutcome};
use crate::s3::error::S3Error;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration,
    PublicAccessBlockConfiguration, ServerSideEncryption, ServerSideEncryptionByDefault,
    ServerSideEncryptionConfiguration, ServerSideEncryptionRule, Tag, Tagging,
    VersioningConfiguration,
};

/// us-east-1 创建存储桶时不能携带 `LocationConstraint`
const US_EAST_1: &str = "us-east-1";

/// 使用 `aws_sdk_s3::Client` 调用 S3 管理接口。
#[derive(Debug, Clone)]
pub struct S3AdminClient {
    client: Client,
}

impl S3AdminClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BucketAdmin for S3AdminClient {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<CreateOutcome, S3Error> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if region != US_EAST_1 {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(CreateBucketError::is_bucket_already_owned_by_you) =>
            {
                Ok(CreateOutcome::AlreadyOwned)
            }
            Err(err) => Err(S3Error::from_sdk("CreateBucket", err)),
        }
    }

    async fn enable_versioning(&self, bucket: &str) -> Result<(), S3Error> {
        self.client
            .put_bucket_versioning()
            .bucket(bucket)
            .versioning_configuration(
                VersioningConfiguration::builder()
                    .status(BucketVersioningStatus::Enabled)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| S3Error::from_sdk("PutBucketVersioning", e))?;
        Ok(())
    }

    async fn enable_default_encryption(&self, bucket: &str) -> Result<(), S3Error> {
        const OPERATION: &str = "PutBucketEncryption";

        let by_default = ServerSideEncryptionByDefault::builder()
            .sse_algorithm(ServerSideEncryption::Aes256)
            .build()
            .map_err(|e| S3Error::build(OPERATION, e))?;
        let rule = ServerSideEncryptionRule::builder()
            .apply_server_side_encryption_by_default(by_default)
            .bucket_key_enabled(true)
            .build();
        let configuration = ServerSideEncryptionConfiguration::builder()
            .rules(rule)
            .build()
            .map_err(|e| S3Error::build(OPERATION, e))?;

        self.client
            .put_bucket_encryption()
            .bucket(bucket)
            .server_side_encryption_configuration(configuration)
            .send()
            .await
            .map_err(|e| S3Error::from_sdk(OPERATION, e))?;
        Ok(())
    }

    async fn block_public_access(&self, bucket: &str) -> Result<(), S3Error> {
        self.client
            .put_public_access_block()
            .bucket(bucket)
            .public_access_block_configuration(
                PublicAccessBlockConfiguration::builder()
                    .block_public_acls(true)
                    .ignore_public_acls(true)
                    .block_public_policy(true)
                    .restrict_public_buckets(true)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| S3Error::from_sdk("PutPublicAccessBlock", e))?;
        Ok(())
    }

    async fn put_lifecycle(&self, bucket: &str, policy: &LifecyclePolicy) -> Result<(), S3Error> {
        const OPERATION: &str = "PutBucketLifecycleConfiguration";

        let configuration = policy
            .to_bucket_configuration()
            .map_err(|e| S3Error::build(OPERATION, e))?;

        self.client
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .send()
            .await
            .map_err(|e| S3Error::from_sdk(OPERATION, e))?;
        Ok(())
    }

    async fn put_tags(&self, bucket: &str, tags: &[ComplianceTag]) -> Result<(), S3Error> {
        const OPERATION: &str = "PutBucketTagging";

        let tag_set = tags
            .iter()
            .map(|tag| Tag::builder().key(tag.key).value(&tag.value).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| S3Error::build(OPERATION, e))?;
        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| S3Error::build(OPERATION, e))?;

        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| S3Error::from_sdk(OPERATION, e))?;
        Ok(())
    }
}
