//! S3模块
//!
//! 该模块负责与 S3 管理接口交互，包括存储桶的创建和各项配置。

// 声明子模块
pub mod admin;
pub mod client;
pub mod error;

// 重新导出常用的类型
pub use admin::{BucketAdmin, ComplianceTag, CreateOutcome};
pub use client::S3AdminClient;
pub use error::S3Error;
