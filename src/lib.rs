//! 医疗数据湖 S3 存储桶初始化库
//!
//! 为数据湖的 bronze / silver / gold 三个层级创建存储桶，主要功能包括：
//! - 创建存储桶（已属于当前账号的存储桶视为成功）
//! - 开启版本控制和默认加密
//! - 阻止公共访问
//! - 按层级设置生命周期策略
//! - 添加 HIPAA 合规标签
//! - 把存储桶信息写入 JSON 配置文件

pub mod config;
pub mod lifecycle;
pub mod provision;
pub mod s3;
pub mod summary;
pub mod tier;

pub use config::{Environment, Settings, build_s3_client};
pub use provision::{DataLakeReport, Provisioner};
pub use s3::{BucketAdmin, S3AdminClient};
pub use tier::Tier;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

/// 初始化日志
///
/// 默认输出 `info` 级别，可以通过 `RUST_LOG` 覆盖。
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_timer(LocalTime::rfc_3339())
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
