//! S3错误模块

use aws_sdk_s3::error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::fmt::Debug;
use thiserror::Error;

/// S3 管理接口调用失败
#[derive(Debug, Error)]
pub enum S3Error {
    /// 服务端返回错误或请求未能送达
    #[error("{operation} 调用失败: {message}")]
    Service {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    /// SDK 请求参数构建失败
    #[error("构建 {operation} 请求失败: {source}")]
    Build {
        operation: &'static str,
        #[source]
        source: BuildError,
    },
}

impl S3Error {
    /// 从 SDK 错误转换，保留服务端错误码。
    pub(crate) fn from_sdk<E, R>(operation: &'static str, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: Debug,
    {
        Self::Service {
            operation,
            code: err.code().map(str::to_string),
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    pub(crate) fn build(operation: &'static str, source: BuildError) -> Self {
        Self::Build { operation, source }
    }

    /// 服务端错误码，例如 `AccessDenied`
    pub fn code(&self) -> Option<&str> {
        match self {
            S3Error::Service { code, .. } => code.as_deref(),
            S3Error::Build { .. } => None,
        }
    }

    /// 失败的 S3 操作名称
    pub fn operation(&self) -> &'static str {
        match self {
            S3Error::Service { operation, .. } | S3Error::Build { operation, .. } => operation,
        }
    }
}
