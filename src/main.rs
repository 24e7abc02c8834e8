use anyhow::Context;
use clap::Parser;
use data_lake_provisioner::{Provisioner, S3AdminClient, Settings, build_s3_client, init_tracing};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // 加载 .env 文件
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = Settings::parse();
    let client = build_s3_client(&settings).await;
    let provisioner = Provisioner::new(S3AdminClient::new(client), settings);

    let report = provisioner
        .provision_data_lake()
        .await
        .context("数据湖初始化失败")?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
