//! 推送客户端服务
//!
//! 管理推送通知注册生命周期：渠道声明、权限协商、令牌获取
//! 与前台 / 后台 / 冷启动三通道消息路由。

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    info!("Starting push-client...");
    Ok(())
}
