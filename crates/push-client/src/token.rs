//! 设备令牌提供器
//!
//! 先注册设备再拉取令牌，两步中的任何失败都降级为 None。
//! 调用方将 None 视为"令牌暂不可用"，本版本不含重试策略。
//! 令牌不做持久化，每次冷启动重新拉取；平台可能随时轮换令牌。

use std::sync::Arc;

use push_shared::error::{PushError, TokenStage};
use push_shared::platform::MessagingGateway;
use tracing::{info, warn};

/// 设备令牌提供器
pub struct TokenProvider {
    gateway: Arc<dyn MessagingGateway>,
}

impl TokenProvider {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self { gateway }
    }

    /// 获取寻址本设备的不透明令牌
    ///
    /// 约定上应在同意授予后调用，但这里不做强制；
    /// 未授权时的行为由平台绑定决定。
    pub async fn get_token(&self) -> Option<String> {
        // 注册本安装实例（重复注册无害）
        if let Err(e) = self.gateway.register_device().await {
            let err = PushError::TokenRetrievalFailed {
                stage: TokenStage::Register,
                reason: e.to_string(),
            };
            warn!(code = err.code(), error = %err, "设备注册失败，令牌暂不可用");
            return None;
        }

        match self.gateway.fetch_token().await {
            Ok(token) => {
                info!(token_len = token.len(), "设备令牌已获取");
                Some(token)
            }
            Err(e) => {
                let err = PushError::TokenRetrievalFailed {
                    stage: TokenStage::Fetch,
                    reason: e.to_string(),
                };
                warn!(code = err.code(), error = %err, "令牌拉取失败，令牌暂不可用");
                None
            }
        }
    }
}
