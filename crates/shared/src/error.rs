//! 统一错误处理模块
//!
//! 定义推送客户端共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 四类核心错误（权限查询、令牌获取、渠道注册、消息处理）均在产生处
//! 就地恢复为安全默认值（false / None / 静默跳过 / 记录后丢弃），
//! 不向调用方传播，也不存在任何致命路径。

use thiserror::Error;

/// 令牌获取流程的阶段标识
///
/// 获取令牌分两步：先注册设备，再拉取令牌。
/// 错误日志中携带阶段信息，便于区分失败发生在哪一步。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStage {
    Register,
    Fetch,
}

impl std::fmt::Display for TokenStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Register => "register",
            Self::Fetch => "fetch",
        };
        write!(f, "{s}")
    }
}

/// 推送客户端错误类型
#[derive(Debug, Error)]
pub enum PushError {
    // ==================== 权限错误 ====================
    #[error("权限状态查询失败: {reason}")]
    PermissionQueryFailed { reason: String },

    // ==================== 令牌错误 ====================
    #[error("设备令牌获取失败: 阶段={stage}, 原因={reason}")]
    TokenRetrievalFailed { stage: TokenStage, reason: String },

    // ==================== 渠道错误 ====================
    #[error("通知渠道注册失败: channel_id={channel_id}, 原因={reason}")]
    ChannelRegistrationFailed { channel_id: String, reason: String },

    // ==================== 消息错误 ====================
    #[error("消息处理失败: 上下文={context}, 原因={reason}")]
    MessageHandlingFailed { context: String, reason: String },

    // ==================== 平台网关错误 ====================
    #[error("平台接口调用失败: {api} - {reason}")]
    Gateway { api: String, reason: String },

    // ==================== 配置错误 ====================
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, PushError>;

impl PushError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionQueryFailed { .. } => "PERMISSION_QUERY_FAILED",
            Self::TokenRetrievalFailed { .. } => "TOKEN_RETRIEVAL_FAILED",
            Self::ChannelRegistrationFailed { .. } => "CHANNEL_REGISTRATION_FAILED",
            Self::MessageHandlingFailed { .. } => "MESSAGE_HANDLING_FAILED",
            Self::Gateway { .. } => "GATEWAY_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// 是否为可就地恢复的错误
    ///
    /// 四类核心错误与底层网关错误都在产生处降级为安全默认值；
    /// 只有启动期的配置错误会冒泡到二进制入口。
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }

    /// 构造网关错误的便捷方法
    pub fn gateway(api: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Gateway {
            api: api.into(),
            reason: reason.into(),
        }
    }
}
