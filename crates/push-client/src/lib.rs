//! 推送客户端核心库
//!
//! 管理推送通知注册的完整生命周期：渠道声明、权限协商、令牌获取，
//! 以及前台 / 后台 / 冷启动三条通道的消息路由。所有平台交互都经由
//! 网关 trait 注入，四类失败（权限查询、令牌获取、渠道注册、消息
//! 处理）均就地降级，不向应用外壳传播异常。

pub mod channel;
pub mod consent;
pub mod router;
pub mod service;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::ChannelRegistrar;
pub use consent::{ConsentFlow, ImplicitConsent, InteractiveConsent, PermissionNegotiator};
pub use router::{ForegroundSubscription, MessageRouter, RouterState};
pub use service::PushService;
pub use token::TokenProvider;
