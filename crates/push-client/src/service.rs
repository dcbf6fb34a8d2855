//! 推送服务门面
//!
//! 进程启动时显式构造一次并传引用给应用外壳，取代模块级单例。
//! 构造路径内完成默认渠道的一次性声明，保证"注册一次、处处可用"
//! 且不依赖模块加载副作用。对外暴露应用外壳按固定顺序调用的四个
//! 操作：注册后台处理器、请求权限、获取令牌、订阅前台通道。

use std::sync::Arc;

use push_shared::config::AppConfig;
use push_shared::messages::{ChannelDescriptor, ConsentModel};
use push_shared::platform::{MessagingGateway, NotificationPresenter, PermissionGateway};
use tracing::info;

use crate::channel::ChannelRegistrar;
use crate::consent::PermissionNegotiator;
use crate::router::{ForegroundSubscription, MessageRouter, RouterState};
use crate::token::TokenProvider;

/// 推送服务
pub struct PushService {
    registrar: ChannelRegistrar,
    negotiator: PermissionNegotiator,
    tokens: TokenProvider,
    router: MessageRouter,
    channel: ChannelDescriptor,
}

impl PushService {
    /// 构造服务并完成默认渠道声明
    ///
    /// 渠道声明先于任何权限结果生效：本地通知的呈现依赖渠道存在，
    /// 装配顺序固定为 注册器 → 协商器 → 令牌 → 订阅。
    pub async fn new(
        config: &AppConfig,
        permissions: Arc<dyn PermissionGateway>,
        messaging: Arc<dyn MessagingGateway>,
        presenter: Arc<dyn NotificationPresenter>,
    ) -> Self {
        let channel = config.channel.descriptor();

        let registrar = ChannelRegistrar::new(presenter.clone());
        registrar.ensure_channel(&channel).await;

        let negotiator = PermissionNegotiator::new(config.platform.consent_model, permissions);
        let tokens = TokenProvider::new(messaging.clone());
        let router = MessageRouter::new(messaging, presenter, channel.id.clone());

        info!(
            service = %config.service_name,
            consent_model = %negotiator.model(),
            channel_id = %channel.id,
            "推送服务已构造"
        );

        Self {
            registrar,
            negotiator,
            tokens,
            router,
            channel,
        }
    }

    /// 注册后台消息处理器（外壳挂载时最先调用）
    pub fn setup_background_handler(&self) {
        self.router.register_background_handler();
    }

    /// 请求通知权限，返回归一化布尔结果
    pub async fn request_user_permission(&self) -> bool {
        self.negotiator.request_permission().await
    }

    /// 获取 FCM 设备令牌；None 表示令牌暂不可用
    pub async fn get_fcm_token(&self) -> Option<String> {
        self.tokens.get_token().await
    }

    /// 订阅前台与冷启动通道，返回退订能力
    pub async fn setup_foreground_handler(&self) -> ForegroundSubscription {
        self.router.subscribe().await
    }

    pub fn router_state(&self) -> RouterState {
        self.router.state()
    }

    pub fn consent_model(&self) -> ConsentModel {
        self.negotiator.model()
    }

    pub fn channel(&self) -> &ChannelDescriptor {
        &self.channel
    }

    /// 默认渠道是否已成功声明
    pub fn channel_registered(&self) -> bool {
        self.registrar.is_registered(&self.channel.id)
    }
}
