//! 消息路由器
//!
//! 在前台、后台、冷启动三条送达通道上接收远程消息。前台消息由系统
//! 不自动展示，需要手动合成本地通知；后台与冷启动消息由系统托盘
//! 自行展示，这里只做观察记录。单条消息的处理失败（如负载畸形）
//! 记录诊断日志后丢弃，绝不让路由器崩溃。

use std::sync::Arc;

use parking_lot::Mutex;
use push_shared::error::PushError;
use push_shared::messages::{
    DeliveryContext, InboundMessage, NotificationPriority, PresentationRequest, RemoteMessage,
};
use push_shared::platform::{MessagingGateway, NotificationPresenter};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 前台消息缺省标题
pub const DEFAULT_TITLE: &str = "New Notification";
/// 前台消息缺省正文
pub const DEFAULT_BODY: &str = "You have a new notification";
/// 本地通知固定强调色
pub const ACCENT_COLOR: &str = "#2196F3";
/// 本地通知固定小图标
pub const SMALL_ICON: &str = "ic_launcher";
/// 本地通知固定振动时长（毫秒）
pub const VIBRATION_MS: u64 = 300;

/// 路由器状态机（进程生命周期内）
///
/// 订阅建立视为总能成功，没有错误态；显式退订只拆前台监听，
/// 后台处理器按平台约束没有退订路径。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Unsubscribed,
    Subscribing,
    Subscribed,
}

/// 消息路由器
pub struct MessageRouter {
    gateway: Arc<dyn MessagingGateway>,
    presenter: Arc<dyn NotificationPresenter>,
    /// 前台本地通知使用的渠道 id
    channel_id: String,
    state: Arc<Mutex<RouterState>>,
}

impl MessageRouter {
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        presenter: Arc<dyn NotificationPresenter>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            presenter,
            channel_id: channel_id.into(),
            state: Arc::new(Mutex::new(RouterState::Unsubscribed)),
        }
    }

    pub fn state(&self) -> RouterState {
        *self.state.lock()
    }

    /// 注册后台消息处理器
    ///
    /// 每次进程启动都幂等重注册，无论进程是新启动还是恢复。
    /// 处理器是纯函数指针，不携带前台装配建立的任何内存状态。
    pub fn register_background_handler(&self) {
        self.gateway.register_background_handler(handle_background);
        info!("后台消息处理器已注册");
    }

    /// 订阅前台与冷启动通道
    ///
    /// 返回的订阅句柄持有唯一的退订能力；应用外壳负责在卸载时退订。
    /// 点按唤醒监听随进程存续，没有显式退订路径。
    pub async fn subscribe(&self) -> ForegroundSubscription {
        *self.state.lock() = RouterState::Subscribing;

        // 冷启动：一次性查询进程是否由通知点按拉起，查询即消费
        match self.gateway.take_initial_message().await {
            Ok(Some(payload)) => handle_cold_start(payload),
            Ok(None) => debug!("本次启动非通知点按拉起"),
            Err(e) => {
                let err = PushError::MessageHandlingFailed {
                    context: DeliveryContext::ColdStart.to_string(),
                    reason: e.to_string(),
                };
                warn!(code = err.code(), error = %err, "启动通知查询失败，已忽略");
            }
        }

        // 点按唤醒通道：后台存活的进程被通知点按拉回前台
        let mut opened_rx = self.gateway.subscribe_opened();
        tokio::spawn(async move {
            while let Some(payload) = opened_rx.recv().await {
                handle_opened(payload);
            }
        });

        // 前台通道：逐条合成本地通知
        let mut foreground_rx = self.gateway.subscribe_foreground();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let presenter = self.presenter.clone();
        let channel_id = self.channel_id.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    maybe = foreground_rx.recv() => {
                        let Some(payload) = maybe else {
                            // 平台端关闭了通道
                            break;
                        };
                        if let Err(e) =
                            handle_foreground(presenter.as_ref(), &channel_id, payload).await
                        {
                            error!(code = e.code(), error = %e, "前台消息处理失败，已丢弃");
                        }
                    }
                }
            }
        });

        *self.state.lock() = RouterState::Subscribed;
        info!(channel_id = %self.channel_id, "前台与冷启动通道已订阅");

        ForegroundSubscription {
            shutdown: shutdown_tx,
            handle,
            state: self.state.clone(),
        }
    }
}

/// 前台订阅句柄
///
/// 唯一可取消的资源；退订只停掉前台监听任务。
pub struct ForegroundSubscription {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
    state: Arc<Mutex<RouterState>>,
}

impl ForegroundSubscription {
    /// 退订前台通道并等待监听任务退出
    pub async fn unsubscribe(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            warn!(error = %e, "前台监听任务退出异常");
        }
        *self.state.lock() = RouterState::Unsubscribed;
        info!("前台订阅已释放");
    }
}

// ---------------------------------------------------------------------------
// 逐条消息处理（独立函数便于测试，无需构造完整路由器）
// ---------------------------------------------------------------------------

/// 解析平台 SDK 的原始消息负载并装入路由信封
pub fn decode_message(
    payload: &[u8],
    context: DeliveryContext,
) -> Result<InboundMessage, PushError> {
    let remote: RemoteMessage =
        serde_json::from_slice(payload).map_err(|e| PushError::MessageHandlingFailed {
            context: context.to_string(),
            reason: format!("负载解析失败: {e}"),
        })?;
    Ok(InboundMessage::from_remote(remote, context))
}

/// 由入站消息构造本地通知呈现请求
///
/// 标题与正文缺省时回落到固定文案，正文同时填充展开态大字文本；
/// 不透明数据负载原样透传；视觉与振动策略固定。
pub fn build_presentation(channel_id: &str, message: &InboundMessage) -> PresentationRequest {
    let title = message.title().unwrap_or(DEFAULT_TITLE);
    let body = message.body().unwrap_or(DEFAULT_BODY);

    PresentationRequest {
        channel_id: channel_id.to_string(),
        title: title.to_string(),
        message: body.to_string(),
        big_text: body.to_string(),
        small_icon: SMALL_ICON.to_string(),
        color: ACCENT_COLOR.to_string(),
        vibrate: true,
        vibration_ms: VIBRATION_MS,
        priority: NotificationPriority::High,
        user_info: message.data.clone(),
    }
}

/// 处理单条前台消息：解析、映射、交给呈现器展示
pub async fn handle_foreground(
    presenter: &dyn NotificationPresenter,
    channel_id: &str,
    payload: Vec<u8>,
) -> Result<(), PushError> {
    let message = decode_message(&payload, DeliveryContext::Foreground)?;

    info!(
        context = %message.context,
        title = message.title().unwrap_or(DEFAULT_TITLE),
        data_keys = message.data.len(),
        "收到前台消息"
    );

    let request = build_presentation(channel_id, &message);
    presenter
        .present(request)
        .await
        .map_err(|e| PushError::MessageHandlingFailed {
            context: DeliveryContext::Foreground.to_string(),
            reason: format!("本地通知展示失败: {e}"),
        })
}

/// 后台消息处理入口
///
/// 进程可能仅为执行本函数而被系统唤醒，运行在隔离调用上下文中，
/// 必须保持零捕获。系统托盘已自行展示通知，这里只做观察记录。
pub fn handle_background(payload: Vec<u8>) {
    match decode_message(&payload, DeliveryContext::Background) {
        Ok(message) => {
            info!(
                context = %message.context,
                title = message.title().unwrap_or_default(),
                data_keys = message.data.len(),
                "收到后台消息，系统已自动展示"
            );
        }
        Err(e) => {
            warn!(code = e.code(), error = %e, "后台消息解析失败，已丢弃");
        }
    }
}

/// 通知点按将后台存活进程拉回前台
fn handle_opened(payload: Vec<u8>) {
    match decode_message(&payload, DeliveryContext::ColdStart) {
        Ok(message) => {
            // 基于通知内容的深链导航是预留扩展点，这里只记录
            info!(
                context = %message.context,
                title = message.title().unwrap_or_default(),
                "通知点按将应用拉回前台"
            );
        }
        Err(e) => {
            warn!(code = e.code(), error = %e, "点按唤醒消息解析失败，已丢弃");
        }
    }
}

/// 进程由通知点按从终止态冷启动拉起
fn handle_cold_start(payload: Vec<u8>) {
    match decode_message(&payload, DeliveryContext::ColdStart) {
        Ok(message) => {
            // 同样是导航扩展点，只记录启动来源
            info!(
                context = %message.context,
                title = message.title().unwrap_or_default(),
                "进程由通知点按冷启动拉起"
            );
        }
        Err(e) => {
            warn!(code = e.code(), error = %e, "启动通知解析失败，已丢弃");
        }
    }
}
