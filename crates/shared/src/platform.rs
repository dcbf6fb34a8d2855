//! 平台网关抽象
//!
//! 定义核心与外部平台之间的三个能力边界：权限接口、远程消息网关、
//! 本地通知呈现器。核心只面向这些 trait 编排，真实平台绑定与测试
//! 替身各自提供实现。

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::messages::{
    AuthorizationState, CapabilityRequest, ChannelDescriptor, PresentationRequest,
};

/// 后台消息处理入口
///
/// 进程可能仅为执行该处理器而被系统唤醒，运行在 OS 管理的隔离调用
/// 上下文中，不持有前台装配建立的任何内存状态。以纯函数指针建模，
/// 类型层面杜绝捕获上下文。
pub type BackgroundHandler = fn(Vec<u8>);

/// 权限能力接口
///
/// `query_state` 绝不弹窗；`request_state` 可能弹出一次性系统弹窗
/// 并挂起等待用户或系统应答。平台差异化的协商策略建立在这两个
/// 原语之上，而不是散落的平台分支里。
#[async_trait]
pub trait PermissionGateway: Send + Sync {
    /// 查询当前授权状态，不触发任何提示
    async fn query_state(&self) -> Result<AuthorizationState>;

    /// 以声明的能力请求授权，可能弹窗，返回应答后的授权状态
    async fn request_state(&self, capabilities: CapabilityRequest) -> Result<AuthorizationState>;
}

/// 远程消息网关
///
/// 覆盖设备注册、令牌拉取与三条送达通道的订阅点。
/// 通道负载是平台 SDK 的原始 JSON 字节，解析由路由统一完成。
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// 注册本安装实例以接收远程消息（重复注册无害）
    async fn register_device(&self) -> Result<()>;

    /// 拉取远程分发后端寻址本设备所用的不透明令牌
    async fn fetch_token(&self) -> Result<String>;

    /// 订阅前台送达通道
    fn subscribe_foreground(&self) -> mpsc::UnboundedReceiver<Vec<u8>>;

    /// 订阅"通知点按将存活的后台进程拉回前台"通道
    fn subscribe_opened(&self) -> mpsc::UnboundedReceiver<Vec<u8>>;

    /// 一次性查询进程是否由通知点按从终止态拉起；查询即消费
    async fn take_initial_message(&self) -> Result<Option<Vec<u8>>>;

    /// 注册后台消息处理器；每次进程启动时幂等重注册
    fn register_background_handler(&self, handler: BackgroundHandler);
}

/// 本地通知呈现器
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// 向系统通知子系统声明一个渠道
    async fn create_channel(&self, descriptor: ChannelDescriptor) -> Result<()>;

    /// 立即展示一条本地通知
    async fn present(&self, request: PresentationRequest) -> Result<()>;
}
