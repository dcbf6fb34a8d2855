//! 领域模型
//!
//! 定义推送客户端的授权状态、渠道描述符、入站消息信封与本地通知
//! 呈现请求等核心类型。所有与平台 SDK 交换的类型都按其 JSON 线上
//! 形状做 serde 映射，消息路由与权限协商只依赖这里的抽象形状。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ConsentState — 用户同意状态
// ---------------------------------------------------------------------------

/// 用户同意状态（三值）
///
/// `Unknown` 是任何权限检查发生前的初始值；`Granted` / `Denied` 在本次
/// 进程生命周期内是终态，除非用户在系统设置中带外变更，此后一次新的
/// 协商可以重新推导出任一终态。该状态由应用外壳持有，权限协商器只负
/// 责推导并返回，其余组件一概不修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl ConsentState {
    /// 从协商器返回的布尔结果推导同意状态
    pub fn from_granted(granted: bool) -> Self {
        if granted { Self::Granted } else { Self::Denied }
    }

    /// 是否已经完成过一次协商
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for ConsentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "UNKNOWN",
            Self::Granted => "GRANTED",
            Self::Denied => "DENIED",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// AuthorizationState — 平台授权状态
// ---------------------------------------------------------------------------

/// 平台权限接口返回的授权状态
///
/// `Provisional` 是一种降级许可：通知静默投递到通知中心，
/// 不弹出交互式横幅，但对本客户端而言等同于"已允许"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationState {
    NotDetermined,
    Denied,
    Authorized,
    Provisional,
}

impl AuthorizationState {
    /// 该状态下通知是否可投递
    ///
    /// 只有 `Authorized` 与 `Provisional` 视为允许，其余一律视为拒绝。
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Authorized | Self::Provisional)
    }

    /// 是否尚未弹窗询问过用户
    pub fn is_undetermined(&self) -> bool {
        matches!(self, Self::NotDetermined)
    }
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 与 serde 的 SCREAMING_SNAKE_CASE 保持一致，便于日志与断言统一引用
        let s = match self {
            Self::NotDetermined => "NOT_DETERMINED",
            Self::Denied => "DENIED",
            Self::Authorized => "AUTHORIZED",
            Self::Provisional => "PROVISIONAL",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// ConsentModel — 平台同意模型
// ---------------------------------------------------------------------------

/// 平台的权限同意模型，启动时由配置选定
///
/// - `Interactive`：每次请求都会触发一次性系统弹窗，由用户应答
/// - `Implicit`：默认允许投递，仅当状态未定时才显式弹窗询问
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentModel {
    Interactive,
    #[default]
    Implicit,
}

impl std::fmt::Display for ConsentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Interactive => "interactive",
            Self::Implicit => "implicit",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// ChannelDescriptor — 本地通知渠道描述符
// ---------------------------------------------------------------------------

/// 渠道重要性级别，线上形状为数值（1-5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ChannelImportance {
    Min,
    Low,
    Default,
    High,
    Max,
}

impl From<ChannelImportance> for u8 {
    fn from(value: ChannelImportance) -> Self {
        match value {
            ChannelImportance::Min => 1,
            ChannelImportance::Low => 2,
            ChannelImportance::Default => 3,
            ChannelImportance::High => 4,
            ChannelImportance::Max => 5,
        }
    }
}

impl TryFrom<u8> for ChannelImportance {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Min),
            2 => Ok(Self::Low),
            3 => Ok(Self::Default),
            4 => Ok(Self::High),
            5 => Ok(Self::Max),
            other => Err(format!("无效的渠道重要性级别: {other}")),
        }
    }
}

/// 本地通知渠道的声明式描述符
///
/// 注册是幂等的：同一 id 以相同属性重复声明不会产生重复渠道，
/// 以不同属性声明则按"后写覆盖"处理。序列化键名与平台本地通知
/// 子系统的参数形状一致。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    #[serde(rename = "channelId")]
    pub id: String,
    #[serde(rename = "channelName")]
    pub name: String,
    #[serde(rename = "channelDescription")]
    pub description: String,
    #[serde(rename = "soundName")]
    pub sound: String,
    pub importance: ChannelImportance,
    pub vibrate: bool,
}

impl Default for ChannelDescriptor {
    fn default() -> Self {
        Self {
            id: "default-channel".to_string(),
            name: "Default Channel".to_string(),
            description: "A default channel for notifications".to_string(),
            sound: "default".to_string(),
            importance: ChannelImportance::High,
            vibrate: true,
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteMessage — 平台推送 SDK 的入站线上形状
// ---------------------------------------------------------------------------

/// 远程消息中的可选展示内容
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// 平台推送 SDK 投递的远程消息线上形状
///
/// `data` 是应用自定义的不透明键值负载，核心不解释其内容，
/// 只在本地呈现时原样透传。两个字段都可缺省。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMessage {
    #[serde(default)]
    pub notification: Option<NotificationContent>,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// DeliveryContext / InboundMessage — 路由信封
// ---------------------------------------------------------------------------

/// 消息送达时的生命周期上下文，决定路由行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryContext {
    Foreground,
    Background,
    ColdStart,
}

impl DeliveryContext {
    /// 前台送达的消息系统不会自动展示，需要手动合成本地通知
    pub fn requires_local_presentation(&self) -> bool {
        matches!(self, Self::Foreground)
    }

    /// 后台/冷启动送达由系统托盘自行展示，核心只做观察记录
    pub fn auto_presented(&self) -> bool {
        !self.requires_local_presentation()
    }
}

impl std::fmt::Display for DeliveryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Foreground => "FOREGROUND",
            Self::Background => "BACKGROUND",
            Self::ColdStart => "COLD_START",
        };
        write!(f, "{s}")
    }
}

/// 入站消息信封
///
/// 在远程消息的线上形状之外补充送达上下文与接收时间，
/// 供路由与诊断日志统一引用。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub notification: Option<NotificationContent>,
    pub data: HashMap<String, String>,
    pub context: DeliveryContext,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// 由远程消息构造信封，自动记录接收时间
    pub fn from_remote(remote: RemoteMessage, context: DeliveryContext) -> Self {
        Self {
            notification: remote.notification,
            data: remote.data,
            context,
            received_at: Utc::now(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.notification.as_ref()?.title.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.notification.as_ref()?.body.as_deref()
    }
}

// ---------------------------------------------------------------------------
// PresentationRequest — 出站本地通知呈现请求
// ---------------------------------------------------------------------------

/// 本地通知优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Min,
    Low,
    Default,
    High,
    Max,
}

/// 发给平台本地通知呈现器的结构化请求
///
/// 键名与呈现器的参数形状一致；`user_info` 原样透传远程消息的
/// 不透明数据负载。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationRequest {
    pub channel_id: String,
    pub title: String,
    pub message: String,
    pub big_text: String,
    pub small_icon: String,
    pub color: String,
    pub vibrate: bool,
    #[serde(rename = "vibration")]
    pub vibration_ms: u64,
    pub priority: NotificationPriority,
    pub user_info: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// CapabilityRequest — 权限请求能力标记
// ---------------------------------------------------------------------------

/// 权限请求时声明的通知能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRequest {
    pub alert: bool,
    pub badge: bool,
    pub sound: bool,
}

impl CapabilityRequest {
    /// 本客户端固定请求全部三种能力
    pub fn full() -> Self {
        Self {
            alert: true,
            badge: true,
            sound: true,
        }
    }
}

impl Default for CapabilityRequest {
    fn default() -> Self {
        Self::full()
    }
}
