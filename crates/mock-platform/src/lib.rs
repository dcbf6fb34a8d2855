//! 模拟平台 SDK
//!
//! 以内存实现模拟权限接口、远程消息网关与本地通知呈现器三类平台
//! 边界，带失败开关与副作用记录，用于在没有真实移动平台的环境中
//! 驱动并验证推送编排管道。

pub mod messaging;
pub mod permission;
pub mod presenter;

pub use messaging::MockMessaging;
pub use permission::MockPermissions;
pub use presenter::{MockPresenter, PresentedNotification};
