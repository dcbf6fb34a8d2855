//! 权限协商器
//!
//! 将平台差异化的同意策略建模为 `ConsentFlow` trait 的两个变体实现，
//! 启动时按配置的同意模型选定其一，避免在协商逻辑里散落平台分支。
//! 底层权限原语的任何失败都在此处降级为"拒绝"，绝不向应用外壳抛出
//! 异常。

use std::sync::Arc;

use async_trait::async_trait;
use push_shared::error::PushError;
use push_shared::messages::{CapabilityRequest, ConsentModel};
use push_shared::platform::PermissionGateway;
use tracing::{info, warn};

/// 同意协商策略
///
/// 两个变体（交互式 / 隐式）各自封装一种平台的协商算法，
/// 便于针对 mock 网关独立测试。
#[async_trait]
pub trait ConsentFlow: Send + Sync {
    /// 执行一轮协商，返回归一化的"是否允许投递"
    async fn negotiate(&self, gateway: &dyn PermissionGateway) -> bool;

    /// 该策略对应的同意模型
    fn model(&self) -> ConsentModel;
}

// ---------------------------------------------------------------------------
// InteractiveConsent — 交互式同意平台
// ---------------------------------------------------------------------------

/// 交互式同意策略
///
/// 每次协商都直接调用请求原语并声明全部能力（alert/badge/sound），
/// 是否真正弹窗由系统决定；以应答后的授权状态判定结果。
pub struct InteractiveConsent;

#[async_trait]
impl ConsentFlow for InteractiveConsent {
    async fn negotiate(&self, gateway: &dyn PermissionGateway) -> bool {
        match gateway.request_state(CapabilityRequest::full()).await {
            Ok(state) => {
                info!(model = %self.model(), state = %state, "交互式权限协商完成");
                state.is_enabled()
            }
            Err(e) => {
                let err = PushError::PermissionQueryFailed {
                    reason: e.to_string(),
                };
                warn!(code = err.code(), error = %err, "权限请求失败，按拒绝处理");
                false
            }
        }
    }

    fn model(&self) -> ConsentModel {
        ConsentModel::Interactive
    }
}

// ---------------------------------------------------------------------------
// ImplicitConsent — 隐式同意平台
// ---------------------------------------------------------------------------

/// 隐式同意策略
///
/// 先无感查询当前授权状态；仅当状态未定时才调用请求原语弹窗，
/// 其余情况短路返回已知状态。先前已是 Denied 的状态不再弹窗，
/// 遵守平台的弹窗抑制规则。
pub struct ImplicitConsent;

#[async_trait]
impl ConsentFlow for ImplicitConsent {
    async fn negotiate(&self, gateway: &dyn PermissionGateway) -> bool {
        let current = match gateway.query_state().await {
            Ok(state) => state,
            Err(e) => {
                let err = PushError::PermissionQueryFailed {
                    reason: e.to_string(),
                };
                warn!(code = err.code(), error = %err, "权限状态查询失败，按拒绝处理");
                return false;
            }
        };

        let resolved = if current.is_undetermined() {
            match gateway.request_state(CapabilityRequest::full()).await {
                Ok(state) => state,
                Err(e) => {
                    let err = PushError::PermissionQueryFailed {
                        reason: e.to_string(),
                    };
                    warn!(code = err.code(), error = %err, "权限请求失败，按拒绝处理");
                    return false;
                }
            }
        } else {
            // 已知状态（含 Denied）直接短路，不再弹窗
            current
        };

        info!(model = %self.model(), state = %resolved, "隐式权限协商完成");
        resolved.is_enabled()
    }

    fn model(&self) -> ConsentModel {
        ConsentModel::Implicit
    }
}

// ---------------------------------------------------------------------------
// PermissionNegotiator — 策略选择与入口
// ---------------------------------------------------------------------------

/// 权限协商器
///
/// 启动时按平台同意模型选定策略变体，此后的每次协商都走同一策略。
pub struct PermissionNegotiator {
    flow: Box<dyn ConsentFlow>,
    gateway: Arc<dyn PermissionGateway>,
}

impl PermissionNegotiator {
    pub fn new(model: ConsentModel, gateway: Arc<dyn PermissionGateway>) -> Self {
        let flow: Box<dyn ConsentFlow> = match model {
            ConsentModel::Interactive => Box::new(InteractiveConsent),
            ConsentModel::Implicit => Box::new(ImplicitConsent),
        };
        Self { flow, gateway }
    }

    /// 请求通知权限，挂起直至用户或系统应答，返回归一化布尔结果
    pub async fn request_permission(&self) -> bool {
        self.flow.negotiate(self.gateway.as_ref()).await
    }

    pub fn model(&self) -> ConsentModel {
        self.flow.model()
    }
}
