//! 模拟权限接口
//!
//! 以内存状态模拟系统权限面板与一次性弹窗：可脚本化设定当前授权
//! 状态与用户对下一次弹窗的应答，并记录弹窗原语的调用次数，
//! 用于验证"已拒绝不再弹窗"等协商约束。

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use push_shared::error::{PushError, Result};
use push_shared::messages::{AuthorizationState, CapabilityRequest};
use push_shared::platform::PermissionGateway;
use tracing::info;

/// 模拟权限状态
pub struct MockPermissions {
    /// 当前授权状态（对应系统设置面板里的状态）
    state: RwLock<AuthorizationState>,
    /// 用户对下一次弹窗的应答
    prompt_answer: RwLock<AuthorizationState>,
    /// 是否模拟查询失败
    fail_query: RwLock<bool>,
    /// 是否模拟请求失败
    fail_request: RwLock<bool>,
    /// 弹窗原语调用次数
    request_count: AtomicUsize,
}

impl MockPermissions {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(AuthorizationState::NotDetermined),
            prompt_answer: RwLock::new(AuthorizationState::Authorized),
            fail_query: RwLock::new(false),
            fail_request: RwLock::new(false),
            request_count: AtomicUsize::new(0),
        }
    }

    /// 直接设定当前授权状态（模拟用户在系统设置中带外变更）
    pub fn set_state(&self, state: AuthorizationState) {
        *self.state.write() = state;
    }

    pub fn current_state(&self) -> AuthorizationState {
        *self.state.read()
    }

    /// 设定用户对下一次弹窗的应答
    pub fn answer_next_prompt(&self, answer: AuthorizationState) {
        *self.prompt_answer.write() = answer;
    }

    /// 设置模拟查询失败
    pub fn set_fail_query(&self, should_fail: bool) {
        *self.fail_query.write() = should_fail;
    }

    /// 设置模拟请求失败
    pub fn set_fail_request(&self, should_fail: bool) {
        *self.fail_request.write() = should_fail;
    }

    /// 弹窗原语被调用的次数
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Default for MockPermissions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionGateway for MockPermissions {
    async fn query_state(&self) -> Result<AuthorizationState> {
        if *self.fail_query.read() {
            return Err(PushError::gateway("query_state", "模拟查询失败"));
        }
        Ok(*self.state.read())
    }

    async fn request_state(&self, _capabilities: CapabilityRequest) -> Result<AuthorizationState> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        if *self.fail_request.read() {
            return Err(PushError::gateway("request_state", "模拟请求失败"));
        }

        let mut state = self.state.write();
        if state.is_undetermined() {
            // 仅未定状态会真正弹窗并采纳用户应答，其余状态系统直接返回现状
            *state = *self.prompt_answer.read();
            info!(state = %*state, "模拟权限弹窗已应答");
        }
        Ok(*state)
    }
}
