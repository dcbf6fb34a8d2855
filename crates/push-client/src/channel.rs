//! 通知渠道注册器
//!
//! 向平台本地通知子系统幂等声明渠道。同一进程生命周期内，相同描述符
//! 的重复声明是空操作；同 id 不同属性按"后写覆盖"重新声明，不报错。
//! 渠道声明是尽力而为的声明式操作，底层失败只记录诊断日志并吞掉，
//! 不向调用方暴露任何失败路径。

use std::sync::Arc;

use dashmap::DashMap;
use push_shared::error::PushError;
use push_shared::messages::ChannelDescriptor;
use push_shared::platform::NotificationPresenter;
use tracing::{debug, info, warn};

/// 通知渠道注册器
pub struct ChannelRegistrar {
    presenter: Arc<dyn NotificationPresenter>,
    /// 已声明渠道的最近一次描述符，按渠道 id 索引
    registered: DashMap<String, ChannelDescriptor>,
}

impl ChannelRegistrar {
    pub fn new(presenter: Arc<dyn NotificationPresenter>) -> Self {
        Self {
            presenter,
            registered: DashMap::new(),
        }
    }

    /// 确保渠道已按给定描述符声明
    ///
    /// 声明失败时注册表不更新，后续调用会重新尝试声明。
    pub async fn ensure_channel(&self, descriptor: &ChannelDescriptor) {
        if let Some(existing) = self.registered.get(&descriptor.id) {
            if *existing == *descriptor {
                debug!(channel_id = %descriptor.id, "渠道已按相同描述符声明，跳过");
                return;
            }
            info!(channel_id = %descriptor.id, "渠道描述符变更，按后写覆盖重新声明");
        }

        match self.presenter.create_channel(descriptor.clone()).await {
            Ok(()) => {
                self.registered
                    .insert(descriptor.id.clone(), descriptor.clone());
                info!(
                    channel_id = %descriptor.id,
                    name = %descriptor.name,
                    importance = ?descriptor.importance,
                    "通知渠道已声明"
                );
            }
            Err(e) => {
                let err = PushError::ChannelRegistrationFailed {
                    channel_id: descriptor.id.clone(),
                    reason: e.to_string(),
                };
                warn!(code = err.code(), error = %err, "渠道声明失败，已忽略");
            }
        }
    }

    /// 渠道是否已成功声明
    pub fn is_registered(&self, channel_id: &str) -> bool {
        self.registered.contains_key(channel_id)
    }
}
