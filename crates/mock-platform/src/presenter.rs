//! 模拟本地通知呈现器
//!
//! 记录渠道声明与通知呈现两类副作用，供测试断言调用次数与字段
//! 映射；提供失败开关模拟系统拒绝。

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use push_shared::error::{PushError, Result};
use push_shared::messages::{ChannelDescriptor, PresentationRequest};
use push_shared::platform::NotificationPresenter;
use tracing::info;

/// 一次通知呈现记录
#[derive(Debug, Clone)]
pub struct PresentedNotification {
    pub request: PresentationRequest,
    pub presented_at: DateTime<Utc>,
}

/// 模拟呈现器状态
pub struct MockPresenter {
    /// 渠道声明记录（幂等性由上层保证，这里忠实记录每次调用）
    channels: RwLock<Vec<ChannelDescriptor>>,
    /// 已呈现的通知
    presented: RwLock<Vec<PresentedNotification>>,
    fail_create: AtomicBool,
    fail_present: AtomicBool,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(Vec::new()),
            presented: RwLock::new(Vec::new()),
            fail_create: AtomicBool::new(false),
            fail_present: AtomicBool::new(false),
        }
    }

    pub fn set_fail_create_channel(&self, should_fail: bool) {
        self.fail_create.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_fail_present(&self, should_fail: bool) {
        self.fail_present.store(should_fail, Ordering::SeqCst);
    }

    /// 渠道声明调用记录
    pub fn created_channels(&self) -> Vec<ChannelDescriptor> {
        self.channels.read().clone()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// 已呈现通知记录
    pub fn presented(&self) -> Vec<PresentedNotification> {
        self.presented.read().clone()
    }

    pub fn presented_count(&self) -> usize {
        self.presented.read().len()
    }

    /// 清空所有记录（测试复用）
    pub fn clear(&self) {
        self.channels.write().clear();
        self.presented.write().clear();
    }
}

impl Default for MockPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationPresenter for MockPresenter {
    async fn create_channel(&self, descriptor: ChannelDescriptor) -> Result<()> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(PushError::gateway("create_channel", "模拟系统拒绝"));
        }
        info!(channel_id = %descriptor.id, "模拟系统已创建通知渠道");
        self.channels.write().push(descriptor);
        Ok(())
    }

    async fn present(&self, request: PresentationRequest) -> Result<()> {
        if self.fail_present.load(Ordering::SeqCst) {
            return Err(PushError::gateway("present", "模拟系统拒绝"));
        }
        info!(
            channel_id = %request.channel_id,
            title = %request.title,
            "模拟系统已展示本地通知"
        );
        self.presented.write().push(PresentedNotification {
            request,
            presented_at: Utc::now(),
        });
        Ok(())
    }
}
