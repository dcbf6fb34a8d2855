//! 模拟远程消息网关
//!
//! 模拟设备注册、令牌签发与三条送达通道。前台 / 点按唤醒通道以
//! mpsc 通道投递原始 JSON 负载；后台处理器以函数指针登记，触发时
//! 直接调用登记的函数，模拟系统在隔离语境中唤醒进程执行处理器。

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use push_shared::error::{PushError, Result};
use push_shared::messages::RemoteMessage;
use push_shared::platform::{BackgroundHandler, MessagingGateway};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};
use uuid::Uuid;

/// 模拟消息网关状态
pub struct MockMessaging {
    /// 本安装实例是否已注册
    registered: AtomicBool,
    register_count: AtomicUsize,
    /// 当前令牌；平台可随时轮换
    token: Mutex<String>,
    fail_register: AtomicBool,
    fail_fetch: AtomicBool,
    foreground_tx: Mutex<Option<UnboundedSender<Vec<u8>>>>,
    opened_tx: Mutex<Option<UnboundedSender<Vec<u8>>>>,
    /// 冷启动通知，查询即消费
    initial: Mutex<Option<Vec<u8>>>,
    background_handler: Mutex<Option<BackgroundHandler>>,
    handler_registrations: AtomicUsize,
}

impl MockMessaging {
    pub fn new() -> Self {
        Self {
            registered: AtomicBool::new(false),
            register_count: AtomicUsize::new(0),
            token: Mutex::new(format!("fcm-sim-{}", Uuid::new_v4())),
            fail_register: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            foreground_tx: Mutex::new(None),
            opened_tx: Mutex::new(None),
            initial: Mutex::new(None),
            background_handler: Mutex::new(None),
            handler_registrations: AtomicUsize::new(0),
        }
    }

    /// 当前签发的令牌
    pub fn token(&self) -> String {
        self.token.lock().clone()
    }

    /// 轮换令牌（模拟平台随时作废旧令牌）
    pub fn rotate_token(&self) -> String {
        let token = format!("fcm-sim-{}", Uuid::new_v4());
        *self.token.lock() = token.clone();
        token
    }

    pub fn set_fail_register(&self, should_fail: bool) {
        self.fail_register.store(should_fail, Ordering::SeqCst);
    }

    pub fn set_fail_fetch(&self, should_fail: bool) {
        self.fail_fetch.store(should_fail, Ordering::SeqCst);
    }

    /// 设备注册被调用的次数
    pub fn register_count(&self) -> usize {
        self.register_count.load(Ordering::SeqCst)
    }

    /// 后台处理器登记次数
    pub fn handler_registrations(&self) -> usize {
        self.handler_registrations.load(Ordering::SeqCst)
    }

    /// 预置冷启动通知（进程由通知点按从终止态拉起）
    pub fn set_initial_message(&self, message: &RemoteMessage) {
        *self.initial.lock() = Some(to_payload(message));
    }

    /// 向前台通道投递一条消息；无订阅者时返回 false
    pub fn deliver_foreground(&self, message: &RemoteMessage) -> bool {
        self.deliver_foreground_raw(to_payload(message))
    }

    /// 向前台通道投递原始负载（可用于模拟畸形消息）
    pub fn deliver_foreground_raw(&self, payload: Vec<u8>) -> bool {
        match self.foreground_tx.lock().as_ref() {
            Some(tx) => tx.send(payload).is_ok(),
            None => {
                warn!("前台通道无订阅者，消息未投递");
                false
            }
        }
    }

    /// 向点按唤醒通道投递一条消息；无订阅者时返回 false
    pub fn deliver_opened(&self, message: &RemoteMessage) -> bool {
        match self.opened_tx.lock().as_ref() {
            Some(tx) => tx.send(to_payload(message)).is_ok(),
            None => {
                warn!("点按唤醒通道无订阅者，消息未投递");
                false
            }
        }
    }

    /// 触发一次后台送达；未登记处理器时返回 false
    ///
    /// 处理器是零捕获函数指针，这里的直接调用即模拟系统在隔离
    /// 语境中唤醒进程执行它：它拿不到前台装配的任何内存状态。
    pub fn trigger_background(&self, message: &RemoteMessage) -> bool {
        let handler = *self.background_handler.lock();
        match handler {
            Some(handler) => {
                handler(to_payload(message));
                true
            }
            None => {
                warn!("后台处理器未登记，消息被系统丢弃");
                false
            }
        }
    }
}

impl Default for MockMessaging {
    fn default() -> Self {
        Self::new()
    }
}

fn to_payload(message: &RemoteMessage) -> Vec<u8> {
    serde_json::to_vec(message).expect("序列化模拟消息失败")
}

#[async_trait]
impl MessagingGateway for MockMessaging {
    async fn register_device(&self) -> Result<()> {
        if self.fail_register.load(Ordering::SeqCst) {
            return Err(PushError::gateway("register_device", "模拟注册失败"));
        }
        self.registered.store(true, Ordering::SeqCst);
        self.register_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_token(&self) -> Result<String> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(PushError::gateway("fetch_token", "模拟拉取失败"));
        }
        // 平台要求先完成远程消息注册才签发令牌
        if !self.registered.load(Ordering::SeqCst) {
            return Err(PushError::gateway("fetch_token", "设备尚未注册"));
        }
        Ok(self.token.lock().clone())
    }

    fn subscribe_foreground(&self) -> UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.foreground_tx.lock() = Some(tx);
        rx
    }

    fn subscribe_opened(&self) -> UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.opened_tx.lock() = Some(tx);
        rx
    }

    async fn take_initial_message(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.initial.lock().take())
    }

    fn register_background_handler(&self, handler: BackgroundHandler) {
        *self.background_handler.lock() = Some(handler);
        self.handler_registrations.fetch_add(1, Ordering::SeqCst);
        info!("模拟平台已登记后台处理器");
    }
}
