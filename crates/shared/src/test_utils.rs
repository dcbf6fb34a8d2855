//! 测试工具模块
//!
//! 提供测试所需的辅助函数与测试数据构造器，
//! 用于简化测试代码编写，提高测试的可重复性和可维护性。

use std::collections::HashMap;

use crate::messages::{ChannelDescriptor, NotificationContent, RemoteMessage};

// ==================== 测试数据构造 ====================

/// 构造带标题与正文的远程消息
pub fn remote_message(title: &str, body: &str) -> RemoteMessage {
    RemoteMessage {
        notification: Some(NotificationContent {
            title: Some(title.to_string()),
            body: Some(body.to_string()),
        }),
        data: HashMap::new(),
    }
}

/// 构造携带不透明数据负载的远程消息
pub fn remote_message_with_data(title: &str, body: &str, pairs: &[(&str, &str)]) -> RemoteMessage {
    let mut message = remote_message(title, body);
    message.data = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    message
}

/// 构造 data-only 远程消息（无展示内容）
pub fn data_only_message(pairs: &[(&str, &str)]) -> RemoteMessage {
    RemoteMessage {
        notification: None,
        data: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// 序列化远程消息为线上 JSON 负载
pub fn to_payload(message: &RemoteMessage) -> Vec<u8> {
    serde_json::to_vec(message).expect("序列化测试消息失败")
}

/// 构造带标题与正文的线上 JSON 负载
pub fn remote_payload(title: &str, body: &str) -> Vec<u8> {
    to_payload(&remote_message(title, body))
}

/// 构造指定 id 的测试渠道描述符，其余属性取默认值
pub fn test_channel_descriptor(id: &str) -> ChannelDescriptor {
    ChannelDescriptor {
        id: id.to_string(),
        ..Default::default()
    }
}
