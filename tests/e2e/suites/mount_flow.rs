//! 挂载序列测试套件
//!
//! 按外壳的固定调用顺序驱动四个操作，覆盖授予与拒绝两条主线，
//! 以及用户带外变更系统设置后的重试路径。

use crate::setup::{TestEnvironment, drain};
use push_client::RouterState;
use push_shared::messages::{AuthorizationState, ConsentModel, ConsentState};
use push_shared::test_utils::{remote_message, remote_message_with_data};

#[cfg(test)]
mod granted_mount_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_mount_sequence_grants_and_routes() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.user_will_grant();

        let service = env.build_service().await;

        // 构造路径内已完成渠道声明，且只声明一次
        assert!(service.channel_registered());
        assert_eq!(env.presenter.channel_count(), 1);
        assert_eq!(env.presenter.created_channels()[0].id, "default-channel");

        // 外壳挂载序列：后台处理器 → 权限 → 令牌 → 前台订阅
        service.setup_background_handler();
        assert_eq!(env.messaging.handler_registrations(), 1);

        let granted = service.request_user_permission().await;
        assert_eq!(ConsentState::from_granted(granted), ConsentState::Granted);

        let token = service.get_fcm_token().await.expect("授予后应能获取令牌");
        assert_eq!(token, env.messaging.token());

        let subscription = service.setup_foreground_handler().await;
        assert_eq!(service.router_state(), RouterState::Subscribed);

        // 前台消息被合成为本地通知，标题 / 正文 / 数据负载完整映射
        env.messaging.deliver_foreground(&remote_message_with_data(
            "Sale",
            "50% off",
            &[("screen", "offers")],
        ));
        drain().await;

        let presented = env.presenter.presented();
        assert_eq!(presented.len(), 1);
        let request = &presented[0].request;
        assert_eq!(request.title, "Sale");
        assert_eq!(request.message, "50% off");
        assert_eq!(request.big_text, "50% off");
        assert_eq!(
            request.user_info.get("screen").map(String::as_str),
            Some("offers")
        );

        // 卸载后投递的前台消息不再触发呈现
        subscription.unsubscribe().await;
        assert_eq!(service.router_state(), RouterState::Unsubscribed);

        env.messaging
            .deliver_foreground(&remote_message("After", "teardown"));
        drain().await;
        assert_eq!(env.presenter.presented_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_out_of_band_settings_change() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.user_will_deny();

        let service = env.build_service().await;
        service.setup_background_handler();

        // 首次协商：弹窗被拒绝
        assert!(!service.request_user_permission().await);
        assert_eq!(env.permissions.request_count(), 1);

        // 用户去系统设置里手动开启（带外变更），外壳触发重试
        env.permissions.set_state(AuthorizationState::Authorized);
        assert!(service.request_user_permission().await);
        // 已知状态短路返回，不再触发弹窗原语
        assert_eq!(env.permissions.request_count(), 1);

        assert!(service.get_fcm_token().await.is_some());
    }
}

#[cfg(test)]
mod denied_mount_tests {
    use super::*;

    #[tokio::test]
    async fn test_denied_mount_presents_nothing() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.user_will_deny();

        let service = env.build_service().await;
        service.setup_background_handler();

        let granted = service.request_user_permission().await;
        assert_eq!(ConsentState::from_granted(granted), ConsentState::Denied);

        // 外壳在拒绝终局下不再继续挂载序列；没有任何本地通知被呈现
        assert_eq!(env.presenter.presented_count(), 0);
        assert_eq!(service.router_state(), RouterState::Unsubscribed);
    }

    #[tokio::test]
    async fn test_channel_declaration_failure_does_not_block_mount() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.user_will_grant();
        env.presenter.set_fail_create_channel(true);

        // 渠道声明失败被吞掉，挂载序列照常推进
        let service = env.build_service().await;
        assert!(!service.channel_registered());

        service.setup_background_handler();
        assert!(service.request_user_permission().await);
        assert!(service.get_fcm_token().await.is_some());
    }
}
