//! 消息路由测试套件
//!
//! 覆盖三条送达通道的路由契约：前台合成本地通知并带缺省回落，
//! 后台与冷启动只做观察记录，畸形负载丢弃后管道保持存活。

use crate::setup::{TestEnvironment, drain};
use push_client::router::{DEFAULT_BODY, DEFAULT_TITLE};
use push_shared::messages::ConsentModel;
use push_shared::test_utils::{data_only_message, remote_message};

/// 装配一个已授权的环境并完成前台订阅
async fn subscribed_env() -> (TestEnvironment, push_client::PushService, push_client::ForegroundSubscription)
{
    let env = TestEnvironment::new(ConsentModel::Implicit);
    env.user_will_grant();

    let service = env.build_service().await;
    service.setup_background_handler();
    assert!(service.request_user_permission().await);
    let subscription = service.setup_foreground_handler().await;

    (env, service, subscription)
}

#[cfg(test)]
mod foreground_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_content_falls_back_to_defaults() {
        let (env, _service, subscription) = subscribed_env().await;

        // data-only 消息：标题与正文回落到固定文案，数据负载透传
        env.messaging
            .deliver_foreground(&data_only_message(&[("screen", "offers")]));
        drain().await;

        let presented = env.presenter.presented();
        assert_eq!(presented.len(), 1);
        let request = &presented[0].request;
        assert_eq!(request.title, DEFAULT_TITLE);
        assert_eq!(request.message, DEFAULT_BODY);
        assert_eq!(request.big_text, DEFAULT_BODY);
        assert_eq!(
            request.user_info.get("screen").map(String::as_str),
            Some("offers")
        );

        subscription.unsubscribe().await;
    }

    #[tokio::test]
    async fn test_malformed_payload_is_dropped_pipeline_survives() {
        let (env, _service, subscription) = subscribed_env().await;

        env.messaging.deliver_foreground_raw(b"not valid json".to_vec());
        env.messaging
            .deliver_foreground(&remote_message("Sale", "50% off"));
        drain().await;

        // 畸形负载被丢弃，后续合法消息照常呈现
        let presented = env.presenter.presented();
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].request.title, "Sale");

        subscription.unsubscribe().await;
    }

    #[tokio::test]
    async fn test_presenter_failure_does_not_stop_the_loop() {
        let (env, _service, subscription) = subscribed_env().await;

        // 呈现器暂时故障：消息丢弃，管道存活
        env.presenter.set_fail_present(true);
        env.messaging
            .deliver_foreground(&remote_message("Lost", "while failing"));
        drain().await;
        assert_eq!(env.presenter.presented_count(), 0);

        // 故障恢复后继续呈现
        env.presenter.set_fail_present(false);
        env.messaging
            .deliver_foreground(&remote_message("Recovered", "after failure"));
        drain().await;
        assert_eq!(env.presenter.presented_count(), 1);

        subscription.unsubscribe().await;
    }
}

#[cfg(test)]
mod background_tests {
    use super::*;

    #[tokio::test]
    async fn test_background_messages_are_observed_not_presented() {
        let (env, _service, subscription) = subscribed_env().await;

        // 系统托盘已自行展示，核心不做本地呈现
        assert!(
            env.messaging
                .trigger_background(&remote_message("Synced", "Inbox updated"))
        );
        drain().await;
        assert_eq!(env.presenter.presented_count(), 0);

        subscription.unsubscribe().await;
    }

    #[tokio::test]
    async fn test_background_handler_works_without_any_ui_mounted() {
        // 进程可能仅为执行后台处理器而被唤醒：不做权限协商、不订阅前台
        let env = TestEnvironment::new(ConsentModel::Implicit);
        let service = env.build_service().await;

        service.setup_background_handler();
        assert!(
            env.messaging
                .trigger_background(&remote_message("Woke", "process"))
        );
        assert_eq!(env.presenter.presented_count(), 0);
    }

    #[tokio::test]
    async fn test_background_reregistration_is_idempotent() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        let service = env.build_service().await;

        // 每次进程启动都重注册；重复注册无害
        service.setup_background_handler();
        service.setup_background_handler();
        assert_eq!(env.messaging.handler_registrations(), 2);
        assert!(
            env.messaging
                .trigger_background(&remote_message("Still", "works"))
        );
    }
}

#[cfg(test)]
mod cold_start_tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_message_is_consumed_once_without_presentation() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.user_will_grant();
        env.messaging
            .set_initial_message(&remote_message("Launch", "from tap"));

        let service = env.build_service().await;
        service.setup_background_handler();
        assert!(service.request_user_permission().await);
        let subscription = service.setup_foreground_handler().await;
        drain().await;

        // 启动通知只做记录，不合成本地通知；查询即消费
        assert_eq!(env.presenter.presented_count(), 0);
        use push_shared::platform::MessagingGateway;
        let second = env
            .messaging
            .take_initial_message()
            .await
            .expect("二次查询应成功");
        assert!(second.is_none());

        subscription.unsubscribe().await;
    }

    #[tokio::test]
    async fn test_opened_messages_are_logged_not_presented() {
        let (env, _service, subscription) = subscribed_env().await;

        assert!(
            env.messaging
                .deliver_opened(&remote_message("Reminder", "Tap to view"))
        );
        drain().await;

        // 点按唤醒通道不触发本地呈现，导航是预留扩展点
        assert_eq!(env.presenter.presented_count(), 0);

        subscription.unsubscribe().await;
    }
}
