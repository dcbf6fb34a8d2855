//! 令牌生命周期测试套件
//!
//! 覆盖注册-拉取两步序列、失败降级为 None、令牌轮换后重新拉取。

use crate::setup::TestEnvironment;
use push_shared::messages::ConsentModel;

#[cfg(test)]
mod token_tests {
    use super::*;

    #[tokio::test]
    async fn test_token_fetched_after_registration() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        let service = env.build_service().await;

        let token = service.get_fcm_token().await.expect("应获取到令牌");
        assert_eq!(token, env.messaging.token());
        assert_eq!(env.messaging.register_count(), 1);
    }

    #[tokio::test]
    async fn test_registration_failure_yields_none() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.messaging.set_fail_register(true);

        let service = env.build_service().await;
        assert!(service.get_fcm_token().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_none() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        env.messaging.set_fail_fetch(true);

        let service = env.build_service().await;
        assert!(service.get_fcm_token().await.is_none());
    }

    #[tokio::test]
    async fn test_rotated_token_is_refetched_not_cached() {
        let env = TestEnvironment::new(ConsentModel::Implicit);
        let service = env.build_service().await;

        let before = service.get_fcm_token().await.expect("应获取到令牌");

        // 平台随时可能轮换令牌；客户端不持久化，每次都重新拉取
        let rotated = env.messaging.rotate_token();
        let after = service.get_fcm_token().await.expect("应获取到令牌");

        assert_ne!(before, after);
        assert_eq!(after, rotated);
    }

    #[tokio::test]
    async fn test_precondition_is_not_enforced() {
        // 约定上应在同意授予后调用，但契约不强制；
        // 未协商过权限时的行为由平台绑定决定
        let env = TestEnvironment::new(ConsentModel::Implicit);
        let service = env.build_service().await;

        assert!(service.get_fcm_token().await.is_some());
    }
}
