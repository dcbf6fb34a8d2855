//! 单元测试用的网关测试替身
//!
//! 基于 mockall 为三个平台网关 trait 生成 mock，
//! 供各模块的单元测试设定期望与校验调用次数。

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::mpsc;

use push_shared::error::Result;
use push_shared::messages::{
    AuthorizationState, CapabilityRequest, ChannelDescriptor, PresentationRequest,
};
use push_shared::platform::{
    BackgroundHandler, MessagingGateway, NotificationPresenter, PermissionGateway,
};

mock! {
    pub Permissions {}

    #[async_trait]
    impl PermissionGateway for Permissions {
        async fn query_state(&self) -> Result<AuthorizationState>;
        async fn request_state(&self, capabilities: CapabilityRequest) -> Result<AuthorizationState>;
    }
}

mock! {
    pub Messaging {}

    #[async_trait]
    impl MessagingGateway for Messaging {
        async fn register_device(&self) -> Result<()>;
        async fn fetch_token(&self) -> Result<String>;
        fn subscribe_foreground(&self) -> mpsc::UnboundedReceiver<Vec<u8>>;
        fn subscribe_opened(&self) -> mpsc::UnboundedReceiver<Vec<u8>>;
        async fn take_initial_message(&self) -> Result<Option<Vec<u8>>>;
        fn register_background_handler(&self, handler: BackgroundHandler);
    }
}

mock! {
    pub Presenter {}

    #[async_trait]
    impl NotificationPresenter for Presenter {
        async fn create_channel(&self, descriptor: ChannelDescriptor) -> Result<()>;
        async fn present(&self, request: PresentationRequest) -> Result<()>;
    }
}
