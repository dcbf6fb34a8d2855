//! 推送管道模拟器
//!
//! 扮演应用外壳：装配模拟平台，按挂载顺序驱动推送服务的四个操作
//! （后台处理器 → 权限 → 令牌 → 前台订阅），再向三条通道各注入
//! 一条消息，打印外壳可见的状态变化。

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use mock_platform::{MockMessaging, MockPermissions, MockPresenter};
use push_client::PushService;
use push_shared::config::AppConfig;
use push_shared::messages::{AuthorizationState, ConsentModel, ConsentState};
use push_shared::{observability, test_utils};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    /// 交互式同意平台（每次请求都可能弹窗）
    Interactive,
    /// 隐式同意平台（默认允许，仅未定状态弹窗）
    Implicit,
}

impl From<ModelArg> for ConsentModel {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::Interactive => ConsentModel::Interactive,
            ModelArg::Implicit => ConsentModel::Implicit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PromptArg {
    Grant,
    Deny,
}

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "push-simulator", about = "模拟平台推送管道，演练完整挂载序列")]
struct Args {
    /// 同意模型
    #[arg(long, value_enum, default_value_t = ModelArg::Implicit)]
    consent_model: ModelArg,

    /// 用户对权限弹窗的应答
    #[arg(long, value_enum, default_value_t = PromptArg::Grant)]
    prompt: PromptArg,

    /// 模拟进程由通知点按冷启动拉起
    #[arg(long)]
    with_initial: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load("push-simulator")?;
    config.platform.consent_model = args.consent_model.into();
    observability::init(&config.observability)?;

    // 装配模拟平台
    let permissions = Arc::new(MockPermissions::new());
    permissions.answer_next_prompt(match args.prompt {
        PromptArg::Grant => AuthorizationState::Authorized,
        PromptArg::Deny => AuthorizationState::Denied,
    });
    let messaging = Arc::new(MockMessaging::new());
    let presenter = Arc::new(MockPresenter::new());

    if args.with_initial {
        messaging.set_initial_message(&test_utils::remote_message(
            "Welcome back",
            "Tapped from tray",
        ));
    }

    // 服务构造一次，构造路径内完成默认渠道声明
    let service = PushService::new(
        &config,
        permissions.clone(),
        messaging.clone(),
        presenter.clone(),
    )
    .await;

    // 外壳挂载序列
    service.setup_background_handler();

    let granted = service.request_user_permission().await;
    let consent = ConsentState::from_granted(granted);
    info!(consent = %consent, prompts = permissions.request_count(), "权限协商结果");

    if !granted {
        // 外壳只向用户呈现 granted / denied 两种终局
        warn!("未获得通知权限，推送功能不可用");
        return Ok(());
    }

    match service.get_fcm_token().await {
        Some(token) => info!(token = %token, "FCM 令牌已就绪"),
        None => warn!("令牌暂不可用"),
    }

    let subscription = service.setup_foreground_handler().await;

    // 三条通道各注入一条消息
    messaging.deliver_foreground(&test_utils::remote_message_with_data(
        "Sale",
        "50% off",
        &[("screen", "offers")],
    ));
    messaging.trigger_background(&test_utils::remote_message("Synced", "Inbox updated"));
    messaging.deliver_opened(&test_utils::remote_message("Reminder", "Tap to view"));
    tokio::time::sleep(Duration::from_millis(100)).await;

    for record in presenter.presented() {
        info!(
            title = %record.request.title,
            message = %record.request.message,
            channel_id = %record.request.channel_id,
            "前台消息已合成本地通知"
        );
    }

    // 卸载：释放前台订阅，此后投递的前台消息不再呈现
    subscription.unsubscribe().await;
    messaging.deliver_foreground(&test_utils::remote_message("Late", "after teardown"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    info!(
        presented = presenter.presented_count(),
        "退订后呈现计数保持不变"
    );

    Ok(())
}
