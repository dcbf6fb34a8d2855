//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::warn;

use crate::error::PushError;
use crate::messages::{ChannelDescriptor, ChannelImportance, ConsentModel};

/// 平台配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// 平台同意模型：interactive（交互式弹窗）或 implicit（默认允许）
    pub consent_model: ConsentModel,
}

/// 默认通知渠道配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sound: String,
    pub importance: u8,
    pub vibrate: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: "default-channel".to_string(),
            name: "Default Channel".to_string(),
            description: "A default channel for notifications".to_string(),
            sound: "default".to_string(),
            importance: 4,
            vibrate: true,
        }
    }
}

impl ChannelConfig {
    /// 转换为渠道描述符
    ///
    /// 配置中的非法重要性级别降级为 High 并记录告警，
    /// 不让一处配置笔误阻断整个启动流程。
    pub fn descriptor(&self) -> ChannelDescriptor {
        let importance = ChannelImportance::try_from(self.importance).unwrap_or_else(|e| {
            warn!(
                channel_id = %self.id,
                importance = self.importance,
                error = %e,
                "渠道重要性配置非法，降级为 High"
            );
            ChannelImportance::High
        });

        ChannelDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            sound: self.sound.clone(),
            importance,
            vibrate: self.vibrate,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub platform: PlatformConfig,
    pub channel: ChannelConfig,
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "push-client".to_string(),
            environment: "development".to_string(),
            platform: PlatformConfig::default(),
            channel: ChannelConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. 内置默认值
    /// 2. config/default.toml（默认配置）
    /// 3. config/{environment}.toml（环境特定配置）
    /// 4. 环境变量（PUSH_ 前缀，如 PUSH_ENVIRONMENT -> environment）
    pub fn load(service_name: &str) -> Result<Self, PushError> {
        let env = std::env::var("PUSH_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            // 默认配置
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            // 加载默认配置文件
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            // 加载环境特定配置
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{env}.toml"))).required(false),
            )
            // 环境变量覆盖（PUSH_ENVIRONMENT -> environment）
            .add_source(
                Environment::with_prefix("PUSH")
                    .separator("_")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
