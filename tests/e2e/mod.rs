//! 推送客户端端到端测试
//!
//! 以模拟平台驱动完整的外壳挂载序列，测试覆盖：
//! - 挂载序列全链路（后台处理器 → 权限 → 令牌 → 前台订阅）
//! - 权限协商矩阵（交互式 / 隐式两种同意模型）
//! - 令牌生命周期（注册、拉取、轮换、失败降级）
//! - 三通道消息路由与退订语义
//! - 渠道声明幂等性

pub mod suites;

pub use setup::TestEnvironment;
