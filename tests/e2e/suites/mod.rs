//! 端到端测试套件

pub mod mount_flow;
pub mod routing;
pub mod token_lifecycle;
