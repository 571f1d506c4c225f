//! 基础设施层
//!
//! 持有稀缺资源（浏览器、标签页）的抽象，只暴露能力，不认识业务流程。

pub mod automation;
#[cfg(test)]
pub mod fake;
pub mod randomness;

pub use automation::{
    should_block, Automation, ContextHandle, ContextProfile, NavigationResponse, PageHandle, ResourceFilter,
    ResourceKind, Viewport,
};
pub use randomness::{RandomSource, ThreadRandom};
