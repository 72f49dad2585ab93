//! # 预测请求生命周期模块
//!
//! 管理一次预测提交的完整生命周期：
//! - 生命周期状态机：收集 → 提交中 → 已出结果，结果页可重置回收集
//! - 控制器：持有表单草稿、发起唯一一次请求并把结果映射为最终状态
//! - 视图监听：状态变化与回到页面顶部的通知

pub mod controller;
pub mod state_machine;

pub use controller::{NoopViewListener, PendingSubmission, PredictionController, ViewListener};
pub use state_machine::{LifecycleEvent, LifecyclePhase, LifecycleStateMachine, PredictionState};
