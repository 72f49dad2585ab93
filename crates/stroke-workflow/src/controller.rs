//! 预测请求控制器
//!
//! 控制器独占视图模型，只在提交动作和请求结束时修改状态。
//! 通过 `&mut self` 保证同一时间最多只有一个请求在途。

use std::collections::HashMap;

use stroke_core::{PredictRequest, PredictResponse, PredictionOutcome, Result, StrokeError};
use stroke_form::{FormValidator, ValidationResult};
use stroke_integration::PredictionService;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::state_machine::{LifecycleEvent, LifecyclePhase, LifecycleStateMachine, PredictionState};

/// 视图监听接口
pub trait ViewListener: Send {
    /// 状态变化后同步调用
    fn on_state_change(&mut self, state: &PredictionState);

    /// 进入提交状态时回到页面顶部
    fn scroll_to_top(&mut self) {}
}

/// 不做任何处理的视图监听
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewListener;

impl ViewListener for NoopViewListener {
    fn on_state_change(&mut self, _state: &PredictionState) {}
}

/// 已进入提交状态、等待结果的请求
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub submission_id: Uuid,
    pub request: PredictRequest,
}

/// 预测请求控制器
pub struct PredictionController<S, V = NoopViewListener>
where
    S: PredictionService,
    V: ViewListener,
{
    validator: FormValidator,
    service: S,
    listener: V,
    machine: LifecycleStateMachine,
    state: PredictionState,
    draft: HashMap<String, String>,
}

impl<S: PredictionService> PredictionController<S, NoopViewListener> {
    pub fn new(service: S) -> Self {
        Self::with_listener(service, NoopViewListener)
    }
}

impl<S, V> PredictionController<S, V>
where
    S: PredictionService,
    V: ViewListener,
{
    pub fn with_listener(service: S, listener: V) -> Self {
        Self {
            validator: FormValidator::new(),
            service,
            listener,
            machine: LifecycleStateMachine::new(),
            state: PredictionState::Collecting,
            draft: HashMap::new(),
        }
    }

    pub fn state(&self) -> &PredictionState {
        &self.state
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.state.phase()
    }

    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        self.state.outcome()
    }

    /// 是否已提交（提交中或已出结果）
    pub fn is_submitted(&self) -> bool {
        self.state.phase() != LifecyclePhase::Collecting
    }

    pub fn draft(&self) -> &HashMap<String, String> {
        &self.draft
    }

    pub fn listener(&self) -> &V {
        &self.listener
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// 更新一个表单字段并返回该字段的实时验证结果
    pub fn update_field(&mut self, key: &str, raw: &str) -> std::result::Result<(), String> {
        if self.phase() != LifecyclePhase::Collecting {
            return Err("The form cannot be edited until the current result is reset.".to_string());
        }

        self.draft.insert(key.to_string(), raw.to_string());
        self.validator.validate_field(key, Some(raw))
    }

    /// 验证当前草稿
    pub fn validate(&self) -> ValidationResult {
        self.validator.validate(&self.draft)
    }

    /// 清空表单草稿（仅收集阶段可用）
    pub fn clear_form(&mut self) -> Result<()> {
        if self.phase() != LifecyclePhase::Collecting {
            return Err(StrokeError::InvalidStateTransition {
                from: format!("{:?}", self.phase()),
                event: "ClearForm".to_string(),
            });
        }
        self.draft.clear();
        Ok(())
    }

    /// 验证草稿并进入提交状态
    ///
    /// 视图通知与回到顶部在返回之前同步完成。验证失败时状态保持不变。
    pub fn begin_submit(&mut self) -> Result<PendingSubmission> {
        // 先检查状态，提交中或已出结果时不允许再次提交
        self.machine.transition(self.phase(), LifecycleEvent::Submit)?;

        let record = self.validator.parse(&self.draft).map_err(|report| {
            warn!("Submission blocked: {}", report.get_summary());
            StrokeError::Validation(report.get_detailed_report())
        })?;

        let submission_id = Uuid::new_v4();
        let request = PredictRequest::from_record(&record);

        self.apply(LifecycleEvent::Submit, PredictionState::Submitting { submission_id })?;
        self.listener.scroll_to_top();

        info!("Submission {} started for {}", submission_id, request.name);
        Ok(PendingSubmission {
            submission_id,
            request,
        })
    }

    /// 用请求结果结束本次提交
    pub fn settle(
        &mut self,
        pending: PendingSubmission,
        result: Result<PredictResponse>,
    ) -> Result<PredictionOutcome> {
        let event = if result.is_ok() {
            LifecycleEvent::Succeed
        } else {
            LifecycleEvent::Fail
        };

        match &self.state {
            PredictionState::Submitting { submission_id } if *submission_id == pending.submission_id => {}
            PredictionState::Submitting { submission_id } => {
                return Err(StrokeError::Internal(format!(
                    "Submission {} is not the one in flight ({})",
                    pending.submission_id, submission_id
                )));
            }
            other => {
                return Err(StrokeError::InvalidStateTransition {
                    from: format!("{:?}", other.phase()),
                    event: format!("{:?}", event),
                });
            }
        }

        let outcome = match result {
            Ok(response) => {
                info!(
                    "Submission {} resolved with probability {}",
                    pending.submission_id, response.probability
                );
                PredictionOutcome::success(pending.submission_id, response.probability)
            }
            Err(e) => {
                error!("Submission {} failed: {}", pending.submission_id, e);
                PredictionOutcome::failure(pending.submission_id, e.status_code())
            }
        };

        self.apply(event, PredictionState::Resolved(outcome.clone()))?;
        Ok(outcome)
    }

    /// 提交表单：验证、发送唯一一次请求并记录结果
    ///
    /// 只有验证失败或状态不允许提交时返回错误；请求失败会成为失败结果。
    pub async fn submit(&mut self) -> Result<PredictionOutcome> {
        let pending = self.begin_submit()?;
        debug!("Calling prediction service {}", self.service.name());
        let result = self.service.predict(&pending.request).await;
        self.settle(pending, result)
    }

    /// 从结果页回到收集状态，表单草稿保留以便再次使用
    pub fn reset(&mut self) -> Result<()> {
        self.apply(LifecycleEvent::Reset, PredictionState::Collecting)?;
        info!("Prediction result cleared");
        Ok(())
    }

    fn apply(&mut self, event: LifecycleEvent, next: PredictionState) -> Result<()> {
        let to = self.machine.transition(self.phase(), event)?;
        if to != next.phase() {
            return Err(StrokeError::Internal(format!(
                "Event {:?} leads to {:?}, not {:?}",
                event,
                to,
                next.phase()
            )));
        }

        debug!("Lifecycle {:?} --{:?}--> {:?}", self.phase(), event, to);
        self.state = next;
        self.listener.on_state_change(&self.state);
        Ok(())
    }
}
