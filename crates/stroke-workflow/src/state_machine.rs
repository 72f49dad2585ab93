//! 预测生命周期状态机
//!
//! 阶段转换规则以表的形式声明，控制器只通过该表推进状态

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stroke_core::{PredictionOutcome, Result, StrokeError};
use uuid::Uuid;

/// 生命周期阶段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Collecting,
    Submitting,
    Resolved,
}

/// 生命周期事件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Submit,
    Succeed,
    Fail,
    Reset,
}

/// 视图模型状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PredictionState {
    Collecting,
    Submitting { submission_id: Uuid },
    Resolved(PredictionOutcome),
}

impl PredictionState {
    pub fn phase(&self) -> LifecyclePhase {
        match self {
            Self::Collecting => LifecyclePhase::Collecting,
            Self::Submitting { .. } => LifecyclePhase::Submitting,
            Self::Resolved(_) => LifecyclePhase::Resolved,
        }
    }

    pub fn outcome(&self) -> Option<&PredictionOutcome> {
        match self {
            Self::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}

impl Default for PredictionState {
    fn default() -> Self {
        Self::Collecting
    }
}

/// 生命周期状态机
#[derive(Debug)]
pub struct LifecycleStateMachine {
    transitions: HashMap<(LifecyclePhase, LifecycleEvent), LifecyclePhase>,
}

impl LifecycleStateMachine {
    pub fn new() -> Self {
        let mut transitions = HashMap::new();

        transitions.insert((LifecyclePhase::Collecting, LifecycleEvent::Submit), LifecyclePhase::Submitting);
        transitions.insert((LifecyclePhase::Submitting, LifecycleEvent::Succeed), LifecyclePhase::Resolved);
        transitions.insert((LifecyclePhase::Submitting, LifecycleEvent::Fail), LifecyclePhase::Resolved);
        transitions.insert((LifecyclePhase::Resolved, LifecycleEvent::Reset), LifecyclePhase::Collecting);

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: LifecyclePhase, event: LifecycleEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// 执行状态转换
    pub fn transition(&self, from: LifecyclePhase, event: LifecycleEvent) -> Result<LifecyclePhase> {
        self.transitions
            .get(&(from, event))
            .copied()
            .ok_or_else(|| StrokeError::InvalidStateTransition {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
            })
    }

    pub fn get_all_phases() -> Vec<LifecyclePhase> {
        vec![
            LifecyclePhase::Collecting,
            LifecyclePhase::Submitting,
            LifecyclePhase::Resolved,
        ]
    }

    /// 获取当前阶段的所有可能事件
    pub fn get_possible_events(&self, current: LifecyclePhase) -> Vec<LifecycleEvent> {
        self.transitions
            .keys()
            .filter(|(phase, _)| *phase == current)
            .map(|(_, event)| *event)
            .collect()
    }
}

impl Default for LifecycleStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let sm = LifecycleStateMachine::new();

        assert!(sm.can_transition(LifecyclePhase::Collecting, LifecycleEvent::Submit));
        assert!(sm.can_transition(LifecyclePhase::Submitting, LifecycleEvent::Succeed));
        assert!(sm.can_transition(LifecyclePhase::Submitting, LifecycleEvent::Fail));
        assert!(sm.can_transition(LifecyclePhase::Resolved, LifecycleEvent::Reset));
    }

    #[test]
    fn test_invalid_transitions() {
        let sm = LifecycleStateMachine::new();

        assert!(!sm.can_transition(LifecyclePhase::Submitting, LifecycleEvent::Submit));
        assert!(!sm.can_transition(LifecyclePhase::Resolved, LifecycleEvent::Submit));
        assert!(!sm.can_transition(LifecyclePhase::Collecting, LifecycleEvent::Reset));
        assert!(!sm.can_transition(LifecyclePhase::Submitting, LifecycleEvent::Reset));
        assert!(!sm.can_transition(LifecyclePhase::Collecting, LifecycleEvent::Succeed));
    }

    #[test]
    fn test_transition_execution() {
        let sm = LifecycleStateMachine::new();

        let result = sm.transition(LifecyclePhase::Collecting, LifecycleEvent::Submit);
        assert_eq!(result.unwrap(), LifecyclePhase::Submitting);

        let result = sm.transition(LifecyclePhase::Resolved, LifecycleEvent::Succeed);
        assert!(matches!(result, Err(StrokeError::InvalidStateTransition { .. })));
    }

    #[test]
    fn test_possible_events() {
        let sm = LifecycleStateMachine::new();

        let mut events = sm.get_possible_events(LifecyclePhase::Submitting);
        events.sort_by_key(|e| format!("{:?}", e));
        assert_eq!(events, vec![LifecycleEvent::Fail, LifecycleEvent::Succeed]);
        assert_eq!(sm.get_possible_events(LifecyclePhase::Resolved), vec![LifecycleEvent::Reset]);
        assert_eq!(LifecycleStateMachine::get_all_phases().len(), 3);
    }
}
