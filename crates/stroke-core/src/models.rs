//! 核心数据模型定义
//!
//! 表单内部取值与外部预测服务取值之间的映射全部集中在此处，
//! 每个枚举同时提供 `as_str`（表单字面量）和 `as_api_str`（接口字面量）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StrokeError;
use crate::utils::{failure_message, format_probability};

/// 未填写姓名时使用的默认值
pub const DEFAULT_PATIENT_NAME: &str = "Unknown";

/// 性别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn as_api_str(&self) -> &'static str {
        self.as_str()
    }
}

impl TryFrom<&str> for Gender {
    type Error = StrokeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == value)
            .ok_or_else(|| StrokeError::Validation(format!("Unknown gender: {}", value)))
    }
}

/// 工作类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WorkType {
    Private,
    SelfEmployed,
    GovernmentJob,
    Children,
}

impl WorkType {
    pub const ALL: [WorkType; 4] = [
        WorkType::Private,
        WorkType::SelfEmployed,
        WorkType::GovernmentJob,
        WorkType::Children,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "Private",
            Self::SelfEmployed => "Self-employed",
            Self::GovernmentJob => "Government Job",
            Self::Children => "Children",
        }
    }

    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Private => "Private",
            Self::SelfEmployed => "Self-employed",
            Self::GovernmentJob => "Govt_job",
            Self::Children => "children",
        }
    }
}

impl TryFrom<&str> for WorkType {
    type Error = StrokeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == value)
            .ok_or_else(|| StrokeError::Validation(format!("Unknown work type: {}", value)))
    }
}

/// 居住地类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResidenceType {
    Urban,
    Rural,
}

impl ResidenceType {
    pub const ALL: [ResidenceType; 2] = [ResidenceType::Urban, ResidenceType::Rural];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Rural => "Rural",
        }
    }

    pub fn as_api_str(&self) -> &'static str {
        self.as_str()
    }
}

impl TryFrom<&str> for ResidenceType {
    type Error = StrokeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == value)
            .ok_or_else(|| StrokeError::Validation(format!("Unknown residence type: {}", value)))
    }
}

/// 吸烟状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SmokingStatus {
    FormerlySmoked,
    NeverSmoked,
    Smokes,
    Unknown,
}

impl SmokingStatus {
    pub const ALL: [SmokingStatus; 4] = [
        SmokingStatus::FormerlySmoked,
        SmokingStatus::NeverSmoked,
        SmokingStatus::Smokes,
        SmokingStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormerlySmoked => "Formerly Smoked",
            Self::NeverSmoked => "Never Smoked",
            Self::Smokes => "Smokes",
            Self::Unknown => "Unknown",
        }
    }

    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::FormerlySmoked => "Formerly smoked",
            Self::NeverSmoked => "Never smoked",
            Self::Smokes => "Smokes",
            Self::Unknown => "Unknown",
        }
    }
}

impl TryFrom<&str> for SmokingStatus {
    type Error = StrokeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| StrokeError::Validation(format!("Unknown smoking status: {}", value)))
    }
}

/// 0/1 标志位到接口 "Yes"/"No" 的映射
pub fn flag_as_api_str(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// 患者健康指标（表单收集阶段）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub name: String,
    pub age: f64,
    pub gender: Gender,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub ever_married: bool,
    pub work_type: WorkType,
    pub residence_type: ResidenceType,
    pub average_glucose_level: f64,
    pub body_mass_index: f64,
    pub smoking_status: SmokingStatus,
}

/// 预测接口请求体
///
/// 字段名与取值均为外部服务的字面量，不要改名。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictRequest {
    pub name: String,
    pub age: f64,
    pub avg_glucose_level: f64,
    pub bmi: f64,
    pub hypertension: String,
    pub heartdisease: String,
    pub gender: String,
    pub ever_married: String,
    pub work_type: String,
    #[serde(rename = "Residence_type")]
    pub residence_type: String,
    pub smoking_status: String,
}

impl PredictRequest {
    /// 将表单记录转换为接口请求（纯函数）
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            name: record.name.clone(),
            age: record.age,
            avg_glucose_level: record.average_glucose_level,
            bmi: record.body_mass_index,
            hypertension: flag_as_api_str(record.hypertension).to_string(),
            heartdisease: flag_as_api_str(record.heart_disease).to_string(),
            gender: record.gender.as_api_str().to_string(),
            ever_married: flag_as_api_str(record.ever_married).to_string(),
            work_type: record.work_type.as_api_str().to_string(),
            residence_type: record.residence_type.as_api_str().to_string(),
            smoking_status: record.smoking_status.as_api_str().to_string(),
        }
    }
}

impl From<&PatientRecord> for PredictRequest {
    fn from(record: &PatientRecord) -> Self {
        Self::from_record(record)
    }
}

/// 预测接口响应体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub probability: f64,
}

/// 单次提交的最终结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Success {
        submission_id: Uuid,
        probability: f64,
        text: String,
        resolved_at: DateTime<Utc>,
    },
    Failure {
        submission_id: Uuid,
        status_code: Option<u16>,
        message: String,
        resolved_at: DateTime<Utc>,
    },
}

impl PredictionOutcome {
    pub fn success(submission_id: Uuid, probability: f64) -> Self {
        Self::Success {
            submission_id,
            probability,
            text: format_probability(probability),
            resolved_at: Utc::now(),
        }
    }

    pub fn failure(submission_id: Uuid, status_code: Option<u16>) -> Self {
        Self::Failure {
            submission_id,
            status_code,
            message: failure_message(status_code),
            resolved_at: Utc::now(),
        }
    }

    /// 成功标志（失败时为 false）
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn submission_id(&self) -> Uuid {
        match self {
            Self::Success { submission_id, .. } | Self::Failure { submission_id, .. } => {
                *submission_id
            }
        }
    }

    /// 展示给用户的文本：成功时为概率，失败时为错误信息
    pub fn display_text(&self) -> &str {
        match self {
            Self::Success { text, .. } => text,
            Self::Failure { message, .. } => message,
        }
    }

    /// 视图层使用的结果载荷
    pub fn to_view_payload(&self) -> serde_json::Value {
        match self {
            Self::Success { probability, .. } => serde_json::json!({
                "ok": true,
                "probability": probability,
            }),
            Self::Failure { message, .. } => serde_json::json!({
                "ok": false,
                "message": message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PatientRecord {
        PatientRecord {
            name: "Jane".to_string(),
            age: 67.0,
            gender: Gender::Female,
            hypertension: true,
            heart_disease: false,
            ever_married: true,
            work_type: WorkType::GovernmentJob,
            residence_type: ResidenceType::Rural,
            average_glucose_level: 228.69,
            body_mass_index: 36.6,
            smoking_status: SmokingStatus::FormerlySmoked,
        }
    }

    #[test]
    fn test_request_mapping() {
        let request = PredictRequest::from_record(&sample_record());

        assert_eq!(request.hypertension, "Yes");
        assert_eq!(request.heartdisease, "No");
        assert_eq!(request.ever_married, "Yes");
        assert_eq!(request.work_type, "Govt_job");
        assert_eq!(request.residence_type, "Rural");
        assert_eq!(request.smoking_status, "Formerly smoked");
        assert_eq!(request.bmi, 36.6);
        assert_eq!(request.avg_glucose_level, 228.69);
    }

    #[test]
    fn test_request_wire_names() {
        let value = serde_json::to_value(PredictRequest::from_record(&sample_record())).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "name",
            "age",
            "avg_glucose_level",
            "bmi",
            "hypertension",
            "heartdisease",
            "gender",
            "ever_married",
            "work_type",
            "Residence_type",
            "smoking_status",
        ] {
            assert!(obj.contains_key(key), "missing key {}", key);
        }
        assert_eq!(obj.len(), 11);
    }

    #[test]
    fn test_api_literal_tables() {
        let work: Vec<_> = WorkType::ALL.iter().map(|w| w.as_api_str()).collect();
        assert_eq!(work, ["Private", "Self-employed", "Govt_job", "children"]);

        let smoking: Vec<_> = SmokingStatus::ALL.iter().map(|s| s.as_api_str()).collect();
        assert_eq!(smoking, ["Formerly smoked", "Never smoked", "Smokes", "Unknown"]);

        assert_eq!(flag_as_api_str(true), "Yes");
        assert_eq!(flag_as_api_str(false), "No");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!(WorkType::try_from("Government Job").unwrap(), WorkType::GovernmentJob);
        assert_eq!(Gender::try_from("Female").unwrap(), Gender::Female);
        assert!(Gender::try_from("Other").is_err());
        assert!(SmokingStatus::try_from("smokes").is_err());
    }

    #[test]
    fn test_outcome_payloads() {
        let id = Uuid::new_v4();
        let ok = PredictionOutcome::success(id, 0.42);
        assert!(ok.is_ok());
        assert_eq!(ok.display_text(), "0.42");
        assert_eq!(ok.submission_id(), id);

        let failed = PredictionOutcome::failure(id, Some(500));
        assert!(!failed.is_ok());
        assert!(failed.display_text().contains("500"));
        assert_eq!(failed.to_view_payload()["ok"], serde_json::json!(false));
    }
}
