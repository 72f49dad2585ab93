//! 表单字段规则定义

use serde::Serialize;
use stroke_core::{Gender, ResidenceType, SmokingStatus, WorkType, DEFAULT_PATIENT_NAME};

/// 表单字段键名
pub mod keys {
    pub const NAME: &str = "name";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const HYPERTENSION: &str = "hypertension";
    pub const HEART_DISEASE: &str = "heartDisease";
    pub const EVER_MARRIED: &str = "everMarried";
    pub const WORK_TYPE: &str = "workType";
    pub const RESIDENCE_TYPE: &str = "residenceType";
    pub const AVERAGE_GLUCOSE_LEVEL: &str = "averageGlucoseLevel";
    pub const BODY_MASS_INDEX: &str = "bodyMassIndex";
    pub const SMOKING_STATUS: &str = "smokingStatus";
}

/// 单个字段的验证规则
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldRule {
    /// 文本，空白时使用默认值
    Text {
        min_len: usize,
        max_len: usize,
        default: Option<&'static str>,
    },
    /// 闭区间数值
    Number { min: f64, max: f64 },
    /// 枚举取值
    Choice { options: Vec<&'static str> },
    /// 0/1 标志
    Flag,
}

/// 通过验证后的字段值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Choice(&'static str),
    Flag(bool),
}

impl FieldRule {
    /// 按规则检查原始输入，返回解析后的值或面向用户的错误信息
    pub fn check(&self, label: &str, raw: Option<&str>) -> Result<FieldValue, String> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());

        match self {
            FieldRule::Text {
                min_len,
                max_len,
                default,
            } => match (raw, default) {
                (None, Some(default)) => Ok(FieldValue::Text(default.to_string())),
                (None, None) => Err(format!("{} is required.", label)),
                (Some(text), _) => {
                    let len = text.chars().count();
                    if len < *min_len {
                        Err(format!("{} must be at least {} characters.", label, min_len))
                    } else if len > *max_len {
                        Err(format!("{} must be at most {} characters.", label, max_len))
                    } else {
                        Ok(FieldValue::Text(text.to_string()))
                    }
                }
            },
            FieldRule::Number { min, max } => {
                let text = raw.ok_or_else(|| format!("{} is required.", label))?;
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| format!("{} must be a number.", label))?;

                if value < *min {
                    Err(format!("{} must be at least {}.", label, min))
                } else if value > *max {
                    Err(format!("{} must be at most {}.", label, max))
                } else {
                    Ok(FieldValue::Number(value))
                }
            }
            FieldRule::Choice { options } => {
                let text = raw.ok_or_else(|| format!("{} is required.", label))?;
                options
                    .iter()
                    .find(|option| **option == text)
                    .map(|option| FieldValue::Choice(*option))
                    .ok_or_else(|| format!("{} must be one of: {}.", label, options.join(", ")))
            }
            FieldRule::Flag => match raw {
                Some("1") => Ok(FieldValue::Flag(true)),
                Some("0") => Ok(FieldValue::Flag(false)),
                Some(_) => Err(format!("{} must be 0 or 1.", label)),
                None => Err(format!("{} is required.", label)),
            },
        }
    }
}

/// 字段声明
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub fn new(key: &'static str, label: &'static str, rule: FieldRule) -> Self {
        Self { key, label, rule }
    }
}

/// 表单结构
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// 患者表单的字段规则
    pub fn patient() -> Self {
        let fields = vec![
            FieldSpec::new(
                keys::NAME,
                "Name",
                FieldRule::Text {
                    min_len: 2,
                    max_len: 100,
                    default: Some(DEFAULT_PATIENT_NAME),
                },
            ),
            FieldSpec::new(keys::AGE, "Age", FieldRule::Number { min: 0.0, max: 120.0 }),
            FieldSpec::new(
                keys::GENDER,
                "Gender",
                FieldRule::Choice {
                    options: Gender::ALL.iter().map(|g| g.as_str()).collect(),
                },
            ),
            FieldSpec::new(keys::HYPERTENSION, "Hypertension", FieldRule::Flag),
            FieldSpec::new(keys::HEART_DISEASE, "Heart Disease", FieldRule::Flag),
            FieldSpec::new(keys::EVER_MARRIED, "Ever Married", FieldRule::Flag),
            FieldSpec::new(
                keys::WORK_TYPE,
                "Work Type",
                FieldRule::Choice {
                    options: WorkType::ALL.iter().map(|w| w.as_str()).collect(),
                },
            ),
            FieldSpec::new(
                keys::RESIDENCE_TYPE,
                "Residence Type",
                FieldRule::Choice {
                    options: ResidenceType::ALL.iter().map(|r| r.as_str()).collect(),
                },
            ),
            FieldSpec::new(
                keys::AVERAGE_GLUCOSE_LEVEL,
                "Average Glucose Level",
                FieldRule::Number { min: 0.0, max: 300.0 },
            ),
            FieldSpec::new(
                keys::BODY_MASS_INDEX,
                "Body Mass Index",
                FieldRule::Number { min: 10.0, max: 50.0 },
            ),
            FieldSpec::new(
                keys::SMOKING_STATUS,
                "Smoking Status",
                FieldRule::Choice {
                    options: SmokingStatus::ALL.iter().map(|s| s.as_str()).collect(),
                },
            ),
        ];

        Self { fields }
    }

    /// 按键名查找字段
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.key)
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::patient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_rule() {
        let rule = FieldRule::Text {
            min_len: 2,
            max_len: 5,
            default: Some("Unknown"),
        };

        assert_eq!(rule.check("Name", None), Ok(FieldValue::Text("Unknown".to_string())));
        assert_eq!(rule.check("Name", Some("   ")), Ok(FieldValue::Text("Unknown".to_string())));
        assert_eq!(rule.check("Name", Some(" Al ")), Ok(FieldValue::Text("Al".to_string())));
        assert!(rule.check("Name", Some("A")).is_err());
        assert!(rule.check("Name", Some("Albert")).is_err());
    }

    #[test]
    fn test_number_rule() {
        let rule = FieldRule::Number { min: 10.0, max: 50.0 };

        assert_eq!(rule.check("BMI", Some("10")), Ok(FieldValue::Number(10.0)));
        assert_eq!(rule.check("BMI", Some("50")), Ok(FieldValue::Number(50.0)));
        assert_eq!(rule.check("BMI", Some("9.99")), Err("BMI must be at least 10.".to_string()));
        assert_eq!(rule.check("BMI", Some("50.1")), Err("BMI must be at most 50.".to_string()));
        assert_eq!(rule.check("BMI", Some("abc")), Err("BMI must be a number.".to_string()));
        assert_eq!(rule.check("BMI", Some("NaN")), Err("BMI must be a number.".to_string()));
        assert_eq!(rule.check("BMI", None), Err("BMI is required.".to_string()));
    }

    #[test]
    fn test_flag_rule() {
        assert_eq!(FieldRule::Flag.check("Hypertension", Some("1")), Ok(FieldValue::Flag(true)));
        assert_eq!(FieldRule::Flag.check("Hypertension", Some("0")), Ok(FieldValue::Flag(false)));
        assert!(FieldRule::Flag.check("Hypertension", Some("2")).is_err());
        assert!(FieldRule::Flag.check("Hypertension", Some("yes")).is_err());
    }

    #[test]
    fn test_patient_schema() {
        let schema = FormSchema::patient();
        assert_eq!(schema.fields.len(), 11);
        assert!(schema.field(keys::WORK_TYPE).is_some());
        assert!(schema.field("symptoms").is_none());

        match &schema.field(keys::WORK_TYPE).unwrap().rule {
            FieldRule::Choice { options } => assert_eq!(options.len(), 4),
            other => panic!("unexpected rule: {:?}", other),
        }
    }
}
