//! 患者表单验证器
//!
//! 对原始输入（字段名 → 字符串）逐字段验证，汇总全部错误后再决定是否允许提交

use std::collections::HashMap;

use serde::Serialize;
use stroke_core::{Gender, PatientRecord, ResidenceType, SmokingStatus, WorkType};
use tracing::{debug, info};

use crate::schema::{keys, FieldValue, FormSchema};

/// 单个字段的验证错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// 患者表单验证器
#[derive(Debug, Clone)]
pub struct FormValidator {
    schema: FormSchema,
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl FormValidator {
    /// 使用患者表单规则创建验证器
    pub fn new() -> Self {
        Self::with_schema(FormSchema::patient())
    }

    pub fn with_schema(schema: FormSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// 实时验证单个字段
    pub fn validate_field(&self, key: &str, raw: Option<&str>) -> Result<(), String> {
        let spec = self
            .schema
            .field(key)
            .ok_or_else(|| format!("Unknown field: {}", key))?;

        spec.rule.check(spec.label, raw).map(|_| ())
    }

    /// 验证整张表单，报告所有违规字段
    pub fn validate(&self, fields: &HashMap<String, String>) -> ValidationResult {
        self.check_all(fields).0
    }

    /// 验证并生成患者记录；任一字段不合法时返回完整的验证结果
    pub fn parse(&self, fields: &HashMap<String, String>) -> Result<PatientRecord, ValidationResult> {
        let (mut result, values) = self.check_all(fields);
        if !result.is_valid {
            return Err(result);
        }

        match build_record(&values) {
            Ok(record) => {
                info!("Patient form validated for: {}", record.name);
                Ok(record)
            }
            Err(error) => {
                result.add_error(error.field, error.message);
                Err(result)
            }
        }
    }

    fn check_all(
        &self,
        fields: &HashMap<String, String>,
    ) -> (ValidationResult, HashMap<&'static str, FieldValue>) {
        let mut result = ValidationResult::new();
        let mut values = HashMap::new();

        for spec in &self.schema.fields {
            match spec.rule.check(spec.label, fields.get(spec.key).map(String::as_str)) {
                Ok(value) => {
                    debug!("Field {} passed validation", spec.key);
                    values.insert(spec.key, value);
                }
                Err(message) => result.add_error(spec.key, message),
            }
        }

        let mut unknown: Vec<&String> = fields
            .keys()
            .filter(|key| self.schema.field(key).is_none())
            .collect();
        unknown.sort();
        for key in unknown {
            result.add_warning(format!("Unknown field ignored: {}", key));
        }

        debug!(
            "Form validation finished: {} errors, {} warnings",
            result.error_count(),
            result.warning_count()
        );

        (result, values)
    }
}

fn text(values: &HashMap<&'static str, FieldValue>, key: &str) -> Result<String, FieldError> {
    match values.get(key) {
        Some(FieldValue::Text(text)) => Ok(text.clone()),
        _ => Err(missing(key)),
    }
}

fn number(values: &HashMap<&'static str, FieldValue>, key: &str) -> Result<f64, FieldError> {
    match values.get(key) {
        Some(FieldValue::Number(value)) => Ok(*value),
        _ => Err(missing(key)),
    }
}

fn flag(values: &HashMap<&'static str, FieldValue>, key: &str) -> Result<bool, FieldError> {
    match values.get(key) {
        Some(FieldValue::Flag(value)) => Ok(*value),
        _ => Err(missing(key)),
    }
}

fn choice<T>(values: &HashMap<&'static str, FieldValue>, key: &str) -> Result<T, FieldError>
where
    T: for<'a> TryFrom<&'a str>,
{
    match values.get(key) {
        Some(FieldValue::Choice(option)) => T::try_from(*option).map_err(|_| FieldError {
            field: key.to_string(),
            message: format!("Unsupported value: {}", option),
        }),
        _ => Err(missing(key)),
    }
}

fn missing(key: &str) -> FieldError {
    FieldError {
        field: key.to_string(),
        message: format!("Field {} has no validated value", key),
    }
}

fn build_record(values: &HashMap<&'static str, FieldValue>) -> Result<PatientRecord, FieldError> {
    Ok(PatientRecord {
        name: text(values, keys::NAME)?,
        age: number(values, keys::AGE)?,
        gender: choice::<Gender>(values, keys::GENDER)?,
        hypertension: flag(values, keys::HYPERTENSION)?,
        heart_disease: flag(values, keys::HEART_DISEASE)?,
        ever_married: flag(values, keys::EVER_MARRIED)?,
        work_type: choice::<WorkType>(values, keys::WORK_TYPE)?,
        residence_type: choice::<ResidenceType>(values, keys::RESIDENCE_TYPE)?,
        average_glucose_level: number(values, keys::AVERAGE_GLUCOSE_LEVEL)?,
        body_mass_index: number(values, keys::BODY_MASS_INDEX)?,
        smoking_status: choice::<SmokingStatus>(values, keys::SMOKING_STATUS)?,
    })
}

/// 验证结果
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// 字段错误列表
    pub errors: Vec<FieldError>,
    /// 验证警告列表
    pub warnings: Vec<String>,
    /// 是否通过验证
    pub is_valid: bool,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        }
    }

    /// 添加字段错误
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 指定字段的错误信息
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// 获取验证报告摘要
    pub fn get_summary(&self) -> String {
        if self.is_valid {
            if self.has_warnings() {
                format!("Validation passed with {} warning(s)", self.warning_count())
            } else {
                "Validation passed".to_string()
            }
        } else {
            format!(
                "Validation failed: {} error(s), {} warning(s)",
                self.error_count(),
                self.warning_count()
            )
        }
    }

    /// 获取详细的验证报告
    pub fn get_detailed_report(&self) -> String {
        let mut report = String::new();

        if self.has_errors() {
            report.push_str("=== Errors ===\n");
            for (i, error) in self.errors.iter().enumerate() {
                report.push_str(&format!("{}. {}: {}\n", i + 1, error.field, error.message));
            }
            report.push('\n');
        }

        if self.has_warnings() {
            report.push_str("=== Warnings ===\n");
            for (i, warning) in self.warnings.iter().enumerate() {
                report.push_str(&format!("{}. {}\n", i + 1, warning));
            }
            report.push('\n');
        }

        report.push_str(&format!("=== Result ===\n{}\n", self.get_summary()));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldRule;

    fn valid_fields() -> HashMap<String, String> {
        [
            (keys::NAME, "Jane Doe"),
            (keys::AGE, "67"),
            (keys::GENDER, "Female"),
            (keys::HYPERTENSION, "0"),
            (keys::HEART_DISEASE, "1"),
            (keys::EVER_MARRIED, "1"),
            (keys::WORK_TYPE, "Private"),
            (keys::RESIDENCE_TYPE, "Urban"),
            (keys::AVERAGE_GLUCOSE_LEVEL, "228.69"),
            (keys::BODY_MASS_INDEX, "36.6"),
            (keys::SMOKING_STATUS, "Formerly Smoked"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_valid_form_parses() {
        let validator = FormValidator::new();
        let record = validator.parse(&valid_fields()).unwrap();

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.age, 67.0);
        assert_eq!(record.gender, Gender::Female);
        assert!(!record.hypertension);
        assert!(record.heart_disease);
        assert_eq!(record.work_type, WorkType::Private);
        assert_eq!(record.smoking_status, SmokingStatus::FormerlySmoked);
    }

    #[test]
    fn test_age_bounds() {
        let validator = FormValidator::new();

        for age in -10..=130 {
            let outcome = validator.validate_field(keys::AGE, Some(age.to_string().as_str()));
            assert_eq!(outcome.is_ok(), (0..=120).contains(&age), "age {}", age);
        }

        assert!(validator.validate_field(keys::AGE, Some("120.5")).is_err());
        assert!(validator.validate_field(keys::AGE, Some("-0.1")).is_err());
        assert!(validator.validate_field(keys::AGE, Some("0.5")).is_ok());
    }

    #[test]
    fn test_enum_fields_accept_declared_values_only() {
        let validator = FormValidator::new();

        for spec in &validator.schema().fields {
            if let FieldRule::Choice { options } = &spec.rule {
                for option in options {
                    assert!(validator.validate_field(spec.key, Some(*option)).is_ok());
                }
                assert!(validator.validate_field(spec.key, Some("Other")).is_err());
                assert!(validator.validate_field(spec.key, Some(option_case_flip(options[0]).as_str())).is_err());
                assert!(validator.validate_field(spec.key, None).is_err());
            }
        }
    }

    fn option_case_flip(option: &str) -> String {
        option
            .chars()
            .map(|c| {
                if c.is_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                }
            })
            .collect()
    }

    #[test]
    fn test_all_violations_reported_together() {
        let validator = FormValidator::new();
        let mut fields = valid_fields();
        fields.insert(keys::AGE.to_string(), "150".to_string());
        fields.insert(keys::GENDER.to_string(), "Other".to_string());
        fields.insert(keys::BODY_MASS_INDEX.to_string(), "5".to_string());
        fields.remove(keys::SMOKING_STATUS);

        let result = validator.parse(&fields).unwrap_err();

        assert!(!result.is_valid);
        assert_eq!(result.error_count(), 4);
        assert_eq!(result.error_for(keys::AGE), Some("Age must be at most 120."));
        assert!(result.error_for(keys::GENDER).is_some());
        assert_eq!(result.error_for(keys::BODY_MASS_INDEX), Some("Body Mass Index must be at least 10."));
        assert_eq!(result.error_for(keys::SMOKING_STATUS), Some("Smoking Status is required."));
        assert!(result.error_for(keys::NAME).is_none());
    }

    #[test]
    fn test_name_defaults_to_unknown() {
        let validator = FormValidator::new();
        let mut fields = valid_fields();
        fields.remove(keys::NAME);

        let record = validator.parse(&fields).unwrap();
        assert_eq!(record.name, "Unknown");

        fields.insert(keys::NAME.to_string(), "J".to_string());
        let result = validator.parse(&fields).unwrap_err();
        assert_eq!(result.error_for(keys::NAME), Some("Name must be at least 2 characters."));
    }

    #[test]
    fn test_unknown_fields_only_warn() {
        let validator = FormValidator::new();
        let mut fields = valid_fields();
        fields.insert("symptoms".to_string(), "Headache".to_string());

        let result = validator.validate(&fields);
        assert!(result.is_valid);
        assert_eq!(result.warning_count(), 1);
        assert!(validator.parse(&fields).is_ok());
        assert!(validator.validate_field("symptoms", Some("Headache")).is_err());
    }

    #[test]
    fn test_validation_result() {
        let mut result = ValidationResult::new();

        result.add_warning("test warning".to_string());
        assert!(result.has_warnings());
        assert!(result.is_valid);

        result.add_error(keys::AGE, "Age must be a number.");
        assert!(result.has_errors());
        assert!(!result.is_valid);

        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
        assert!(result.get_detailed_report().contains("1. age: Age must be a number."));
        assert_eq!(result.get_summary(), "Validation failed: 1 error(s), 1 warning(s)");
    }
}
