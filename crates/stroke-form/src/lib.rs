//! # 表单验证模块
//!
//! 定义患者表单的字段规则，并在提交前完成逐字段验证：
//! - 字段规则以数据形式声明（数值范围、枚举取值、文本长度、0/1标志）
//! - 所有违规字段一次性报告，不在第一个错误处停止
//! - 验证通过后生成强类型的 `PatientRecord`

pub mod schema;
pub mod validator;

pub use schema::{keys, FieldRule, FieldSpec, FieldValue, FormSchema};
pub use validator::{FieldError, FormValidator, ValidationResult};
