use std::fmt;
use thiserror::Error;

/// 單筆記錄的驗證錯誤
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} 的值 {value} 無效: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("價格不一致: {description}")]
    InconsistentValue { description: String },

    #[error("時間順序錯誤: {current} 出現在 {previous} 之後")]
    OutOfOrder { previous: String, current: String },

    #[error("重複的日期: {date}")]
    DuplicateEntry { date: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// 批次驗證錯誤集合，記錄每個錯誤所在的列索引
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<(usize, ValidationError)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, row: usize, error: ValidationError) {
        self.errors.push((row, error));
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
        self.errors.sort_by_key(|(row, _)| *row);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn first(&self) -> Option<&(usize, ValidationError)> {
        self.errors.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, ValidationError)> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.first() {
            Some((row, error)) => write!(
                f,
                "共 {} 筆驗證錯誤，第一筆位於第 {} 筆記錄: {}",
                self.errors.len(),
                row,
                error
            ),
            None => write!(f, "沒有驗證錯誤"),
        }
    }
}

impl std::error::Error for ValidationErrors {}
