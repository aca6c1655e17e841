use super::error::{ValidationError, ValidationResult};
use super::traits::Validator;
use crate::domain_types::PriceRecord;

/// OHLCV 驗證器
///
/// 只檢查存在的欄位；收盤價一定存在，因此一定會被檢查。
/// 開盤價與收盤價可能落在當日高低價之外（供應商資料常見），不視為錯誤。
#[derive(Debug, Default, Clone, Copy)]
pub struct OhlcvValidator;

impl OhlcvValidator {
    /// 創建新的 OHLCV 驗證器
    pub fn new() -> Self {
        Self
    }

    /// 最高價不得低於最低價
    fn validate_high_low(&self, record: &PriceRecord) -> ValidationResult<()> {
        if let (Some(high), Some(low)) = (record.high, record.low) {
            if high < low {
                return Err(ValidationError::InconsistentValue {
                    description: format!("{} 最高價 ({}) 低於最低價 ({})", record.date, high, low),
                });
            }
        }

        Ok(())
    }

    /// 價格必須為正的有限數值
    fn validate_prices(&self, record: &PriceRecord) -> ValidationResult<()> {
        let prices = [
            ("開盤價", record.open),
            ("最高價", record.high),
            ("最低價", record.low),
            ("收盤價", Some(record.close)),
        ];

        for (name, price) in prices {
            let Some(price) = price else {
                continue;
            };

            if !price.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    value: price.to_string(),
                    reason: "無效的數值（NaN 或無限大）".to_string(),
                });
            }

            if price <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: name.to_string(),
                    value: price.to_string(),
                    reason: "價格必須為正數".to_string(),
                });
            }
        }

        Ok(())
    }

    /// 成交量必須為非負的有限數值
    fn validate_volume(&self, record: &PriceRecord) -> ValidationResult<()> {
        let Some(volume) = record.volume else {
            return Ok(());
        };

        if !volume.is_finite() || volume < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "成交量".to_string(),
                value: volume.to_string(),
                reason: "成交量必須為非負的有限數值".to_string(),
            });
        }

        Ok(())
    }
}

impl Validator for OhlcvValidator {
    type Data = PriceRecord;

    fn name(&self) -> &str {
        "OhlcvValidator"
    }

    fn validate_record(&self, record: &Self::Data) -> ValidationResult<()> {
        self.validate_prices(record)?;
        self.validate_volume(record)?;
        self.validate_high_low(record)
    }
}
