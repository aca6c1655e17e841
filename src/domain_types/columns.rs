//! 欄位名稱定義

/// CSV 與指標欄位名稱
///
/// 名稱沿用既有快照檔案的欄位，讀取舊檔案時不需要額外映射。
pub struct ColumnName;

impl ColumnName {
    pub const DATE: &'static str = "Date";
    pub const OPEN: &'static str = "Open";
    pub const HIGH: &'static str = "High";
    pub const LOW: &'static str = "Low";
    pub const CLOSE: &'static str = "Close";
    pub const VOLUME: &'static str = "Volume";

    /// 布林通道中軌
    pub const MIDDLE_BAND: &'static str = "Middle_Band";
    /// 布林通道上軌
    pub const UPPER_BAND: &'static str = "Upper_Band";
    /// 布林通道下軌
    pub const LOWER_BAND: &'static str = "Lower_Band";

    /// 下載時附加的長週期（約三年）移動平均
    pub const LONG_MOVING_AVERAGE: &'static str = "3Y_MA";

    const MOVING_AVERAGE_SUFFIX: &'static str = "_MA";

    /// 移動平均欄位名稱，例如 `50_MA`
    pub fn moving_average(window: usize) -> String {
        format!("{}{}", window, Self::MOVING_AVERAGE_SUFFIX)
    }

    /// 從欄位名稱取回移動平均的窗口大小
    ///
    /// `3Y_MA` 不是以數字命名，因此不會被視為一般的移動平均欄位。
    pub fn parse_moving_average(name: &str) -> Option<usize> {
        name.strip_suffix(Self::MOVING_AVERAGE_SUFFIX)?
            .parse()
            .ok()
    }

    /// 是否為布林通道欄位
    pub fn is_bollinger(name: &str) -> bool {
        matches!(
            name,
            Self::MIDDLE_BAND | Self::UPPER_BAND | Self::LOWER_BAND
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_name() {
        assert_eq!(ColumnName::moving_average(50), "50_MA");
        assert_eq!(ColumnName::moving_average(700), "700_MA");
    }

    #[test]
    fn test_parse_moving_average() {
        assert_eq!(ColumnName::parse_moving_average("200_MA"), Some(200));
        assert_eq!(ColumnName::parse_moving_average("3Y_MA"), None);
        assert_eq!(ColumnName::parse_moving_average("Close"), None);
        assert_eq!(ColumnName::parse_moving_average("_MA"), None);
    }

    #[test]
    fn test_is_bollinger() {
        assert!(ColumnName::is_bollinger("Upper_Band"));
        assert!(!ColumnName::is_bollinger("50_MA"));
    }
}
