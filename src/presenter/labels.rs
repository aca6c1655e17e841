//! 英文與日文的顯示文字

use super::filter::YearFilter;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// 支援的語系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Locale {
    #[default]
    English,
    Japanese,
}

/// 語系名稱對照（小寫）
static LOCALE_NAMES: Lazy<HashMap<&'static str, Locale>> = Lazy::new(|| {
    HashMap::from([
        ("english", Locale::English),
        ("en", Locale::English),
        ("japanese", Locale::Japanese),
        ("ja", Locale::Japanese),
        ("jp", Locale::Japanese),
        ("日本語", Locale::Japanese),
    ])
});

impl Locale {
    /// 依名稱取得語系，無法辨識時退回英文
    pub fn from_name(name: &str) -> Self {
        match LOCALE_NAMES.get(name.trim().to_lowercase().as_str()) {
            Some(locale) => *locale,
            None => {
                debug!(name, "未知語系，使用英文");
                Locale::English
            }
        }
    }

    /// 選單上顯示的名稱
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Japanese => "日本語",
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Locale::English => &ENGLISH,
            Locale::Japanese => &JAPANESE,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 單一語系的固定文字
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub language_prompt: &'static str,
    pub year_prompt: &'static str,
    pub month_prompt: &'static str,
    pub daily_data_heading: &'static str,
    pub close_price: &'static str,
    pub date: &'static str,
    pub price: &'static str,
    /// 接在窗口大小之後，例如 `50` + `-Day Moving Average`
    pub moving_average_suffix: &'static str,
    pub middle_band: &'static str,
    pub upper_band: &'static str,
    pub lower_band: &'static str,
    pub help_button: &'static str,
    pub usage_button: &'static str,
    pub help: &'static str,
    pub usage: &'static str,
    pub empty_selection: &'static str,
}

impl Labels {
    pub fn moving_average(&self, window: usize) -> String {
        format!("{}{}", window, self.moving_average_suffix)
    }

    pub fn app_title(&self, index_name: &str) -> String {
        format!("{} Analysis", index_name)
    }

    /// 折線圖標題，選定年份時附加 ` for <year>`
    pub fn line_chart_title(&self, index_name: &str, year: YearFilter) -> String {
        with_year(format!("{} Close Price", index_name), year)
    }

    /// 長條圖標題，選定年份時附加 ` for <year>`
    pub fn bar_chart_title(&self, index_name: &str, year: YearFilter) -> String {
        with_year(format!("{} Close Price Bar Chart", index_name), year)
    }
}

fn with_year(title: String, year: YearFilter) -> String {
    match year {
        YearFilter::All => title,
        YearFilter::Year(y) => format!("{} for {}", title, y),
    }
}

const LANGUAGE_PROMPT: &str = "Select Language / 言語を選択してください:";

static ENGLISH: Labels = Labels {
    language_prompt: LANGUAGE_PROMPT,
    year_prompt: "Select the year to display (or select 'All' for all years)",
    month_prompt: "Select the month to display (or select 'All' for the entire year)",
    daily_data_heading: "Daily Data",
    close_price: "Close Price",
    date: "Date",
    price: "Price",
    moving_average_suffix: "-Day Moving Average",
    middle_band: "Middle Band",
    upper_band: "Upper Band",
    lower_band: "Lower Band",
    help_button: "Show Help",
    usage_button: "How to Use",
    help: "\
Help Section

Question: How does the moving average help in understanding price trends?

Answer: It supports investment decisions by providing the direction of the trend, \
levels of support and resistance, and trading signals. This allows investors to make \
more informed decisions.",
    usage: "\
How to Use the Application:

1. Select the year and month to filter the data.
2. View the daily closing prices along with moving averages and Bollinger Bands.
3. Use the graphs to analyze trends and make investment decisions.",
    empty_selection: "No data for the selected period.",
};

static JAPANESE: Labels = Labels {
    language_prompt: LANGUAGE_PROMPT,
    year_prompt: "表示したい年を選択してください (全ての年を表示するには 'All' を選択)",
    month_prompt: "表示したい月を選択してください (全てのデータを表示するには 'All' を選択)",
    daily_data_heading: "日ごとのデータ",
    // 圖表圖例與座標軸沿用英文
    close_price: "Close Price",
    date: "Date",
    price: "Price",
    moving_average_suffix: "-Day Moving Average",
    middle_band: "Middle Band",
    upper_band: "Upper Band",
    lower_band: "Lower Band",
    help_button: "ヘルプを表示",
    usage_button: "使い方",
    help: "\
ヘルプ

質問: 移動平均線はどのように価格のトレンドを把握する助けとなりますか？

回答: トレンドの方向性、サポート・レジスタンスのレベル、売買シグナルを提供することで、\
投資判断をサポートします。これにより、投資家はより情報に基づいた意思決定を行うことができます。",
    usage: "\
アプリケーションの使い方:

1. データをフィルタリングするために年と月を選択します。
2. 日ごとの終値と移動平均、ボリンジャーバンドを表示します。
3. グラフを使用してトレンドを分析し、投資判断を行います。",
    empty_selection: "選択した期間のデータはありません。",
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("English", Locale::English)]
    #[case("en", Locale::English)]
    #[case("Japanese", Locale::Japanese)]
    #[case("日本語", Locale::Japanese)]
    #[case(" JA ", Locale::Japanese)]
    #[case("français", Locale::English)]
    #[case("", Locale::English)]
    fn test_from_name(#[case] name: &str, #[case] expected: Locale) {
        assert_eq!(Locale::from_name(name), expected);
    }

    #[test]
    fn test_titles() {
        let labels = Locale::English.labels();
        assert_eq!(
            labels.line_chart_title("S&P 500", YearFilter::All),
            "S&P 500 Close Price"
        );
        assert_eq!(
            labels.bar_chart_title("S&P 500", YearFilter::Year(2019)),
            "S&P 500 Close Price Bar Chart for 2019"
        );
        assert_eq!(labels.moving_average(200), "200-Day Moving Average");
    }

    #[test]
    fn test_locales_differ_in_prompts() {
        let en = Locale::English.labels();
        let ja = Locale::Japanese.labels();
        assert_ne!(en.year_prompt, ja.year_prompt);
        assert_ne!(en.help, ja.help);
        assert_eq!(en.language_prompt, ja.language_prompt);
        assert_eq!(ja.daily_data_heading, "日ごとのデータ");
    }
}
