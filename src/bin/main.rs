use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use index_analysis::config::{ApplicationConfig, LogConfig};
use index_analysis::data_ingestion::CsvReader;
use index_analysis::data_provider::{DailyPriceFetcher, YahooChartProvider};
use index_analysis::presenter::{Locale, MonthFilter, Presenter, YearFilter};
use index_analysis::storage::SnapshotStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// 指數日線下載與均線分析工具
#[derive(Debug, Parser)]
#[command(name = "index_analysis", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 下載日線並寫出原始與長週期均線快照
    Fetch {
        /// 代號，預設使用配置中的 fetch.symbol
        #[arg(long)]
        symbol: Option<String>,
        /// 開始日期 (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// 結束日期 (YYYY-MM-DD，不含)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// 依年份與月份顯示收盤價、移動平均與圖表資料
    Show {
        /// 輸入 CSV，預設為配置區間的長週期均線快照
        #[arg(long)]
        input: Option<PathBuf>,
        /// 年份或 All
        #[arg(long, default_value = "All")]
        year: YearFilter,
        /// 月份 (1-12) 或 All
        #[arg(long, default_value = "All")]
        month: MonthFilter,
        /// 語系 (english / japanese)
        #[arg(long)]
        locale: Option<String>,
        /// 將圖表模型寫出為 JSON
        #[arg(long)]
        chart_json: Option<PathBuf>,
    },
    /// 顯示說明與使用方式
    Guide {
        /// 語系 (english / japanese)
        #[arg(long)]
        locale: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置
    let app_config = ApplicationConfig::load_from_env().context("無法加載應用程序配置")?;

    // 初始化日誌系統
    init_logging(&app_config.log)?;

    match cli.command {
        Command::Fetch { symbol, start, end } => run_fetch(&app_config, symbol, start, end).await,
        Command::Show {
            input,
            year,
            month,
            locale,
            chart_json,
        } => run_show(&app_config, input, year, month, locale, chart_json),
        Command::Guide { locale } => {
            let locale = Locale::from_name(locale.as_deref().unwrap_or(&app_config.display.locale));
            let labels = locale.labels();
            println!("{}\n\n{}", labels.help, labels.usage);
            Ok(())
        }
    }
}

async fn run_fetch(
    config: &ApplicationConfig,
    symbol: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<()> {
    let symbol = symbol.unwrap_or_else(|| config.fetch.symbol.clone());
    let start = start.unwrap_or(config.fetch.start);
    let end = end.unwrap_or(config.fetch.end);

    let provider = YahooChartProvider::new(&config.provider).context("無法建立行情供應商")?;
    let fetcher = DailyPriceFetcher::from_config(provider, config);

    let outcome = fetcher
        .fetch_daily_prices(&symbol, start, end)
        .await
        .with_context(|| format!("{} 下載失敗 ({} 至 {})", symbol, start, end))?;

    println!("rows: {}", outcome.row_count());
    if let (Some(first), Some(last)) = (outcome.first_date(), outcome.last_date()) {
        println!("period: {} - {}", first, last);
    }
    println!("raw: {}", outcome.raw_path.display());
    println!("enriched: {}", outcome.enriched_path.display());
    Ok(())
}

fn run_show(
    config: &ApplicationConfig,
    input: Option<PathBuf>,
    year: YearFilter,
    month: MonthFilter,
    locale: Option<String>,
    chart_json: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| {
        SnapshotStore::from_config(&config.storage)
            .enriched_path(config.fetch.start, config.fetch.end)
    });
    let series = CsvReader::default()
        .read_file(&input)
        .with_context(|| format!("無法讀取 {}", input.display()))?;
    info!(path = %input.display(), rows = series.len(), "已載入資料");

    let presenter = Presenter::from_config(config);
    let prepared = presenter.prepare(series).context("指標計算失敗")?;

    let locale = Locale::from_name(locale.as_deref().unwrap_or(&config.display.locale));
    let view = presenter.view(&prepared, locale, year, month);
    let labels = view.labels();

    println!("{}", labels.app_title(presenter.index_name()));
    println!();
    println!("{}", labels.year_prompt);
    println!("  {}", join_options(&view.year_options));
    println!("{}", labels.month_prompt);
    println!("  {}", join_options(&view.month_options));
    println!();
    println!("### {}", labels.daily_data_heading);
    if view.is_empty() {
        println!("{}", labels.empty_selection);
    }
    print!("{}", view.table.render());
    println!();
    println!("{}", view.chart.line.title);
    println!("{}", view.chart.bar.title);

    if let Some(path) = chart_json {
        let json = view.chart.to_json().context("圖表序列化失敗")?;
        std::fs::write(&path, json)
            .with_context(|| format!("無法寫入 {}", path.display()))?;
        info!(path = %path.display(), "圖表資料已寫出");
    }

    Ok(())
}

fn join_options<T: ToString>(options: &[T]) -> String {
    options
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<()> {
    // RUST_LOG 優先於配置中的級別
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.level.to_lowercase()));

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match log_config.format.to_lowercase().as_str() {
        "compact" => tracing::subscriber::set_global_default(builder.compact().finish()),
        _ => tracing::subscriber::set_global_default(builder.pretty().finish()),
    };
    result.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(())
}
