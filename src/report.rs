//! Phase 3: The Reporter
//!
//! Renders realized trades as text lines or a JSON document, to the
//! console or to a file.

use eyre::Result;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::ReportFormat;
use crate::series::PriceSeries;
use crate::solver::Trade;

#[derive(Debug, Serialize)]
struct JsonTrade<'a> {
    #[serde(flatten)]
    trade: &'a Trade,
    open_label: Option<&'a str>,
    close_label: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    trades: Vec<JsonTrade<'a>>,
    trade_count: usize,
    total_profit: f64,
}

pub struct Reporter {
    precision: usize,
    format: ReportFormat,
}

impl Reporter {
    pub fn new(precision: usize, format: ReportFormat) -> Self {
        Self { precision, format }
    }

    /// One line per trade
    pub fn trade_line(&self, number: usize, trade: &Trade) -> String {
        format!(
            "Trade {} - Buy: {} -> Sell: {} = Profit: {:.prec$}  ---- start: {}, end: {}",
            number,
            trade.buy_value,
            trade.sell_value,
            trade.profit,
            trade.open_index,
            trade.close_index,
            prec = self.precision
        )
    }

    pub fn total_line(&self, total_profit: f64) -> String {
        format!("total profit: {:.prec$}", total_profit, prec = self.precision)
    }

    /// Render the full report in the configured format
    pub fn render(&self, trades: &[Trade], total_profit: f64, series: &PriceSeries) -> Result<String> {
        match self.format {
            ReportFormat::Text => {
                let mut out = String::new();
                for (number, trade) in trades.iter().enumerate() {
                    out.push_str(&self.trade_line(number, trade));
                    out.push('\n');
                }
                out.push_str(&self.total_line(total_profit));
                out.push('\n');
                Ok(out)
            }
            ReportFormat::Json => {
                let report = JsonReport {
                    trades: trades
                        .iter()
                        .map(|trade| JsonTrade {
                            trade,
                            open_label: series.label(trade.open_index),
                            close_label: series.label(trade.close_index),
                        })
                        .collect(),
                    trade_count: trades.len(),
                    total_profit,
                };
                let mut json = serde_json::to_string_pretty(&report)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    pub fn write_to<W: Write>(
        &self,
        mut writer: W,
        trades: &[Trade],
        total_profit: f64,
        series: &PriceSeries,
    ) -> Result<()> {
        let rendered = self.render(trades, total_profit, series)?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write the report to a file, creating parent directories if needed
    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        trades: &[Trade],
        total_profit: f64,
        series: &PriceSeries,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        self.write_to(file, trades, total_profit, series)?;

        info!("Wrote {} trades to {}", trades.len(), path.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(4, ReportFormat::Text)
    }
}
