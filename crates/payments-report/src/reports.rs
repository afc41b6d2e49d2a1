//! Report generation (console text, JSON and CSV summary)

use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::path::Path;

use crate::config::ReportConfig;
use crate::constants;
use crate::ledger::{LedgerTotals, Reconciliation};

/// Format an atomic amount in display units with thousands separators
///
/// `decimals` is the number of fractional digits in one atomic unit, so
/// `format_amount(123456, 2)` is `"1,234.56"`. Integer arithmetic only.
pub fn format_amount(amount: i64, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let magnitude = amount.unsigned_abs() as u128;
    let whole = (magnitude / scale).to_string();
    let fraction = magnitude % scale;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0 { "-" } else { "" };
    if decimals == 0 {
        format!("{}{}", sign, grouped)
    } else {
        format!(
            "{}{}.{:0width$}",
            sign,
            grouped,
            fraction,
            width = decimals as usize
        )
    }
}

/// Line writer for one report section
struct Section<'a> {
    out: String,
    config: &'a ReportConfig,
}

impl<'a> Section<'a> {
    fn new(config: &'a ReportConfig) -> Self {
        Self {
            out: String::new(),
            config,
        }
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn rule(&mut self, c: char) {
        let rule = c.to_string().repeat(constants::RULE_WIDTH);
        self.push_line(&rule);
    }

    fn header(&mut self, heading: &str) {
        self.rule('=');
        let title = format!("Report of {} ({}):", self.config.title, heading);
        self.push_line(&title);
        self.rule('=');
    }

    fn line(&mut self, label: &str, amount: i64) {
        let line = format!(
            "{:<label_width$} {:>amount_width$} {}",
            label,
            format_amount(amount, self.config.decimals),
            self.config.ticker,
            label_width = constants::LABEL_WIDTH,
            amount_width = constants::AMOUNT_WIDTH,
        );
        self.push_line(&line);
    }

    fn sub_line(&mut self, label: &str, amount: i64) {
        let line = format!(
            "{:indent$}{:<label_width$} {:>amount_width$} {}",
            "",
            label,
            format_amount(amount, self.config.decimals),
            self.config.ticker,
            indent = constants::INDENT,
            label_width = constants::LABEL_WIDTH - constants::INDENT,
            amount_width = constants::AMOUNT_WIDTH,
        );
        self.push_line(&line);
    }

    fn reconciliation(&mut self, result: &Reconciliation) {
        self.rule('-');
        self.line("Balance", result.balance);
        self.sub_line("- Balance reported by RPC", result.reported);
        self.rule('-');
        self.line("Difference (should be 0)", result.difference);
        self.rule('=');
    }
}

/// Render the incoming/outgoing and sent-to-others sections
pub fn render_text_report(totals: &LedgerTotals, config: &ReportConfig) -> Result<String> {
    let mut section = Section::new(config);

    section.header("Incoming / Outgoing Balance");
    section.line("Total Amount Incoming", totals.incoming);
    section.sub_line("- Total Amount Outgoing (Raw)", totals.outgoing);
    section.sub_line("+ Change Transfers", totals.change);
    section.sub_line("+ Transfers To Self", totals.sent_to_self);
    section.reconciliation(&totals.incoming_outgoing()?);

    section.push_line("");

    section.header("Amount sent to others");
    section.line("Total Amount Incoming", totals.incoming);
    section.sub_line("- Amount sent to others", totals.sent_to_others);
    section.sub_line("- Fees", totals.fees);
    section.reconciliation(&totals.sent_to_others()?);

    Ok(section.out)
}

/// Print the text report to stdout
pub fn print_report(totals: &LedgerTotals, config: &ReportConfig) -> Result<()> {
    print!("{}", render_text_report(totals, config)?);
    Ok(())
}

/// Machine-readable report for --json
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub title: &'a str,
    pub address: &'a str,
    pub ticker: &'a str,
    pub decimals: u32,
    pub totals: LedgerTotals,
    pub incoming_outgoing: Reconciliation,
    pub sent_to_others: Reconciliation,
}

impl<'a> ReportSummary<'a> {
    pub fn new(totals: &LedgerTotals, config: &'a ReportConfig) -> Result<Self> {
        Ok(Self {
            title: &config.title,
            address: &config.self_address,
            ticker: &config.ticker,
            decimals: config.decimals,
            totals: *totals,
            incoming_outgoing: totals.incoming_outgoing()?,
            sent_to_others: totals.sent_to_others()?,
        })
    }
}

/// Render the report as pretty JSON
pub fn render_json_report(totals: &LedgerTotals, config: &ReportConfig) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ReportSummary::new(totals, config)?)?)
}

/// Metric rows shared by the CSV summary
fn summary_rows(totals: &LedgerTotals) -> Result<Vec<(&'static str, i64)>> {
    let io = totals.incoming_outgoing()?;
    let sto = totals.sent_to_others()?;

    Ok(vec![
        ("Total Transaction", totals.transaction),
        ("Total Incoming", totals.incoming),
        ("Total Outgoing", totals.outgoing),
        ("Change Transfers", totals.change),
        ("Transfers To Self", totals.sent_to_self),
        ("Sent To Others", totals.sent_to_others),
        ("Fees", totals.fees),
        ("Incoming/Outgoing Balance", io.balance),
        ("Incoming/Outgoing Difference", io.difference),
        ("Sent To Others Balance", sto.balance),
        ("Sent To Others Difference", sto.difference),
    ])
}

/// Write the summary CSV to any writer
fn write_summary<W: std::io::Write>(
    wtr: &mut Writer<W>,
    totals: &LedgerTotals,
    config: &ReportConfig,
) -> Result<()> {
    wtr.write_record(["Metric", "Amount_Units", "Amount_Display"])?;

    for (metric, amount) in summary_rows(totals)? {
        wtr.write_record([
            metric,
            &amount.to_string(),
            &format_amount(amount, config.decimals),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Generate the summary CSV at `path`
pub fn generate_summary_csv(path: &Path, totals: &LedgerTotals, config: &ReportConfig) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_summary(&mut wtr, totals, config)?;
    tracing::info!("Generated: {}", path.display());
    Ok(())
}
