//! Plain-text rendering of grids, breakdowns and batch summaries.
//!
//! Every function returns a `String` so output can be tested without a
//! terminal. Lines never carry trailing whitespace.

use std::fmt::Write;

use payment_core::calculations::{CellResult, ScenarioMatrix};
use payment_core::format::{format_compact, format_currency, format_rate, format_whole};
use payment_core::{PaymentDetail, TermRateTable, VehicleConfiguration};

const LABEL_WIDTH: usize = 10;
const CELL_WIDTH: usize = 9;
const SHEET_LABEL_WIDTH: usize = 18;

/// Marks a cell whose payment is below the monthly budget.
pub const WITHIN_BUDGET_MARK: char = '*';

fn push_line(
    out: &mut String,
    line: &str,
) {
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Whole-dollar payment with a trailing marker column.
fn cell_text(cell: &CellResult) -> String {
    match cell {
        Ok(cell) if cell.is_within_budget => {
            format!("{}{WITHIN_BUDGET_MARK}", format_whole(cell.monthly_payment))
        }
        Ok(cell) => format!("{} ", format_whole(cell.monthly_payment)),
        Err(_) => "n/a ".to_string(),
    }
}

/// Renders the scenario grid.
///
/// The first two lines give the base total and budget, then a header of
/// terms with their finance rates, then one row per cash-down variant.
pub fn render_matrix(
    matrix: &ScenarioMatrix,
    rates: &TermRateTable,
    vehicle: &VehicleConfiguration,
) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!(
            "base total {}, budget {}/mo",
            format_currency(matrix.base_total),
            format_currency(vehicle.monthly_budget)
        ),
    );
    out.push('\n');

    let mut header = format!("{:<LABEL_WIDTH$}", "cash down");
    let mut rate_line = format!("{:<LABEL_WIDTH$}", "rate");
    for &term in &matrix.terms {
        let _ = write!(header, "{:>CELL_WIDTH$}", format!("{term} mo"));
        let _ = write!(rate_line, "{:>CELL_WIDTH$}", format_rate(rates.rate_for(term), 2));
    }
    push_line(&mut out, &header);
    push_line(&mut out, &rate_line);

    for row in &matrix.rows {
        let mut line = format!("{:<LABEL_WIDTH$}", format_compact(row.cash_down_variant));
        for cell in &row.cells {
            let _ = write!(line, "{:>CELL_WIDTH$}", cell_text(cell));
        }
        push_line(&mut out, &line);
    }

    out.push('\n');
    push_line(&mut out, &format!("{WITHIN_BUDGET_MARK} within budget"));
    out
}

fn sheet_line(
    out: &mut String,
    label: &str,
    value: &str,
) {
    push_line(out, &format!("{label:<SHEET_LABEL_WIDTH$}{value}"));
}

/// Renders one cell's breakdown sheet from its snapshot.
pub fn render_detail(detail: &PaymentDetail) -> String {
    let mut out = String::new();
    push_line(&mut out, &format!("{}-month breakdown", detail.term_months));
    out.push('\n');

    let financed = format_currency(detail.amount_financed());
    let combined = format_rate(detail.combined_rate_percent(), 3);

    sheet_line(&mut out, "Base total", &format_currency(detail.base_total));
    sheet_line(&mut out, "Cash down", &format_currency(detail.cash_down));
    sheet_line(&mut out, "Trade-in", &format_currency(detail.trade_in_value));
    sheet_line(&mut out, "Amount financed", &financed);
    sheet_line(&mut out, "State tax rate", &format_rate(detail.state_tax_rate_percent, 3));
    sheet_line(&mut out, "Finance rate", &format_rate(detail.finance_rate_percent, 3));
    sheet_line(&mut out, "Combined rate", &combined);
    sheet_line(
        &mut out,
        "Formula",
        &format!("{financed} x (1 + {combined}) / {}", detail.term_months),
    );
    sheet_line(&mut out, "Monthly payment", &format_currency(detail.monthly_payment));
    out
}

/// One labelled deal and its grid, for [`render_batch`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub label: String,
    pub matrix: ScenarioMatrix,
}

/// Renders one summary line per deal: base total, the middle cash-down
/// row's payment for each term, and how many cells are within budget.
pub fn render_batch(entries: &[BatchEntry]) -> String {
    let Some(first) = entries.first() else {
        return "no deals\n".to_string();
    };

    let label_width = entries
        .iter()
        .map(|entry| entry.label.len())
        .max()
        .unwrap_or(0)
        .max("deal".len())
        + 2;

    let mut out = String::new();
    let mut header = format!("{:<label_width$}{:>CELL_WIDTH$}", "deal", "base");
    for &term in &first.matrix.terms {
        let _ = write!(header, "{:>CELL_WIDTH$}", format!("{term} mo"));
    }
    let _ = write!(header, "{:>CELL_WIDTH$}", "budget");
    push_line(&mut out, &header);

    for entry in entries {
        let matrix = &entry.matrix;
        let mut line = format!(
            "{:<label_width$}{:>CELL_WIDTH$}",
            entry.label,
            format_currency(matrix.base_total)
        );
        if let Some(middle) = matrix.rows.get(1) {
            for cell in &middle.cells {
                let _ = write!(line, "{:>CELL_WIDTH$}", cell_text(cell));
            }
        }
        let _ = write!(
            line,
            "{:>CELL_WIDTH$}",
            format!("{}/{}", matrix.within_budget_count(), matrix.cell_count())
        );
        push_line(&mut out, &line);
    }
    out
}
