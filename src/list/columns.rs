//! Column descriptors of the company table.
//!
//! Each column renders a row through a pure function, independent of the
//! widget that finally draws the cell.

use serde::Serialize;

use crate::domain::types::CompanyId;
use crate::list::projector::CompanyRow;

/// Turns a raw amount into a display string.
pub trait CurrencyFormatter {
    fn format(&self, amount: f64) -> String;
}

/// US dollar formatting with thousands separators, e.g. `$4,200.00`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}${grouped}.{cents}")
    }
}

/// Rendered content of one table cell.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Title {
        name: String,
        avatar_url: Option<String>,
        initials: String,
    },
    Amount {
        formatted: String,
    },
    Actions {
        id: CompanyId,
    },
}

pub type CellRenderer = fn(&CompanyRow, &dyn CurrencyFormatter) -> Cell;

#[derive(Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
    /// Query field used when the header is clicked, if sortable.
    pub sort_field: Option<&'static str>,
    /// Pinned to the right edge of the table.
    pub fixed_right: bool,
    pub render: CellRenderer,
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("sort_field", &self.sort_field)
            .field("fixed_right", &self.fixed_right)
            .finish()
    }
}

fn render_title(row: &CompanyRow, _: &dyn CurrencyFormatter) -> Cell {
    Cell::Title {
        name: row.name.clone(),
        avatar_url: row.avatar_url.clone(),
        initials: row.initials.clone(),
    }
}

fn render_revenue(row: &CompanyRow, formatter: &dyn CurrencyFormatter) -> Cell {
    Cell::Amount {
        formatted: formatter.format(row.total_revenue),
    }
}

fn render_actions(row: &CompanyRow, _: &dyn CurrencyFormatter) -> Cell {
    Cell::Actions { id: row.id }
}

/// Columns of the company list, left to right.
pub fn company_columns() -> Vec<Column> {
    vec![
        Column {
            key: "name",
            title: "Company Title",
            sort_field: Some("name"),
            fixed_right: false,
            render: render_title,
        },
        Column {
            key: "totalRevenue",
            title: "Open deals amount",
            sort_field: None,
            fixed_right: false,
            render: render_revenue,
        },
        Column {
            key: "id",
            title: "Actions",
            sort_field: None,
            fixed_right: true,
            render: render_actions,
        },
    ]
}

/// Renders `row` through every column.
pub fn render_row(
    row: &CompanyRow,
    columns: &[Column],
    formatter: &dyn CurrencyFormatter,
) -> Vec<Cell> {
    columns
        .iter()
        .map(|column| (column.render)(row, formatter))
        .collect()
}
