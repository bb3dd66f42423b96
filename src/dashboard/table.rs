//! Filterable, sortable table model behind every list view.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use console::style;
use serde::Serialize;
use strum::Display;
use tabled::builder::Builder;
use tabled::settings::Style;

/// How a column's cells compare when sorting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    /// Integers, possibly with thousands separators.
    Numeric,
    /// Currency text such as `$1,249.99`.
    Price,
    /// `MM/DD/YYYY`
    Date,
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub header: &'static str,
    pub kind: ColumnKind,
    /// Whether the global search looks at this column.
    pub searchable: bool,
}

impl Column {
    pub const fn new(header: &'static str, kind: ColumnKind) -> Self {
        Self {
            header,
            kind,
            searchable: true,
        }
    }

    pub const fn text(header: &'static str) -> Self {
        Self::new(header, ColumnKind::Text)
    }

    /// Excluded from the global search; a per-column query still applies.
    pub const fn unsearchable(mut self) -> Self {
        self.searchable = false;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Row {
    pub cells: Vec<String>,
    /// Highlighted when rendered (near capacity, below minimum stock).
    pub flagged: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
    #[serde(skip)]
    global_query: String,
    #[serde(skip)]
    column_queries: HashMap<usize, String>,
    #[serde(skip)]
    sort_ascending: HashMap<usize, bool>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            global_query: String::new(),
            column_queries: HashMap::new(),
            sort_ascending: HashMap::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.push(cells, false);
    }

    pub fn push(&mut self, cells: Vec<String>, flagged: bool) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(Row { cells, flagged });
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.header.eq_ignore_ascii_case(header))
    }

    /// Query matched against every searchable column.
    pub fn set_global_query(&mut self, query: &str) {
        self.global_query = normalize_query(query);
    }

    /// Query for a single column, AND-ed with the global query and the other columns.
    pub fn set_column_query(&mut self, column: usize, query: &str) {
        let query = normalize_query(query);
        if query.is_empty() {
            self.column_queries.remove(&column);
        } else {
            self.column_queries.insert(column, query);
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        let cell = |idx: usize| {
            row.cells
                .get(idx)
                .map(|c| c.to_lowercase())
                .unwrap_or_default()
        };

        let global = self.global_query.is_empty()
            || self
                .columns
                .iter()
                .enumerate()
                .filter(|(_, c)| c.searchable)
                .any(|(idx, _)| cell(idx).contains(&self.global_query));

        global
            && self
                .column_queries
                .iter()
                .all(|(idx, query)| cell(*idx).contains(query.as_str()))
    }

    /// Rows passing the current filters, in the current sort order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.rows.iter().filter(|row| self.matches(row)).collect()
    }

    /// Flips the sort direction of `column` and reorders the rows.
    /// The first toggle on a column sorts ascending.
    pub fn toggle_sort(&mut self, column: usize) -> Option<SortDirection> {
        let kind = self.columns.get(column)?.kind;
        let ascending = !self.sort_ascending.get(&column).copied().unwrap_or(false);
        self.sort_ascending.insert(column, ascending);

        self.rows.sort_by(|a, b| {
            let ordering = compare_cells(
                kind,
                a.cells.get(column).map(String::as_str).unwrap_or(""),
                b.cells.get(column).map(String::as_str).unwrap_or(""),
            );
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });

        Some(if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        })
    }

    /// Renders the visible rows; flagged rows are highlighted.
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| style(c.header).bold().to_string()));
        for row in self.visible_rows() {
            builder.push_record(row.cells.iter().map(|cell| {
                if row.flagged {
                    style(cell).yellow().to_string()
                } else {
                    cell.clone()
                }
            }));
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }
}

fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Total order over cell text for the given kind. Values that fail to parse
/// sort after the ones that do.
pub fn compare_cells(kind: ColumnKind, a: &str, b: &str) -> Ordering {
    match kind {
        ColumnKind::Numeric => cmp_parsed(parse_numeric(a), parse_numeric(b), f64::total_cmp),
        ColumnKind::Price => cmp_parsed(parse_price(a), parse_price(b), f64::total_cmp),
        ColumnKind::Date => cmp_parsed(parse_date(a), parse_date(b), Ord::cmp),
        ColumnKind::Text => a.trim().to_lowercase().cmp(&b.trim().to_lowercase()),
    }
}

fn cmp_parsed<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_numeric(cell: &str) -> Option<f64> {
    cell.trim().replace(',', "").parse::<f64>().ok()
}

fn parse_price(cell: &str) -> Option<f64> {
    let digits: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok()
}

/// Parses `MM/DD/YYYY` (zero padding optional).
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let mut parts = cell.trim().splitn(3, '/');
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec![
            Column::new("ID", ColumnKind::Numeric),
            Column::text("Item"),
            Column::new("Price", ColumnKind::Price),
            Column::new("Date", ColumnKind::Date).unsearchable(),
        ]);
        table.push_row(vec!["1,200".into(), "Pallet".into(), "$5.00".into(), "03/02/2025".into()]);
        table.push_row(vec!["15".into(), "crate".into(), "$1,249.99".into(), "12/31/2024".into()]);
        table.push_row(vec!["300".into(), "Banding".into(), "$30.10".into(), "3/15/2025".into()]);
        table
    }

    fn column(table: &Table, idx: usize) -> Vec<String> {
        table
            .visible_rows()
            .iter()
            .map(|r| r.cells[idx].clone())
            .collect()
    }

    #[test]
    fn numeric_sort_ignores_separators() {
        let mut table = sample();
        assert_eq!(table.toggle_sort(0), Some(SortDirection::Ascending));
        assert_eq!(column(&table, 0), ["15", "300", "1,200"]);
        assert_eq!(table.toggle_sort(0), Some(SortDirection::Descending));
        assert_eq!(column(&table, 0), ["1,200", "300", "15"]);
    }

    #[test]
    fn price_date_and_text_sorts() {
        let mut table = sample();
        table.toggle_sort(2);
        assert_eq!(column(&table, 2), ["$5.00", "$30.10", "$1,249.99"]);

        table.toggle_sort(3);
        assert_eq!(column(&table, 3), ["12/31/2024", "03/02/2025", "3/15/2025"]);

        table.toggle_sort(1);
        assert_eq!(column(&table, 1), ["Banding", "crate", "Pallet"]);
    }

    #[test]
    fn directions_are_tracked_per_column() {
        let mut table = sample();
        assert_eq!(table.toggle_sort(0), Some(SortDirection::Ascending));
        assert_eq!(table.toggle_sort(1), Some(SortDirection::Ascending));
        assert_eq!(table.toggle_sort(0), Some(SortDirection::Descending));
        assert_eq!(table.toggle_sort(9), None);
    }

    #[test]
    fn global_query_skips_unsearchable_columns() {
        let mut table = sample();
        table.set_global_query("  CRATE ");
        assert_eq!(column(&table, 1), ["crate"]);

        table.set_global_query("2025");
        assert!(table.visible_rows().is_empty());
    }

    #[test]
    fn column_queries_are_anded() {
        let mut table = sample();
        let date = table.column_index("date").unwrap();
        table.set_column_query(date, "2025");
        assert_eq!(table.visible_rows().len(), 2);

        table.set_column_query(1, "ban");
        assert_eq!(column(&table, 1), ["Banding"]);

        table.set_column_query(1, "   ");
        assert_eq!(table.visible_rows().len(), 2);

        table.set_global_query("");
        table.set_column_query(date, "");
        table.set_column_query(1, "");
        assert_eq!(table.visible_rows().len(), 3);
    }

    #[test]
    fn unparseable_values_sort_last() {
        assert_eq!(compare_cells(ColumnKind::Numeric, "N/A", "4"), Ordering::Greater);
        assert_eq!(compare_cells(ColumnKind::Date, "", "01/01/2020"), Ordering::Greater);
        assert_eq!(parse_date("02/30/2024"), None);
    }

    #[test]
    fn render_lists_headers_and_visible_rows() {
        let mut table = sample();
        table.set_global_query("pallet");
        let rendered = console::strip_ansi_codes(&table.render()).to_string();
        assert!(rendered.contains("Item"));
        assert!(rendered.contains("Pallet"));
        assert!(!rendered.contains("Banding"));
    }
}
