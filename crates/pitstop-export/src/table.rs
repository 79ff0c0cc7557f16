//! HTML table extraction.
//!
//! Event payloads carry the award standings as an HTML fragment at
//! `htmlList.table`. Only the first `<table>` is read. Header names come from
//! the last `<thead>` row, or from a leading row made only of `<th>` cells.
//! `colspan` is honoured by repeating the cell; `rowspan` is not.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Number, Value};

use crate::error::TableError;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));

/// Plain or comma-grouped decimal: `12`, `-3.5`, `1,234`, `1,234.50`.
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?$").expect("valid numeric regex")
});

/// Upper bound on `colspan`, matching what browsers accept.
const MAX_COLSPAN: usize = 1000;

/// A parsed table: unique column names and rows of whitespace-normalised
/// cell text (`None` for empty cells), every row as wide as `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

struct RawCell {
    is_header: bool,
    text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Integer,
    Float,
}

impl Table {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by column name, in column order.
    ///
    /// A column whose non-empty cells are all numeric becomes JSON numbers:
    /// integers when every value is integral, floats otherwise. Empty cells
    /// are `null`.
    #[must_use]
    pub fn to_records(&self) -> Vec<Value> {
        let kinds: Vec<ColumnKind> = (0..self.columns.len())
            .map(|i| column_kind(self.rows.iter().filter_map(|r| r[i].as_deref())))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::with_capacity(self.columns.len());
                for ((name, cell), kind) in self.columns.iter().zip(row).zip(&kinds) {
                    record.insert(name.clone(), cell_value(cell.as_deref(), *kind));
                }
                Value::Object(record)
            })
            .collect()
    }
}

/// Finds the HTML string at `htmlList.table`.
///
/// # Errors
///
/// Returns a [`TableError`] when the payload is not an object, the path is
/// missing, null or an empty string, or the value is not a string.
pub fn locate_table_html(payload: &Value) -> Result<&str, TableError> {
    let object = payload.as_object().ok_or(TableError::NotAnObject)?;
    let value = object
        .get("htmlList")
        .and_then(|h| h.get("table"))
        .ok_or(TableError::Missing)?;
    match value {
        Value::Null => Err(TableError::Missing),
        Value::String(s) if s.is_empty() => Err(TableError::Missing),
        Value::String(s) => Ok(s),
        _ => Err(TableError::NotAString),
    }
}

/// Parses the first `<table>` in `html`.
///
/// # Errors
///
/// Returns [`TableError::NoTableElement`] if the fragment has no table.
pub fn parse_table(html: &str) -> Result<Table, TableError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or(TableError::NoTableElement)?;

    let (mut head_rows, mut body_rows) = collect_rows(table);

    let header: Option<Vec<Option<String>>> = if let Some(last) = head_rows.pop() {
        Some(last.into_iter().map(|c| c.text).collect())
    } else if body_rows
        .first()
        .is_some_and(|r| !r.is_empty() && r.iter().all(|c| c.is_header))
    {
        let first = body_rows.remove(0);
        Some(first.into_iter().map(|c| c.text).collect())
    } else {
        None
    };

    let width = body_rows
        .iter()
        .map(Vec::len)
        .chain(header.as_ref().map(Vec::len))
        .max()
        .unwrap_or(0);

    let names: Vec<String> = (0..width)
        .map(|i| match &header {
            Some(h) => h
                .get(i)
                .cloned()
                .flatten()
                .unwrap_or_else(|| format!("Unnamed: {i}")),
            None => i.to_string(),
        })
        .collect();

    let rows = body_rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<Option<String>> = row.into_iter().map(|c| c.text).collect();
            cells.resize(width, None);
            cells
        })
        .collect();

    Ok(Table {
        columns: dedupe_names(names),
        rows,
    })
}

/// Locates and parses the table in an event payload, logging the reason on
/// failure.
#[must_use]
pub fn extract_table(payload: &Value) -> Option<Table> {
    let html = match locate_table_html(payload) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "no HTML table in event payload");
            return None;
        }
    };

    tracing::debug!(len = html.len(), "parsing HTML table");
    match parse_table(html) {
        Ok(table) => {
            tracing::debug!(
                columns = table.columns.len(),
                rows = table.rows.len(),
                "parsed HTML table"
            );
            Some(table)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to parse HTML table");
            None
        }
    }
}

/// Splits the table's own rows into header and body rows. Rows of nested
/// tables are not visited; `<tfoot>` rows follow the body.
fn collect_rows(table: ElementRef<'_>) -> (Vec<Vec<RawCell>>, Vec<Vec<RawCell>>) {
    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();

    for section in child_elements(table) {
        match section.value().name() {
            "thead" => head.extend(child_rows(section)),
            "tbody" => body.extend(child_rows(section)),
            "tfoot" => foot.extend(child_rows(section)),
            _ => {}
        }
    }

    body.extend(foot);
    (head, body)
}

fn child_elements(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

fn child_rows(section: ElementRef<'_>) -> impl Iterator<Item = Vec<RawCell>> + '_ {
    child_elements(section)
        .filter(|e| e.value().name() == "tr")
        .map(row_cells)
}

fn row_cells(row: ElementRef<'_>) -> Vec<RawCell> {
    let mut cells = Vec::new();
    for cell in child_elements(row) {
        let is_header = match cell.value().name() {
            "th" => true,
            "td" => false,
            _ => continue,
        };
        let text = normalize_text(cell.text());
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        for _ in 0..span {
            cells.push(RawCell {
                is_header,
                text: text.clone(),
            });
        }
    }
    cells
}

/// Collapses runs of whitespace to single spaces; `None` when nothing is
/// left.
fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> Option<String> {
    let joined = parts.collect::<Vec<_>>().join(" ");
    let normalized = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    (!normalized.is_empty()).then_some(normalized)
}

/// Suffixes repeated names with `.1`, `.2`, ... in order of appearance,
/// extending the suffix until the name is not already taken.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|mut name| {
            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            name
        })
        .collect()
}

fn column_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    let mut any = false;
    for v in values {
        any = true;
        if !NUMERIC_RE.is_match(v) {
            return ColumnKind::Text;
        }
        if v.contains('.') {
            kind = ColumnKind::Float;
        } else if kind == ColumnKind::Integer && strip_grouping(v).parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
    }
    if any {
        kind
    } else {
        ColumnKind::Text
    }
}

fn strip_grouping(v: &str) -> String {
    v.replace(',', "")
}

fn cell_value(cell: Option<&str>, kind: ColumnKind) -> Value {
    let Some(text) = cell else {
        return Value::Null;
    };
    match kind {
        ColumnKind::Text => Value::String(text.to_owned()),
        ColumnKind::Integer => strip_grouping(text)
            .parse::<i64>()
            .map_or_else(|_| Value::String(text.to_owned()), Value::from),
        ColumnKind::Float => strip_grouping(text)
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.to_owned()), Value::Number),
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
