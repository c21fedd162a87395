// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tabular query results.
//!
//! Cells cross the provider/engine boundary as raw JSON so that source types
//! survive: strings stay quoted, numbers keep their textual form, and SQL
//! NULL is the literal `null`. Renderers decode each cell on demand.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;

/// Prefix of columns that sort ahead of all others in JSON-lines results.
const TIME_COLUMN_PREFIX: &str = "time";

/// One cell of a query result, held as raw JSON text.
#[derive(Clone)]
pub struct Cell(Box<RawValue>);

impl Cell {
    /// The JSON `null` cell.
    pub fn null() -> Self {
        Self(RawValue::NULL.to_owned())
    }

    /// Encode a JSON value as a cell.
    pub fn from_value(value: &serde_json::Value) -> Self {
        serde_json::value::to_raw_value(value).map(Self).unwrap_or_else(|_| Self::null())
    }

    /// Raw JSON text of the cell.
    pub fn raw(&self) -> &str {
        self.0.get()
    }

    pub fn is_null(&self) -> bool {
        self.raw() == "null"
    }

    /// Decode the cell into a JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::from_str(self.raw()).unwrap_or(serde_json::Value::Null)
    }

    /// Text shown in rendered tables: strings unquoted, anything else verbatim.
    pub fn display_text(&self) -> String {
        match serde_json::from_str::<serde_json::Value>(self.raw()) {
            Ok(serde_json::Value::String(s)) => s,
            _ => self.raw().to_string(),
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

impl From<serde_json::Value> for Cell {
    fn from(value: serde_json::Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::from_value(&serde_json::Value::String(value.to_string()))
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

// Decoding goes through `serde_json::Value` so cells can be read back from
// any deserializer, not only from JSON text.
impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// A statement parameter: either positional or bound to a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    Named { name: String, value: serde_json::Value },
    Positional(serde_json::Value),
}

/// The outcome of one successful query run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResult {
    pub name: String,
    /// Statement text as sent to the data source
    #[serde(default)]
    pub statement: String,
    #[serde(default)]
    pub params: Vec<QueryParam>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl QueryResult {
    pub fn new(
        name: impl Into<String>,
        statement: impl Into<String>,
        params: Vec<QueryParam>,
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        Self { name: name.into(), statement: statement.into(), params, columns, rows }
    }

    /// Build a result by walking a SQL-style row iterator.
    ///
    /// Each row yields one optional JSON value per column; `None` (SQL NULL)
    /// becomes the JSON `null` cell. The first row error aborts the walk.
    pub fn from_sql_rows<I, E>(
        name: impl Into<String>,
        statement: impl Into<String>,
        params: Vec<QueryParam>,
        columns: Vec<String>,
        rows: I,
    ) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<Vec<Option<serde_json::Value>>, E>>,
    {
        let mut out = Vec::new();
        for row in rows {
            let row = row?;
            let mut cells: Vec<Cell> = row
                .iter()
                .map(|v| v.as_ref().map(Cell::from_value).unwrap_or_else(Cell::null))
                .collect();
            cells.resize_with(columns.len(), Cell::null);
            out.push(cells);
        }
        Ok(Self::new(name, statement, params, columns, out))
    }

    /// Build a result from JSON-lines records.
    ///
    /// Columns are the union of keys across all lines in first-appearance
    /// order, except that columns whose name begins with `time` are moved
    /// ahead of the rest (stable within each group). Missing keys are `null`.
    pub fn from_jsonlines(
        name: impl Into<String>,
        statement: impl Into<String>,
        params: Vec<QueryParam>,
        lines: &[serde_json::Map<String, serde_json::Value>],
    ) -> Self {
        let mut seen = std::collections::HashSet::new();
        let mut columns = Vec::new();
        for line in lines {
            for key in line.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        let (mut ordered, rest): (Vec<String>, Vec<String>) =
            columns.into_iter().partition(|c| c.starts_with(TIME_COLUMN_PREFIX));
        ordered.extend(rest);

        let rows = lines
            .iter()
            .map(|line| {
                ordered
                    .iter()
                    .map(|c| line.get(c).map(Cell::from_value).unwrap_or_else(Cell::null))
                    .collect()
            })
            .collect();
        Self::new(name, statement, params, ordered, rows)
    }

    /// Parse newline-delimited JSON objects and build a result from them.
    ///
    /// Blank lines are skipped; any non-object line is an error.
    pub fn parse_jsonlines(
        name: impl Into<String>,
        statement: impl Into<String>,
        params: Vec<QueryParam>,
        text: &str,
    ) -> Result<Self, serde_json::Error> {
        let lines = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(serde_json::from_str::<serde_json::Map<String, serde_json::Value>>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_jsonlines(name, statement, params, &lines))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
