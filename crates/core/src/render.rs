// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text renderings of a [`QueryResult`].

use crate::result::QueryResult;
use comfy_table::presets;

impl QueryResult {
    /// ASCII table with borders.
    pub fn to_table(&self) -> String {
        self.comfy(presets::ASCII_FULL)
    }

    /// GitHub-flavoured markdown table.
    pub fn to_markdown_table(&self) -> String {
        self.comfy(presets::ASCII_MARKDOWN)
    }

    /// Space-aligned columns with no borders.
    pub fn to_borderless_table(&self) -> String {
        self.comfy(presets::NOTHING)
    }

    /// One block per row, `column: value` per line, in the style of a
    /// `\G`-terminated MySQL query.
    pub fn to_vertical(&self) -> String {
        let width = self.columns.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            out.push_str(&format!(
                "{stars} {n}. row {stars}\n",
                stars = "*".repeat(27),
                n = i + 1
            ));
            for (column, cell) in self.columns.iter().zip(row) {
                out.push_str(&format!("{:>width$}: {}\n", column, cell.display_text()));
            }
        }
        out
    }

    /// One JSON object per row, keys in column order, cells verbatim.
    pub fn to_jsonlines(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push('{');
            for (i, (column, cell)) in self.columns.iter().zip(row).enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let key = serde_json::Value::String(column.clone()).to_string();
                out.push_str(&key);
                out.push(':');
                out.push_str(cell.raw());
            }
            out.push_str("}\n");
        }
        out
    }

    /// Tab-separated header line followed by tab-separated rows.
    pub fn to_plain(&self) -> String {
        let mut out = self.columns.join("\t");
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.display_text()).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    fn comfy(&self, preset: &str) -> String {
        let mut table = comfy_table::Table::new();
        table.load_preset(preset);
        table.set_header(self.columns.iter().map(String::as_str));
        for row in &self.rows {
            table.add_row(row.iter().map(|c| c.display_text()));
        }
        table.to_string()
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
