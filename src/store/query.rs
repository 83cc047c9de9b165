use anyhow::{bail, Result};

use super::backend::Store;

/// Output format for CLI query results.
#[derive(Debug, Clone, Copy)]
pub enum QueryFormat {
    Table,
    Json,
    Csv,
}

impl QueryFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => QueryFormat::Json,
            "csv" => QueryFormat::Csv,
            _ => QueryFormat::Table,
        }
    }
}

/// Execute a read-only query and format the results.
pub async fn execute_query(store: &dyn Store, sql: &str, format: QueryFormat) -> Result<String> {
    // Basic safety: only allow SELECT queries
    let trimmed = sql.trim().to_uppercase();
    if !trimmed.starts_with("SELECT") {
        bail!("Only SELECT queries are allowed. Mutations go through the API.");
    }

    let rows = store.query_raw(sql).await?;

    if rows.is_empty() {
        return Ok("No results.".to_string());
    }

    match format {
        QueryFormat::Table => format_table(&rows),
        QueryFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        QueryFormat::Csv => format_csv(&rows),
    }
}

fn columns_of(rows: &[serde_json::Value]) -> Vec<String> {
    rows[0]
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

fn cell(row: &serde_json::Value, col: &str) -> String {
    match row.get(col) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(v) => v.to_string(),
    }
}

fn format_table(rows: &[serde_json::Value]) -> Result<String> {
    let columns = columns_of(rows);

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in rows {
        for (i, col) in columns.iter().enumerate() {
            widths[i] = widths[i].max(cell(row, col).len());
        }
    }

    let mut out = String::new();
    for (i, col) in columns.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", col, width = widths[i]));
    }
    out.push('\n');
    for (i, _) in columns.iter().enumerate() {
        out.push_str(&"-".repeat(widths[i]));
        out.push_str("  ");
    }
    out.push('\n');
    for row in rows {
        for (i, col) in columns.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell(row, col), width = widths[i]));
        }
        out.push('\n');
    }
    Ok(out)
}

fn format_csv(rows: &[serde_json::Value]) -> Result<String> {
    let columns = columns_of(rows);

    let mut out = columns.join(",");
    out.push('\n');
    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .map(|col| {
                let v = cell(row, col);
                if v.contains(',') || v.contains('"') {
                    format!("\"{}\"", v.replace('"', "\"\""))
                } else {
                    v
                }
            })
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    Ok(out)
}
