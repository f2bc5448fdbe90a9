// output formatting - pretty tables or raw json

use crate::core::{ColumnInfo, QueryResult, Summary};

pub struct Output;

impl Output {
    // nice table format for humans
    pub fn pretty(sql: &str, result: &QueryResult) {
        println!("sql: {sql}\n");
        println!("rows: {}\n", result.row_count);

        if result.rows.is_empty() {
            println!("no results");
            return;
        }

        // figure out column widths
        let mut widths: Vec<usize> = result.columns.iter().map(|c| c.len()).collect();

        for row in &result.rows {
            for (i, val) in row.iter().enumerate() {
                let len = format_value(val).len();
                if len > widths[i] {
                    widths[i] = len;
                }
            }
        }

        // cap at 40 so things don't get crazy
        for w in &mut widths {
            if *w > 40 {
                *w = 40;
            }
        }

        // header
        let header: Vec<String> = result
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:width$}", c, width = widths[i]))
            .collect();
        println!("{}", header.join(" | "));

        // separator
        let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        println!("{}", sep.join("-+-"));

        // rows
        for row in &result.rows {
            let formatted: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    let s = clip(format_value(v), 40);
                    format!("{:width$}", s, width = widths[i])
                })
                .collect();
            println!("{}", formatted.join(" | "));
        }
    }

    // raw json for scripts
    pub fn raw(result: &QueryResult) {
        println!("{}", serde_json::to_string(result).unwrap_or_default());
    }

    pub fn summary(summary: &Summary) {
        println!("transactions: {}", summary.total_transactions);
        println!("credits:      {:.2}", summary.total_credits);
        println!("debits:       {:.2}", summary.total_debits);
        println!("earliest:     {}", summary.earliest_date.as_deref().unwrap_or("-"));
        println!("latest:       {}", summary.latest_date.as_deref().unwrap_or("-"));
    }

    pub fn schema(columns: &[ColumnInfo]) {
        let mut current_table = "";
        for col in columns {
            if col.table != current_table {
                if !current_table.is_empty() {
                    println!();
                }
                println!("TABLE {}", col.table);
                current_table = col.table.as_str();
            }
            println!("  {} {}", col.column, col.data_type);
        }
    }
}

// shorten long cells, counting chars so we never slice into a
// multibyte character
fn clip(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        return s;
    }
    let head: String = s.chars().take(max - 3).collect();
    format!("{head}...")
}

fn format_value(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => val.to_string(),
    }
}
