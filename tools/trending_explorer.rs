use reelfind::config::load_config;
use reelfind::trending::sqlite::TRENDING_TABLE;
use rusqlite::{types::ValueRef, Connection, Result};
use std::env;
use std::fs;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let limit: usize = match args.first() {
        Some(a) if !a.starts_with("--") => a.parse().unwrap_or(10),
        _ => 10,
    };

    let out_file: Option<String> = args
        .iter()
        .position(|a| a == "--out")
        .and_then(|i| args.get(i + 1).cloned());

    let db_path = load_config().trending_db_path();
    println!("Opening trending DB: {}", db_path.display());

    let conn = Connection::open(&db_path)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT search_term, hit_count, movie_id, poster_url, updated_at
         FROM {TRENDING_TABLE}
         ORDER BY hit_count DESC, created_at ASC
         LIMIT ?1"
    ))?;

    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    let width = column_names.len();

    let rows = stmt.query_map([limit as i64], |row| {
        let mut values: Vec<String> = Vec::with_capacity(width);
        for i in 0..width {
            let value = match row.get_ref(i)? {
                ValueRef::Null => "NULL".to_string(),
                ValueRef::Integer(n) => n.to_string(),
                ValueRef::Real(f) => f.to_string(),
                ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).to_string(),
                ValueRef::Blob(_) => "<BLOB>".to_string(),
            };
            values.push(value);
        }
        Ok(values)
    })?;

    let mut output = String::new();
    output.push_str(&format!("--- Table: {TRENDING_TABLE} (top {limit}) ---\n"));
    output.push_str(&format!("Columns: {column_names:?}\n"));
    for (rank, row) in rows.enumerate() {
        output.push_str(&format!("{:>3}. {:?}\n", rank + 1, row?));
    }

    match out_file {
        Some(path) => match fs::write(&path, output.as_bytes()) {
            Ok(()) => println!("Exported results to {path}"),
            Err(e) => {
                eprintln!("Failed to write {path}: {e}");
                std::process::exit(1);
            }
        },
        None => print!("{output}"),
    }

    Ok(())
}
