//! List-tables command handler

use crate::config::Config;
use crate::db::{Store, TableListFilter};
use crate::models::TableStatus;

pub async fn cmd_list_tables(
    config: &Config,
    available_only: bool,
    min_seats: Option<i32>,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let tables = store
        .list_tables(TableListFilter {
            status: available_only.then_some(TableStatus::Available),
            min_seats,
            max_seats: None,
            limit: None,
        })
        .await?;

    if tables.is_empty() {
        println!("No tables found.");
        println!();
        println!("Create one through the API: POST /api/tables");
        return Ok(());
    }

    println!("Tables ({} total)", tables.len());
    println!("{:-<50}", "");

    for table in tables {
        let marker = match table.status.as_str() {
            "available" => "o",
            _ => "x",
        };
        println!(
            "{} table {:>3} | {:>2} seats | {}",
            marker, table.table_number, table.seats, table.status
        );
    }

    Ok(())
}
