//! List-bookings command handler

use chrono::NaiveDate;

use crate::config::Config;
use crate::constants::limits::DEFAULT_UPCOMING_LIMIT;
use crate::db::{BookingListFilter, Store};

pub async fn cmd_list_bookings(
    config: &Config,
    date: Option<String>,
    upcoming: bool,
) -> anyhow::Result<()> {
    let date = date
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| anyhow::anyhow!("Invalid date '{}', expected YYYY-MM-DD", raw))
        })
        .transpose()?;

    let store = Store::new(&config.general.database_path).await?;

    let bookings = if upcoming {
        store
            .upcoming_bookings(None, Some(DEFAULT_UPCOMING_LIMIT))
            .await?
    } else {
        store
            .list_bookings(BookingListFilter {
                booking_date: date,
                ..Default::default()
            })
            .await?
    };

    if bookings.is_empty() {
        println!("No bookings found.");
        return Ok(());
    }

    println!("Bookings ({} total)", bookings.len());
    println!("{:-<60}", "");

    for booking in bookings {
        println!(
            "#{:<4} {} {} | table {} | user {} | {}",
            booking.id,
            booking.booking_date,
            booking.booking_time.format("%H:%M"),
            booking.table_id,
            booking.user_id,
            booking.status
        );
    }

    Ok(())
}
