//! Command-line interface for Reservarr
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// Reservarr - Restaurant Table Reservation Manager
#[derive(Parser)]
#[command(name = "reservarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (the default when no command is given)
    Serve,

    /// Create a user account
    #[command(alias = "au")]
    AddUser {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        phone: Option<String>,

        /// One of client, admin, manager
        #[arg(long)]
        role: Option<String>,
    },

    /// List tables with their status and seat counts
    #[command(alias = "lt")]
    ListTables {
        /// Only tables with administrative status `available`
        #[arg(long)]
        available: bool,

        #[arg(long)]
        min_seats: Option<i32>,
    },

    /// List bookings
    #[command(alias = "lb")]
    ListBookings {
        /// Filter by booking date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Only active bookings from today onward
        #[arg(long)]
        upcoming: bool,
    },
}
