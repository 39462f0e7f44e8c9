use clap::Parser;

use reservarr::cli::{Cli, Commands};
use reservarr::{Config, run};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load()?;
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(async move {
        match cli.command {
            None | Some(Commands::Serve) => {
                reservarr::init_tracing(&config);
                run(config).await
            }
            Some(Commands::AddUser {
                name,
                email,
                password,
                phone,
                role,
            }) => {
                reservarr::cli::commands::cmd_add_user(&config, name, email, password, phone, role)
                    .await
            }
            Some(Commands::ListTables {
                available,
                min_seats,
            }) => reservarr::cli::commands::cmd_list_tables(&config, available, min_seats).await,
            Some(Commands::ListBookings { date, upcoming }) => {
                reservarr::cli::commands::cmd_list_bookings(&config, date, upcoming).await
            }
        }
    })
}
