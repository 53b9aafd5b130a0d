use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{
    config::{Config, LogFormat},
    controllers::BookingTab,
    notifications::Variant,
    validation::Field,
    AppState,
};

#[derive(Parser)]
#[command(version, about = "Cinema seat booking client", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all studios
    Studios,
    /// Show the seat map of a studio
    Seats { studio_id: i64 },
    /// Log in and remember the token
    Login { email: String, password: String },
    /// Create an account and log in
    Register {
        email: String,
        password: String,
        name: String,
    },
    /// Forget the stored token
    Logout,
    /// Show who is logged in
    Whoami,
    /// Book seats online, or at the cash desk with --offline
    Book {
        studio_id: i64,
        /// Seat id, repeat for several seats
        #[arg(long = "seat", required = true)]
        seats: Vec<i64>,
        #[arg(long)]
        offline: bool,
        /// Customer name for offline booking
        #[arg(long)]
        name: Option<String>,
        /// Customer email for offline booking
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let json_logs = config.app.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .init();

    let cli = Cli::parse();
    info!("Using API at {}", config.api.base_url);

    let state = AppState::new(config).map_err(|e| anyhow::anyhow!(e))?;
    let outcome = run(&state, cli.command).await;

    // Последнее уведомление печатается как "снэкбар" командной строки
    if let Some(notification) = state.snackbar.current() {
        match notification.variant {
            Variant::Success => println!("✔ {}", notification.message),
            Variant::Error => eprintln!("✘ {}", notification.message),
        }
    }

    outcome
}

async fn run(state: &AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Studios => {
            let studios = state.studios().load().await?;
            if studios.is_empty() {
                println!("No studios");
            }
            for studio in studios {
                println!("{:>4}  {} ({} seats)", studio.id, studio.name, studio.total_seats);
            }
        }
        Commands::Seats { studio_id } => {
            let seat_map = state.seat_map(studio_id).await?;
            for seat in seat_map.seats() {
                let mark = if seat.is_available { "free" } else { "taken" };
                println!("{:>4}  {:<6} {}", seat.id, seat.seat_number, mark);
            }
        }
        Commands::Login { email, password } => {
            let name = state.auth().login(&email, &password).await?;
            println!("Hi, {}", name);
        }
        Commands::Register {
            email,
            password,
            name,
        } => {
            state.auth().register(&email, &password, &name).await?;
        }
        Commands::Logout => {
            state.auth().logout()?;
            println!("Logged out");
        }
        Commands::Whoami => match state.session.user_name() {
            Some(name) if state.session.is_authenticated() => println!("Hi, {}", name),
            _ => println!("Not logged in"),
        },
        Commands::Book {
            studio_id,
            seats,
            offline,
            name,
            email,
        } => {
            let catalog = Arc::new(state.studios());
            let results = catalog.clone();
            let seat_map = state
                .seat_map(studio_id)
                .await?
                .with_on_booked(move |result| results.set_booking_result(result.clone()));

            for seat_id in seats {
                if !seat_map.toggle(seat_id) {
                    eprintln!("Seat {} is not available, skipped", seat_id);
                }
            }
            if !seat_map.selected().is_empty() {
                println!("Selected: {}", seat_map.selected_label());
            }

            if offline {
                seat_map.set_active_tab(BookingTab::Offline);
                seat_map.handle_change(Field::Name, name.as_deref().unwrap_or_default());
                seat_map.handle_change(Field::Email, email.as_deref().unwrap_or_default());
                if !seat_map.form_is_valid() {
                    for field in [Field::Name, Field::Email] {
                        if let Some(message) = seat_map.field_error(field) {
                            eprintln!("{}: {}", field, message);
                        }
                    }
                    bail!("customer details are incomplete");
                }
                seat_map.book_offline().await?;
            } else {
                seat_map.book_online().await?;
            }

            let Some(result) = catalog.booking_result() else {
                return Ok(());
            };
            if let Some(booking) = &result.booking {
                println!("Booking code: {}", booking.booking_code);
            }
            if let Some(qr_code) = &result.qr_code {
                println!("QR code: {}", qr_code);
            }
        }
    }
    Ok(())
}
