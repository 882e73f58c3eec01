//! SACM Tariff CLI
//!
//! Computes SACM music-licensing fees for venues and one-off events using
//! the configured tariff schedule.
//!
//! ```sh
//! # Quote a bar with live music and cover charge (~/.config/sacm-tariff/config.toml)
//! sacm-quote quote --name "La Cantina" --type bar --tables 30 --music vivo --cover
//!
//! # Quote from a JSON form submission, print JSON
//! sacm-quote --json quote --input solicitud.json
//!
//! # Event fees
//! sacm-quote event ticketed --gross 250000
//! sacm-quote event open --capacity 350
//!
//! # Dump the active schedule, validate the config
//! sacm-quote schedule > sacm-2017.toml
//! sacm-quote --config /etc/sacm-tariff/config.toml check
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};

use sacm_tariff::config::AppConfig;
use sacm_tariff::{init_tracing, Quote, QuoteRequest, QuoteService, TariffResult, TicketedEventFee};

/// SACM music-licensing fee calculator for Mexican venues.
#[derive(Parser, Debug)]
#[command(
    name = "sacm-quote",
    version,
    about = "SACM music-licensing tariff calculator",
    long_about = "Computes SACM 2017 music-licensing fees for restaurants, bars, hotels, \
                  discotecas, night clubs, water parks, karaoke and commercial venues.\n\n\
                  Default config: ~/.config/sacm-tariff/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SACM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote the license fee of an establishment.
    Quote(QuoteArgs),

    /// Fees for one-off musical events.
    Event {
        #[command(subcommand)]
        kind: EventKind,
    },

    /// Print the active tariff schedule as TOML.
    Schedule,

    /// Validate the configuration and tariff schedule, then exit.
    Check,

    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum EventKind {
    /// Event that sells tickets: a share of gross box office.
    Ticketed {
        /// Gross ticket sales in pesos.
        #[arg(long)]
        gross: Decimal,
    },
    /// Event without ticket sales: flat fee by attendance.
    Open {
        /// Expected attendance.
        #[arg(long)]
        capacity: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// JSON file holding a quote request with the form's field names.
    #[arg(short, long, conflicts_with_all = ["name", "kind"])]
    input: Option<PathBuf>,

    /// Establishment name.
    #[arg(long)]
    name: Option<String>,

    /// Establishment type (restaurante, bar, hotel, discoteca, centro_nocturno, ...).
    #[arg(long = "type")]
    kind: Option<String>,

    #[arg(long)]
    address: Option<String>,

    /// Number of tables.
    #[arg(long)]
    tables: Option<u32>,

    /// Person capacity.
    #[arg(long)]
    persons: Option<u32>,

    /// Number of rooms.
    #[arg(long)]
    rooms: Option<u32>,

    /// Number of pools.
    #[arg(long)]
    pools: Option<u32>,

    /// Hotel rating (1-5 or gran_turismo).
    #[arg(long)]
    stars: Option<String>,

    /// Hotel is in a tourist zone.
    #[arg(long)]
    tourist_zone: bool,

    /// Geographic zone (cdmx, guadalajara, monterrey, general...).
    #[arg(long)]
    zone: Option<String>,

    /// Season (alta or baja).
    #[arg(long)]
    season: Option<String>,

    /// Music type (grabada, vivo, mixta, ninguna).
    #[arg(long, default_value = "ninguna")]
    music: String,

    /// An entrance fee is charged.
    #[arg(long)]
    cover: bool,

    /// Dancing is permitted.
    #[arg(long)]
    dance: bool,
}

fn yes_no(flag: bool) -> Option<String> {
    Some(if flag { "si" } else { "no" }.to_string())
}

impl QuoteArgs {
    fn to_request(&self) -> Result<QuoteRequest, Box<dyn std::error::Error>> {
        if let Some(path) = &self.input {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
            return Ok(serde_json::from_str(&text)?);
        }

        Ok(QuoteRequest {
            nombre: self.name.clone(),
            tipo: self.kind.clone(),
            direccion: self.address.clone(),
            capacidad_mesas: self.tables,
            capacidad_personas: self.persons,
            capacidad_habitaciones: self.rooms,
            numero_albercas: self.pools,
            hotel_estrellas: self.stars.clone(),
            zona_turistica: yes_no(self.tourist_zone),
            zona_geografica: self.zone.clone(),
            temporada: self.season.clone(),
            tipo_musica: Some(self.music.clone()),
            cobra_entrada: yes_no(self.cover),
            permite_baile: yes_no(self.dance),
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(sacm_tariff::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match &load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Commands that do not need a schedule ───────────────────
    match &cli.command {
        Command::Init { force } => return init_config(&config_path, *force),
        Command::Check => {
            if let Some(e) = load_error {
                return Err(e.into());
            }
        }
        _ => {}
    }

    let schedule = config.tariff_schedule()?;
    info!(
        version = %schedule.version,
        uda_value = %schedule.uda_value,
        "Tariff schedule ready"
    );
    let service = QuoteService::new(schedule);

    match &cli.command {
        Command::Quote(args) => {
            let quote = service.quote(&args.to_request()?)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_quote(&quote);
            }
        }
        Command::Event { kind } => match kind {
            EventKind::Ticketed { gross } => {
                let fee = service.ticketed_event(*gross);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&fee)?);
                } else {
                    print_ticketed(&fee);
                }
            }
            EventKind::Open { capacity } => {
                let result = service.non_ticketed_event(*capacity);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print_result(&result);
                }
            }
        },
        Command::Schedule => {
            print!("{}", toml::to_string_pretty(service.calculator().schedule())?);
        }
        Command::Check => {
            let schedule = service.calculator().schedule();
            println!("✅ Configuration is valid");
            println!("   Config file : {}", config_path.display());
            println!("   Schedule    : {} ({})", schedule.version, schedule.year);
            println!("   UDA value   : ${}", schedule.uda_value);
            println!("   Zones       : {}", schedule.special_zones.join(", "));
            println!("   Log level   : {}", config.logging.level);
        }
        Command::Init { .. } => {}
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }
    AppConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn print_result(result: &TariffResult) {
    println!("Categoría   : {}", result.category);
    if result.section.is_empty() {
        println!("Sección     : (sin tarifa)");
    } else {
        println!("Sección     : {}", result.section);
    }
    println!(
        "Tarifa      : {} UDAs x ${} = ${} por {}",
        result.fee_udas.normalize(),
        result.uda_value,
        result.fee_currency_rounded(),
        result.billing_period.unit()
    );
    println!("Versión     : {}", result.schedule_version);
    println!("Fundamento  :");
    for line in &result.rationale {
        println!("  - {}", line);
    }
}

fn print_quote(quote: &Quote) {
    println!("Establecimiento : {}", quote.establishment);
    if let Some(address) = &quote.address {
        println!("Dirección       : {}", address);
    }
    println!();
    print_result(&quote.result);
    println!();
    println!("Total           : ${}", quote.total_currency);
}

fn print_ticketed(fee: &TicketedEventFee) {
    println!("Categoría   : {}", fee.category);
    println!("Sección     : {}", fee.section);
    println!(
        "Tarifa      : {}% de ${} = ${}",
        fee.rate_percent.normalize(),
        fee.gross_sales,
        fee.fee_currency_rounded()
    );
    println!("Versión     : {}", fee.schedule_version);
    println!("Fundamento  :");
    for line in &fee.rationale {
        println!("  - {}", line);
    }
}
