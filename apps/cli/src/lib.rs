//! # Nethra CLI Library
//!
//! Everything behind the `nethra` binary: argument definitions, state,
//! commands and output. `main.rs` only parses, loads config and calls [`run`].
//!
//! ## Module Organization
//! ```text
//! nethra_cli/
//! ├── lib.rs          ◄─── You are here (tracing setup, dispatch, run)
//! ├── cli.rs          ◄─── clap definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── AppConfig (TOML + env + flags)
//! │   └── toast.rs    ◄─── ToastChannel (broadcast → stderr)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Item master
//! │   ├── bill.rs     ◄─── Create bill
//! │   ├── history.rs  ◄─── Bill history / details / edit
//! │   └── pdf.rs      ◄─── PDF generate / download / share / print
//! ├── output.rs       ◄─── stdout rendering
//! └── error.rs        ◄─── CommandError, ConfigError
//! ```
//!
//! ## Run Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Start the stderr toast renderer                                     │
//! │  2. Dispatch the subcommand (stdout gets the result)                    │
//! │  3. Failure? ──► one error toast with the command's message             │
//! │  4. Close the toast channel and wait for the renderer to drain          │
//! │  5. Wait for scheduled temp-PDF removals (share 5 s, print 3 s)         │
//! │  6. Exit code from the error category                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use nethra_api::{ApiClient, CleanupQueue};
use nethra_core::{NewProduct, Product};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{BillAction, BillsAction, Command, ConfigAction, ItemsAction};
use commands::bill::NewBill;
use commands::history::BillEdits;
use commands::pdf::PdfActions;
use commands::product::ProductChanges;
use error::{CommandError, CommandResult, ErrorCode};
use state::{AppConfig, ToastChannel};

/// Initializes the tracing subscriber. Logs go to stderr.
///
/// ## Log Levels
/// - default: warnings only
/// - `-v`: `nethra*` crates at info (request timings)
/// - `-vv`: `nethra*` crates at debug
/// - `RUST_LOG` overrides all of the above
pub fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "warn,nethra=info",
        _ => "warn,nethra=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one parsed command line against a loaded configuration.
pub async fn run(command: Command, config_path: Option<PathBuf>, config: AppConfig) -> ExitCode {
    let toasts = ToastChannel::new();
    let renderer = state::spawn_stderr_renderer(toasts.subscribe());
    let mut cleanup = CleanupQueue::new();

    let result = dispatch(command, config_path, &config, &toasts, &mut cleanup).await;
    if let Err(e) = &result {
        toasts.error(e.message.clone());
    }

    drop(toasts);
    let _ = renderer.await;

    if cleanup.pending() > 0 {
        debug!(pending = cleanup.pending(), "Waiting for temp PDF cleanup");
        cleanup.wait().await;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => e.exit_code(),
    }
}

fn connect(config: &AppConfig) -> CommandResult<ApiClient> {
    ApiClient::new(config.client_config())
        .map_err(|e| CommandError::new(ErrorCode::Config, e.to_string()))
}

async fn dispatch(
    command: Command,
    config_path: Option<PathBuf>,
    config: &AppConfig,
    toasts: &ToastChannel,
    cleanup: &mut CleanupQueue,
) -> CommandResult<()> {
    match command {
        Command::Items { action } => items(action, &connect(config)?, config, toasts).await,
        Command::Bill {
            action: BillAction::Create(args),
        } => {
            let client = connect(config)?;
            let request = NewBill {
                buyer: nethra_core::Buyer {
                    name: args.buyer,
                    phone: args.phone,
                    address: args.address,
                },
                lines: args.items,
                invoice_number: args.invoice_number,
                invoice_date: args.date,
            };
            let now = chrono::Local::now();
            let receipt = commands::bill::create_bill(
                &client,
                toasts,
                request,
                now.date_naive(),
                now.timestamp_millis(),
            )
            .await?;
            print!("{}", output::created_bill(&receipt, config));
            Ok(())
        }
        Command::Bills { action } => bills(action, &connect(config)?, config, toasts).await,
        Command::Pdf(args) => {
            let client = connect(config)?;
            let actions = PdfActions {
                download: args.download,
                open: args.open,
                share: args.share,
                print: args.print,
            };
            let report =
                commands::pdf::run_pdf(&client, toasts, &config.pdf, cleanup, args.id, actions)
                    .await?;
            print!("{}", output::pdf_report(&report));
            Ok(())
        }
        Command::Config { action } => config_command(action, config_path, config),
    }
}

async fn items(
    action: ItemsAction,
    client: &ApiClient,
    config: &AppConfig,
    toasts: &ToastChannel,
) -> CommandResult<()> {
    let products = match action {
        ItemsAction::List => commands::product::list_products(client).await?,
        ItemsAction::Search { query } => {
            commands::product::search_products(client, &query).await?
        }
        ItemsAction::Add {
            name,
            english,
            weight,
            price,
        } => {
            let product = NewProduct {
                name,
                name_english: english,
                weight,
                price,
            };
            commands::product::add_product(client, toasts, product).await?
        }
        ItemsAction::Update {
            id,
            name,
            english,
            weight,
            price,
        } => {
            let changes = ProductChanges {
                name,
                name_english: english,
                weight,
                price,
            };
            commands::product::update_product(client, toasts, id, changes).await?
        }
        ItemsAction::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete product {}?", id)) {
                return Err(CommandError::cancelled());
            }
            commands::product::delete_product(client, toasts, id).await?
        }
    };

    let rows: Vec<&Product> = products.iter().collect();
    print!("{}", output::product_table(&rows, config));
    Ok(())
}

async fn bills(
    action: BillsAction,
    client: &ApiClient,
    config: &AppConfig,
    toasts: &ToastChannel,
) -> CommandResult<()> {
    match action {
        BillsAction::List => {
            let bills = commands::history::list_bills(client).await?;
            print!("{}", output::bill_list(&bills, config));
        }
        BillsAction::Show { id } => {
            let bill = commands::history::show_bill(client, id).await?;
            print!("{}", output::bill_details(&bill, config));
        }
        BillsAction::Edit(args) => {
            let edits = BillEdits {
                buyer_name: args.buyer,
                phone: args.phone,
                address: args.address,
                invoice_number: args.invoice_number,
                invoice_date: args.date,
                quantities: args.quantities,
                prices: args.prices,
                remove: args.remove,
                add: args.add,
            };
            let bill = commands::history::edit_bill(client, toasts, args.id, edits).await?;
            print!("{}", output::bill_details(&bill, config));
        }
    }
    Ok(())
}

fn config_command(
    action: ConfigAction,
    config_path: Option<PathBuf>,
    config: &AppConfig,
) -> CommandResult<()> {
    match action {
        ConfigAction::Show => print!("{}", config.to_toml()?),
        ConfigAction::Path => {
            let path = config_path
                .or_else(AppConfig::default_config_path)
                .ok_or(error::ConfigError::NoConfigPath)?;
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let file_layer = AppConfig::load_file(config_path.clone())?;
            let path = config.for_saving(&file_layer).save(config_path)?;
            info!(?path, "Config written");
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    eprint!("{} [y/N]: ", prompt);
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")
}
