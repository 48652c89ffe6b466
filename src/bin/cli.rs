//! Bookstock CLI
//!
//! Command-line front end for the bookstore inventory backend.

use std::path::PathBuf;

use bookstock::{
    api::RestApi,
    config::{self, Config},
    error::{AppError, Result},
    models::{Book, BookDraft},
    query::{self, Filters, PriceFilter, SortConfig, SortDirection, SortField, StockFilter},
    storage,
    store::{BookStore, ImportOutcome},
};
use clap::{Parser, Subcommand};

/// Bookstock - Bookstore Inventory Manager
#[derive(Parser, Debug)]
#[command(name = "bookstock", version, about = "Bookstore inventory manager")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "bookstock.toml")]
    config: PathBuf,

    /// Backend profile (falls back to BOOKSTOCK_PROFILE, then "development")
    #[arg(long)]
    profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List books, optionally filtered and sorted
    List {
        /// Case-insensitive search over title and author
        #[arg(short, long)]
        search: Option<String>,

        /// Stock level: in-stock, low-stock or out-of-stock
        #[arg(long)]
        stock: Option<StockFilter>,

        /// Price range: under-10, 10-to-50 or over-50
        #[arg(long)]
        price_range: Option<PriceFilter>,

        /// Show a single author's shelf
        #[arg(long)]
        author: Option<String>,

        /// Sort key: title, author, price, qty or id
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,
    },

    /// Show a single book by id
    Show { id: u64 },

    /// Add a book
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        qty: u32,
    },

    /// Edit a book, keeping unspecified fields
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        qty: Option<u32>,
    },

    /// Delete a book by id
    Rm { id: u64 },

    /// Import books from a TOML seed or JSON snapshot
    Import {
        /// `[[books]]` TOML seed, or a previously exported .json snapshot
        file: PathBuf,
    },

    /// Export the collection to a JSON snapshot
    Export { file: PathBuf },

    /// Validate configuration (and optionally a seed file)
    Validate {
        /// Seed file to check without touching the backend
        file: Option<PathBuf>,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn connect(config: &Config, profile: &str) -> Result<BookStore<RestApi>> {
    let api = RestApi::from_config(config, profile)?;
    Ok(BookStore::new(api))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Bookstock starting...");

    let config = Config::load_or_default(&cli.config);
    let profile = config::active_profile(cli.profile.as_deref());
    log::info!("Using profile '{}'", profile);

    match cli.command {
        Command::List {
            search,
            stock,
            price_range,
            author,
            sort,
            desc,
        } => {
            let store = connect(&config, &profile)?;
            let total = store.list().await?.len();

            let filters = Filters {
                search: search.unwrap_or_default(),
                stock: stock.unwrap_or_default(),
                price: price_range.unwrap_or_default(),
                author: author.unwrap_or_default(),
            };
            let sort = SortConfig {
                field: sort.unwrap_or_default(),
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            };

            let shown = query::apply(&store.books(), &filters, &sort);
            print_table(&shown);
            println!("Showing {} of {} books", shown.len(), total);
        }

        Command::Show { id } => {
            let store = connect(&config, &profile)?;
            let book = store.read_one(id).await?;
            print_book(&book);
        }

        Command::Add {
            title,
            author,
            price,
            qty,
        } => {
            let store = connect(&config, &profile)?;
            let draft = BookDraft {
                title,
                author,
                price,
                qty,
            };
            let book = store.create(&draft).await?;
            log::info!("Added book #{}: {}", book.id, book.title);
        }

        Command::Edit {
            id,
            title,
            author,
            price,
            qty,
        } => {
            let store = connect(&config, &profile)?;
            let mut draft = store.read_one(id).await?.to_draft();
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(author) = author {
                draft.author = author;
            }
            if let Some(price) = price {
                draft.price = price;
            }
            if let Some(qty) = qty {
                draft.qty = qty;
            }

            let book = store.update(id, &draft).await?;
            log::info!("Updated book #{}", book.id);
            print_book(&book);
        }

        Command::Rm { id } => {
            let store = connect(&config, &profile)?;
            store.delete(id).await?;
            log::info!("Deleted book #{}", id);
        }

        Command::Import { file } => {
            let store = connect(&config, &profile)?;
            let drafts = storage::read_drafts(&file).await?;
            log::info!("Importing {} drafts from {}", drafts.len(), file.display());

            let outcome = store.import(&drafts, &config.import).await;
            report_import(&outcome);
        }

        Command::Export { file } => {
            let store = connect(&config, &profile)?;
            store.list().await?;
            storage::write_snapshot(&file, &store.books()).await?;
        }

        Command::Validate { file } => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} profiles)", config.profiles.len());
            log::info!("Profile '{}' -> {}", profile, config.base_url(&profile)?);

            if let Some(file) = file {
                let drafts = storage::read_drafts(&file).await?;
                let mut invalid = 0;
                for (i, draft) in drafts.iter().enumerate() {
                    if let Err(errors) = draft.validate() {
                        invalid += 1;
                        log::error!("Draft #{} '{}': {}", i + 1, draft.title, errors);
                    }
                }
                if invalid > 0 {
                    return Err(AppError::validation(format!(
                        "{invalid} of {} drafts are invalid",
                        drafts.len()
                    )));
                }
                log::info!("✓ {} drafts OK", drafts.len());
            }

            log::info!("All validations passed!");
        }
    }

    log::info!("Done!");

    Ok(())
}

fn print_table(books: &[Book]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }

    println!(
        "{:>4}  {:<32} {:<24} {:>9} {:>5}  {}",
        "ID", "TITLE", "AUTHOR", "PRICE", "QTY", "STATUS"
    );
    for book in books {
        println!(
            "{:>4}  {:<32} {:<24} {:>9.2} {:>5}  {}",
            book.id,
            truncate(&book.title, 32),
            truncate(&book.author, 24),
            book.price,
            book.qty,
            stock_label(book.qty),
        );
    }
}

fn print_book(book: &Book) {
    println!("ID:     {}", book.id);
    println!("Title:  {}", book.title);
    println!("Author: {}", book.author);
    println!("Price:  {:.2}", book.price);
    println!("Qty:    {} ({})", book.qty, stock_label(book.qty));
}

fn report_import(outcome: &ImportOutcome) {
    println!(
        "Imported {} books, {} failures",
        outcome.added.len(),
        outcome.failures.len()
    );
    for failure in &outcome.failures {
        println!("  {}: {}", failure.title, failure.reason);
    }
}

fn stock_label(qty: u32) -> &'static str {
    match qty {
        0 => "Out of Stock",
        1..=9 => "Low Stock",
        _ => "In Stock",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
