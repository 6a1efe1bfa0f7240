use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use shelfsync::api::{BookApi, HttpBookApi};
use shelfsync::catalog::Catalog;
use shelfsync::config;
use shelfsync::model::{Book, BookPatch, BookQuery, NewBook};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the collection and print one page of it
    List {
        /// Case-insensitive title/author filter
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Override the configured page size
        #[arg(long)]
        page_size: Option<usize>,
        /// Author hint forwarded to the server (may be ignored there)
        #[arg(long)]
        author: Option<String>,
        /// Year hint forwarded to the server (may be ignored there)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Fetch and print a single book
    Show { id: i64 },
    /// Create a book
    Add {
        title: String,
        author: String,
        isbn: String,
        year: i32,
    },
    /// Update fields of a book
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        isbn: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Delete a book
    Remove { id: i64 },
}

fn print_book(book: &Book) {
    let availability = if book.is_available { "available" } else { "out" };
    println!(
        "#{:<5} {:<40} {:<25} {:<15} {} [{}]",
        book.id, book.title, book.author, book.isbn, book.year, availability
    );
}

async fn fail_with_stored_error(catalog: &Catalog) -> Result<()> {
    match catalog.error().await {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;

    let base_url = Url::parse(&cfg.server.base_url)?;
    let api = Arc::new(HttpBookApi::with_base_url(
        base_url,
        Duration::from_secs(cfg.server.timeout_seconds),
    ));
    let catalog = Catalog::new(api.clone(), cfg.view.page_size);

    match args.command {
        Command::List {
            search,
            page,
            page_size,
            author,
            year,
        } => {
            let hint = if author.is_some() || year.is_some() {
                Some(BookQuery {
                    author,
                    year,
                    is_available: None,
                })
            } else {
                None
            };
            catalog.fetch_books(hint).await;
            fail_with_stored_error(&catalog).await?;

            if let Some(size) = page_size {
                catalog.handle_page_size_change(size).await;
            }
            if !search.is_empty() {
                catalog.handle_search(search).await;
            }
            catalog.handle_page_change(page).await;

            for book in catalog.books().await {
                print_book(&book);
            }
            let info = catalog.pagination().await;
            println!(
                "page {}/{} ({} books, {} per page)",
                info.page, info.total_pages, info.total_count, info.page_size
            );
        }
        Command::Show { id } => {
            let book = api.fetch_one(id).await?;
            print_book(&book);
        }
        Command::Add {
            title,
            author,
            isbn,
            year,
        } => {
            let created = catalog
                .create_book(NewBook {
                    title,
                    author,
                    isbn,
                    year,
                })
                .await;
            if !created {
                fail_with_stored_error(&catalog).await?;
            }
            println!("created");
        }
        Command::Update {
            id,
            title,
            author,
            isbn,
            year,
            available,
        } => {
            let patch = BookPatch {
                title,
                author,
                isbn,
                year,
                is_available: available,
            };
            if patch == BookPatch::default() {
                bail!("nothing to update: pass at least one field flag");
            }
            if !catalog.update_book(id, patch).await {
                fail_with_stored_error(&catalog).await?;
            }
            println!("updated #{id}");
        }
        Command::Remove { id } => {
            if !catalog.delete_book(id).await {
                fail_with_stored_error(&catalog).await?;
            }
            println!("removed #{id}");
        }
    }

    Ok(())
}
