mod api;
mod config;
mod product;
mod search;
mod translit;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use api::CatalogClient;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "vitrina")]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog base URL (overrides the environment and the config file)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the catalog as TSV rows, optionally filtered by a query
    List(ListArgs),
    /// Print one product resolved by id
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Search term (matches title and description, in either alphabet)
    query: Option<String>,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Product id
    id: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let api_url = config::resolve_api_url(cli.api_url.as_deref(), &config)?;
    let client = CatalogClient::new(&api_url);

    if let Some(command) = cli.command {
        match command {
            Command::List(args) => handle_list(args, &client)?,
            Command::Show(args) => handle_show(args, &client)?,
        }
        return Ok(());
    }

    run_tui(&client, &config)
}

fn run_tui(client: &CatalogClient, config: &Config) -> Result<()> {
    let mut app = ui::app::App::new(client, config)?;
    app.run()
}

fn handle_list(args: ListArgs, client: &CatalogClient) -> Result<()> {
    let products = client.fetch_products()?;
    let query = args.query.as_deref().unwrap_or("");
    let results = search::filter_products(query, &products);

    if query.is_empty() {
        println!("{} product(s)", results.len());
    } else if results.is_empty() {
        println!("No matches for \"{}\"", query);
    } else {
        println!("Found {} product(s) matching \"{}\"", results.len(), query);
    }

    // Results: id<TAB>title<TAB>description
    for product in results {
        println!("{}\t{}\t{}", product.id, product.title, product.description);
    }

    Ok(())
}

fn handle_show(args: ShowArgs, client: &CatalogClient) -> Result<()> {
    // Identifier validation happens before any request goes out.
    let id = api::parse_product_id(Some(&args.id))?;
    let product = client.fetch_product(id)?;

    println!("id: {}", product.id);
    println!("title: {}", product.title);
    println!("description: {}", product.description);
    if let Some(details) = &product.details {
        println!("details: {}", details);
    }
    if !product.image.is_empty() {
        println!("image: {}", product.image);
    }

    Ok(())
}
