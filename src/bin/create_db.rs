use std::{error::Error, path::Path, process::exit};

use clap::Parser;

use ledgerly::{Application, RepositoryConfig, SqliteRepository, setup_logging};

/// A utility for creating a new ledgerly database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Add a few example categories and transactions.
    #[arg(long)]
    seed: bool,

    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(args.log_file.as_deref().map(Path::new))?;

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let repository = SqliteRepository::new(RepositoryConfig::new(output_path, &args.timezone))?;
    let app = Application::new(repository);

    if args.seed {
        seed(&app)?;
    }

    println!("Success!");

    Ok(())
}

fn seed(app: &Application<SqliteRepository>) -> Result<(), ledgerly::Error> {
    println!("Adding example data...");

    app.create_category("groceries", 600.0, None)?;
    app.create_category("rent", 2000.0, Some("Paid fortnightly"))?;
    app.create_recurring_expense(-1000.0, "fortnightly", "rent", "Rent payment", None)?;

    let groceries =
        app.create_transaction(-100.0, "2024-11-22", "Groceries", "groceries", None, None)?;
    app.create_transaction(-200.0, "2024-11-21", "Rent payment", "rent", None, None)?;

    println!("\nAll transactions:");
    for transaction in app.list_all_transactions()? {
        println!("{transaction}");
    }

    println!("\nFind transaction:");
    match app.find_transaction(groceries.id)? {
        Some(transaction) => println!("Transaction found: {transaction}"),
        None => println!("No transaction found with ID {}", groceries.id),
    }

    Ok(())
}
