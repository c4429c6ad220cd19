use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;

use ledgerly::{Application, RepositoryConfig, SqliteRepository, ValidatedPassword, setup_logging};

/// A utility for registering a user in an existing ledgerly database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The name the new user logs in with.
    #[arg(long, short)]
    username: String,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(None)?;

    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }

    let repository = SqliteRepository::new(RepositoryConfig::new(db_path, &args.timezone))?;
    let app = Application::new(repository);

    println!("Creating user {}", args.username);

    let Some(password) = get_new_password() else {
        return Ok(());
    };

    let user = app.create_user(&args.username, &password)?;
    println!("User {} created with ID {}!", user.username, user.id);

    Ok(())
}

fn get_new_password() -> Option<String> {
    loop {
        println!();

        let first_password = match rpassword::prompt_password("Enter a password: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if let Err(error) = ValidatedPassword::new(&first_password) {
            print_error(error);
            continue;
        }

        let second_password = match rpassword::prompt_password("Enter the same password again: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read password from stdin: {error}"));
                return None;
            }
        };

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        return Some(first_password);
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
