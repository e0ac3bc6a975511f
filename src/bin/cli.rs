use clap::{Parser, Subcommand};
use std::sync::Arc;
use user_crud::{
    config::AppConfig,
    db,
    models::{NewUser, User, UserPatch},
    repositories::SqliteUserRepository,
    services::{UpdateUserRequest, UserService},
};

#[derive(Parser)]
#[command(name = "user-crud-cli")]
#[command(about = "CLI tool for managing users directly in the database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        #[arg(short, long)]
        username: String,

        /// Document number, used as the lookup key for updates
        #[arg(short, long)]
        document: String,

        #[arg(long)]
        phone_number: String,

        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long)]
        state: String,
    },

    /// List all users
    List,

    /// Show a single user by id
    Show {
        #[arg(long)]
        id: i64,
    },

    /// Find the first user with a document
    Find {
        #[arg(short, long)]
        document: String,
    },

    /// Update the user matching a document; omitted fields are left as they are
    Update {
        #[arg(short, long)]
        document: String,

        #[arg(short, long)]
        username: Option<String>,

        #[arg(long)]
        phone_number: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long)]
        state: Option<String>,
    },

    /// Delete a user by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn print_user(user: &User) {
    println!("  ID: {}", user.id);
    println!("  Username: {}", user.username);
    println!("  Document: {}", user.document);
    println!("  Phone: {}", user.phone_number);
    println!("  Email: {}", user.email);
    println!("  State: {}", user.state);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let config = AppConfig::from_env()?;
    let pool = db::create_pool(&config).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Initialize services
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository);

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                username,
                document,
                phone_number,
                email,
                password,
                state,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => get_password("Password")?,
                };

                let new_user = NewUser {
                    username,
                    document,
                    phone_number,
                    email,
                    password,
                    state,
                };

                match user_service.create_user(new_user).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        print_user(&user);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List => match user_service.list_users().await {
                Ok(users) => {
                    if users.is_empty() {
                        println!("No users found.");
                    } else {
                        println!(
                            "{:<5} {:<20} {:<15} {:<30} {:<10}",
                            "ID", "Username", "Document", "Email", "State"
                        );
                        println!("{}", "-".repeat(84));
                        for user in users {
                            println!(
                                "{:<5} {:<20} {:<15} {:<30} {:<10}",
                                user.id, user.username, user.document, user.email, user.state
                            );
                        }
                    }
                }
                Err(err) => {
                    eprintln!("❌ Failed to list users: {}", err);
                    std::process::exit(1);
                }
            },

            UserCommands::Show { id } => match user_service.get_user(id).await {
                Ok(user) => print_user(&user),
                Err(err) => {
                    eprintln!("❌ {}", err);
                    std::process::exit(1);
                }
            },

            UserCommands::Find { document } => {
                match user_service.find_user_by_document(&document).await {
                    Ok(Some(user)) => print_user(&user),
                    Ok(None) => {
                        eprintln!("❌ No user with document '{}'", document);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to find user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Update {
                document,
                username,
                phone_number,
                email,
                password,
                state,
            } => {
                let patch = UserPatch {
                    username,
                    phone_number,
                    email,
                    password,
                    state,
                };
                if patch.is_empty() {
                    println!("ℹ️  Nothing to update");
                    return Ok(());
                }

                let request = UpdateUserRequest {
                    document: document.clone(),
                    patch,
                };

                match user_service.update_user(request).await {
                    Ok(user) => {
                        println!("✅ User '{}' updated successfully!", document);
                        print_user(&user);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to update user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Delete { id } => match user_service.delete_user(id).await {
                Ok(()) => {
                    println!("✅ User {} deleted successfully!", id);
                }
                Err(err) => {
                    eprintln!("❌ Failed to delete user: {}", err);
                    std::process::exit(1);
                }
            },
        },
    }

    pool.close().await;

    Ok(())
}
