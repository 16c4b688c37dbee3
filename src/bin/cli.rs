use anyhow::Context;
use clap::{Parser, Subcommand};
use gatehouse::{
    config::server::ServerConfig,
    db,
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UserService, UserServiceError},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gatehouse-cli")]
#[command(about = "CLI tool for managing Gatehouse accounts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new account
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show an account by email
    Find {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn read_new_password() -> anyhow::Result<String> {
    let password = prompt_password("Password")?;
    let confirm = prompt_password("Confirm password")?;
    if password != confirm {
        anyhow::bail!("passwords do not match");
    }
    Ok(password)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    let pool = db::create_pool(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.database_url))?;
    db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool));
    let user_service = UserService::new(user_repository);

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                password,
            } => {
                let password = match password {
                    Some(pw) => pw,
                    None => read_new_password()?,
                };

                let request = CreateUserRequest {
                    name,
                    email,
                    password,
                };

                match user_service.create_user(request).await {
                    Ok(user) => {
                        println!("Account created");
                        println!("  ID: {}", user.id);
                        println!("  Name: {}", user.name);
                        println!("  Email: {}", user.email);
                    }
                    Err(UserServiceError::EmailTaken) => {
                        anyhow::bail!("email is already registered");
                    }
                    Err(err) => return Err(err).context("failed to create account"),
                }
            }

            UserCommands::Find { email } => {
                match user_service
                    .find_user_by_email(&email)
                    .await
                    .context("failed to look up account")?
                {
                    Some(user) => {
                        println!("  ID: {}", user.id);
                        println!("  Name: {}", user.name);
                        println!("  Email: {}", user.email);
                        println!("  Created: {}", user.created_at.as_deref().unwrap_or("N/A"));
                    }
                    None => anyhow::bail!("no account registered for '{}'", email),
                }
            }
        },
    }

    Ok(())
}
