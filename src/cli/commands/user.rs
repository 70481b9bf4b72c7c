use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::database::{DatabaseManager, UserRepository};
use crate::journal::payload::SignupPayload;
use crate::services::{UserService, UserServiceError};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account directly in the database")]
    Create {
        #[arg(long, help = "Email address (used for login)")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "First name")]
        first_name: String,
        #[arg(long, help = "Last name")]
        last_name: String,
    },

    #[command(about = "List all user accounts")]
    List,
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    match cmd {
        UserCommands::Create {
            email,
            password,
            first_name,
            last_name,
        } => {
            let payload = SignupPayload {
                email,
                password,
                first_name,
                last_name,
            };
            match UserService::new(pool).signup(payload).await {
                Ok(user) => output_success(
                    &output_format,
                    "User created",
                    Some(json!({ "id": user.id, "email": user.email, "slug": user.slug })),
                ),
                Err(UserServiceError::EmailTaken) => {
                    output_error(&output_format, "A user with that email already exists", None)?;
                    std::process::exit(1);
                }
                Err(e) => Err(e.into()),
            }
        }
        UserCommands::List => {
            let users = UserRepository::new(pool).list().await?;
            match output_format {
                OutputFormat::Json => {
                    let data: Vec<_> = users.iter().map(|u| u.to_api(None)).collect();
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
                OutputFormat::Text => {
                    if users.is_empty() {
                        println!("No users found");
                    }
                    for user in &users {
                        let state = if user.is_active { "active" } else { "disabled" };
                        println!("{:>4}  {}  {}  ({})", user.id, user.email, user.slug, state);
                    }
                }
            }
            Ok(())
        }
    }
}
