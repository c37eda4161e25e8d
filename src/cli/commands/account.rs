use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::hash_password;
use crate::cli::utils::{output_empty_collection, output_success, read_password};
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{self, service};

#[derive(Subcommand)]
pub enum AccountCommands {
    #[command(about = "Create an account")]
    Create {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Create the account disabled")]
        inactive: bool,
    },

    #[command(about = "Replace an account's password")]
    Password {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Allow an account to authenticate")]
    Activate {
        #[arg(help = "Username")]
        username: String,
    },

    #[command(about = "Stop an account from authenticating")]
    Deactivate {
        #[arg(help = "Username")]
        username: String,
    },

    #[command(about = "List accounts")]
    List,
}

pub async fn handle(cmd: AccountCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = database::connect(&config::config().database).await?;

    match cmd {
        AccountCommands::Create {
            username,
            password,
            inactive,
        } => {
            let password = read_password(password)?;
            let hash = hash_password(&password)?;
            let account = service::create_account(&pool, &username, &hash, !inactive).await?;
            output_success(
                &output_format,
                &format!("Created account '{}'", account.username),
                Some(json!({ "account": account })),
            )
        }
        AccountCommands::Password { username, password } => {
            let password = read_password(password)?;
            let hash = hash_password(&password)?;
            service::set_account_password(&pool, &username, &hash).await?;
            output_success(
                &output_format,
                &format!("Password updated for '{}'", username),
                None,
            )
        }
        AccountCommands::Activate { username } => {
            service::set_account_active(&pool, &username, true).await?;
            output_success(&output_format, &format!("Activated '{}'", username), None)
        }
        AccountCommands::Deactivate { username } => {
            service::set_account_active(&pool, &username, false).await?;
            output_success(&output_format, &format!("Deactivated '{}'", username), None)
        }
        AccountCommands::List => {
            let accounts = service::list_accounts(&pool)
                .await
                .context("failed to list accounts")?;

            if accounts.is_empty() {
                return output_empty_collection(&output_format, "accounts");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "accounts": accounts }))?);
                }
                OutputFormat::Text => {
                    for account in &accounts {
                        let status = if account.is_active { "active" } else { "inactive" };
                        println!(
                            "{:<6} {:<30} {:<9} {}",
                            account.id,
                            account.username,
                            status,
                            account.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            Ok(())
        }
    }
}
