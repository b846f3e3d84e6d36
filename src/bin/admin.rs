//! Administration CLI for shorty.
//!
//! Manages users and API tokens, sweeps abandoned issuance rows and prints
//! statistics without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin admin -- user create alice
//! cargo run --bin admin -- user list
//! cargo run --bin admin -- token create --user 1 --name "CI"
//! cargo run --bin admin -- token revoke "CI"
//! cargo run --bin admin -- links sweep --older-than 60
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection
//! - `TOKEN_SIGNING_SECRET`: required by `token create`, must match the server

use shorty::application::services::auth_service::hash_token;
use shorty::config::Config;
use shorty::domain::repositories::{LinkRepository, TokenRepository};
use shorty::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Link maintenance
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        /// Unique user name
        username: Option<String>,
    },

    /// List users with their link counts
    List,
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token for a user
    Create {
        /// Owning user id
        #[arg(short, long)]
        user: i64,

        /// Token name (e.g., "CI", "Mobile App")
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// Delete links whose issuance never completed
    Sweep {
        /// Minimum age in minutes of a pending row before it is removed
        #[arg(long, default_value_t = 60)]
        older_than: i64,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;
    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Links { action } => handle_links_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    match action {
        UserAction::Create { username } => {
            let username = match username {
                Some(u) => u,
                None => Input::new().with_prompt("Username").interact_text()?,
            };

            let id: i64 =
                sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
                    .bind(username.trim())
                    .fetch_one(pool)
                    .await
                    .context("Failed to create user")?;

            println!(
                "{} {} (id {})",
                "✅ Created user".green().bold(),
                username.trim().cyan(),
                id.to_string().bright_white().bold()
            );
        }
        UserAction::List => {
            println!("{}", "👤 Users".bright_blue().bold());
            println!();

            let rows: Vec<(i64, String, i64)> = sqlx::query_as(
                r#"
                SELECT u.id, u.username, COUNT(l.id)
                FROM users u
                LEFT JOIN links l ON l.user_id = u.id AND l.state = 'complete'
                GROUP BY u.id
                ORDER BY u.id
                "#,
            )
            .fetch_all(pool)
            .await?;

            if rows.is_empty() {
                println!("{}", "  No users found".yellow());
                return Ok(());
            }

            println!(
                "  {:<5} {:<30} {}",
                "ID".bright_white().bold(),
                "Username".bright_white().bold(),
                "Links".bright_white().bold()
            );
            println!("  {}", "─".repeat(45).bright_black());
            for (id, username, links) in rows {
                println!(
                    "  {:<5} {:<30} {}",
                    id.to_string().bright_black(),
                    username.cyan(),
                    links
                );
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));

    match action {
        TokenAction::Create { user, name, yes } => create_token(&repo, user, name, yes).await,
        TokenAction::List => list_tokens(&repo).await,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await,
    }
}

/// Creates a token for `user_id`.
///
/// Only the HMAC digest is stored; the raw token is printed once.
async fn create_token(
    repo: &PgTokenRepository,
    user_id: i64,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("API")
            .interact_text()?,
    };
    let token_value = generate_token();

    println!("  User:  {}", user_id.to_string().cyan());
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  Save this token now, it cannot be shown again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm
        && !Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?
    {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.create_token(user_id, &token_name, &hash_token(&secret, &token_value))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "✅ Token created".green().bold());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<6} {:<28} {:<18} {}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(72).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<4} {:<6} {:<28} {:<18} {}",
            token.id.to_string().bright_black(),
            token.user_id,
            token.name.cyan(),
            token.created_at.format("%Y-%m-%d %H:%M").to_string(),
            status
        );
    }
    println!();

    Ok(())
}

async fn revoke_token(repo: &PgTokenRepository, name_or_id: String) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {} (id {})", token.name.cyan(), token.id);

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;
    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "✅ Token revoked".green().bold());

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    match action {
        LinksAction::Sweep { older_than } => {
            anyhow::ensure!(older_than >= 0, "--older-than must not be negative");

            let repo = PgLinkRepository::new(Arc::new(pool.clone()));
            let cutoff = Utc::now() - Duration::minutes(older_than);
            let removed = repo
                .delete_stale_pending(cutoff)
                .await
                .map_err(|e| anyhow::anyhow!("Sweep failed: {}", e))?;

            println!(
                "{} {} pending link(s) older than {} minute(s)",
                "🧹 Removed".green().bold(),
                removed.to_string().bright_white().bold(),
                older_than
            );
        }
    }

    Ok(())
}

async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE state = 'complete'")
        .fetch_one(pool)
        .await?;
    let pending: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE state = 'pending'")
        .fetch_one(pool)
        .await?;
    let clicks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;
    let tokens: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    for (label, value) in [
        ("Users", users),
        ("Links", links),
        ("Pending links", pending),
        ("Clicks", clicks),
        ("Active tokens", tokens),
    ] {
        println!(
            "  {:<15}{}",
            format!("{label}:"),
            value.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations applied: {}", migrations);
        }
    }

    Ok(())
}

/// Generates a 48-character alphanumeric token.
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
