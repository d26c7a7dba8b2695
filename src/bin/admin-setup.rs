// ABOUTME: Command-line bootstrap for the first administrator and the widget catalogue
// ABOUTME: Writes directly to the database so a fresh install can log in to the admin dashboard
//! Admin routes need a bearer token and tokens need an existing user, so the
//! first administrator has to be created out of band.
//!
//! Usage:
//! ```bash
//! # Create the first administrator
//! cargo run --bin admin-setup -- create-admin-user --email admin@widgets.local --password secret
//!
//! # Add the bronze plan to the catalogue
//! cargo run --bin admin-setup -- add-widget --name "Bronze Plan" --price 2000 --recurring --plan-id price_123
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::env;
use tracing::{info, warn};
use widget_store::{
    auth::hash_password,
    database::Database,
    models::{NewWidget, User},
};

#[derive(Parser)]
#[command(
    name = "admin-setup",
    about = "Widget Store administrator and catalogue setup",
    long_about = "Create administrators and catalogue entries directly in the Widget Store database."
)]
struct AdminSetupArgs {
    #[command(subcommand)]
    command: AdminCommand,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Create or update an administrator
    CreateAdminUser {
        /// Admin email (required)
        #[arg(long)]
        email: String,

        /// Admin password (required)
        #[arg(long)]
        password: String,

        /// First name
        #[arg(long, default_value = "Admin")]
        first_name: String,

        /// Last name
        #[arg(long, default_value = "User")]
        last_name: String,

        /// Reset the password if the user already exists
        #[arg(long)]
        force: bool,
    },

    /// Add a widget to the catalogue
    AddWidget {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Price in cents
        #[arg(long)]
        price: i64,

        #[arg(long, default_value = "0")]
        inventory_level: i64,

        #[arg(long, default_value = "")]
        image: String,

        /// Sell as a subscription
        #[arg(long)]
        recurring: bool,

        /// Processor plan id for recurring widgets
        #[arg(long, default_value = "")]
        plan_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = AdminSetupArgs::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:./data/widgets.db".into());

    info!("Connecting to database: {database_url}");
    let database = Database::new(&database_url).await?;

    match args.command {
        AdminCommand::CreateAdminUser {
            email,
            password,
            first_name,
            last_name,
            force,
        } => {
            create_admin_user(&database, email, &password, first_name, last_name, force).await
        }
        AdminCommand::AddWidget {
            name,
            description,
            price,
            inventory_level,
            image,
            recurring,
            plan_id,
        } => {
            if recurring && plan_id.is_empty() {
                return Err(anyhow!("--plan-id is required for recurring widgets"));
            }
            let id = database
                .create_widget(&NewWidget {
                    name,
                    description,
                    inventory_level,
                    price,
                    image,
                    is_recurring: recurring,
                    plan_id,
                })
                .await?;
            info!("Widget {id} created");
            Ok(())
        }
    }
}

async fn create_admin_user(
    database: &Database,
    email: String,
    password: &str,
    first_name: String,
    last_name: String,
    force: bool,
) -> Result<()> {
    if password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }
    let password_hash = hash_password(password).await?;

    if let Some(existing) = database.get_user_by_email(&email).await? {
        if !force {
            warn!("User {email} already exists, use --force to reset the password");
            return Ok(());
        }
        database.update_password(existing.id, &password_hash).await?;
        info!("Password reset for {email}");
        return Ok(());
    }

    let user = User {
        id: 0,
        first_name,
        last_name,
        email,
        password: String::new(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let id = database.add_user(&user, &password_hash).await?;
    info!("Admin user {} created with id {id}", user.email);
    Ok(())
}
