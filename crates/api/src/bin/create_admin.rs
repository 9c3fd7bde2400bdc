//! Create a dashboard administrator.
//!
//! Reads the username, password, and confirmation from stdin, then inserts
//! an Argon2id-hashed admin user into `DATABASE_URL`.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use tokenprint_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use tokenprint_db::models::admin_user::CreateAdminUser;
use tokenprint_db::repositories::AdminUserRepo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://tokenprint.db".into());

    let stdin = io::stdin();
    let mut lines = stdin.lock();

    let username = prompt(&mut lines, "Username: ")?.trim().to_string();
    let password = prompt(&mut lines, "Password: ")?;
    let confirm = prompt(&mut lines, "Confirm password: ")?;

    let password = validate_credentials(&username, password, &confirm)?;

    let pool = tokenprint_db::create_pool(&database_url)
        .await
        .with_context(|| format!("Failed to open database {database_url}"))?;
    tokenprint_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if AdminUserRepo::find_by_username(&pool, &username).await?.is_some() {
        bail!("Admin user '{username}' already exists");
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;
    let user = AdminUserRepo::create(
        &pool,
        &CreateAdminUser {
            username: username.clone(),
            password_hash,
        },
    )
    .await
    .context("Failed to insert admin user")?;

    println!("Created admin user '{}' (id {})", user.username, user.id);
    Ok(())
}

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("Unexpected end of input");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn validate_credentials(username: &str, password: String, confirm: &str) -> anyhow::Result<String> {
    if username.trim().is_empty() {
        bail!("Username must not be empty");
    }
    validate_password_strength(&password, MIN_PASSWORD_LENGTH).map_err(anyhow::Error::msg)?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}
