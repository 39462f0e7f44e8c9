//! Add-user command handler

use crate::config::Config;
use crate::db::{NewUser, Store};
use crate::models::Role;

pub async fn cmd_add_user(
    config: &Config,
    name: String,
    email: String,
    password: String,
    phone: Option<String>,
    role: Option<String>,
) -> anyhow::Result<()> {
    let role = role
        .map(|r| r.parse::<Role>().map_err(|e| anyhow::anyhow!(e)))
        .transpose()?;

    let store = Store::with_options(
        &config.general.database_path,
        config.security.clone(),
        5,
        1,
    )
    .await?;

    if store.user_exists(&email).await? {
        anyhow::bail!("A user with email {} already exists", email);
    }

    let id = store
        .create_user(NewUser {
            name: name.clone(),
            email: email.clone(),
            password,
            phone,
            role,
            is_active: true,
        })
        .await?;

    println!("Created user {} <{}> (id {})", name, email, id);

    Ok(())
}
