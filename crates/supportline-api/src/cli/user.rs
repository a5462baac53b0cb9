//! `sline user` commands.

use chrono::Utc;
use uuid::Uuid;

use supportline_types::user::User;

use crate::http::extractors::auth::{generate_api_key, hash_api_key};
use crate::state::AppState;

/// Create a user account and issue its API key.
///
/// The plaintext key is printed exactly once; only its hash is stored.
pub async fn add_user(
    state: &AppState,
    name: String,
    email: String,
    json: bool,
) -> anyhow::Result<()> {
    let user = User {
        id: Uuid::now_v7(),
        name,
        email,
        created_at: Utc::now(),
    };
    let user = state.user_repo.create_user(&user).await?;

    let api_key = generate_api_key();
    state
        .user_repo
        .create_api_key(&user.id, &hash_api_key(&api_key), "default")
        .await?;

    if json {
        let out = serde_json::json!({
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "api_key": api_key,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!(
            "  {} User '{}' created ({})",
            console::style("✓").green(),
            console::style(&user.name).cyan(),
            user.email
        );
        println!();
        println!("  API key (save this -- it won't be shown again):");
        println!();
        println!("  {}", console::style(&api_key).yellow().bold());
        println!();
    }

    Ok(())
}
