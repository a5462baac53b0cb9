//! `sline status` command: store totals at a glance.

use supportline_core::chat::repository::ChatRepository;

use crate::state::AppState;

pub async fn status(state: &AppState, json: bool) -> anyhow::Result<()> {
    let users = state.user_repo.count_users().await?;
    let stats = state.feedback_service.stats().await?;
    let messages = state.chat_service.repo().count_messages().await?;

    if json {
        let out = serde_json::json!({
            "users": users,
            "sessions": stats.total_sessions,
            "messages": messages,
            "feedback": {
                "total": stats.total,
                "positive": stats.positive,
                "negative": stats.negative,
                "positive_percentage": stats.positive_percentage,
            },
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}", console::style("Supportline status").bold());
    println!();
    println!("  Users:     {users}");
    println!("  Sessions:  {}", stats.total_sessions);
    println!("  Messages:  {messages}");
    println!(
        "  Feedback:  {} total ({} positive / {} negative, {}% positive)",
        stats.total,
        console::style(stats.positive).green(),
        console::style(stats.negative).red(),
        stats.positive_percentage
    );
    println!();

    Ok(())
}
