use crate::{Context, Error};
use std::time::Instant;

/// Mede a latência do bot 🏓
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Utilidades"
)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let start = Instant::now();

    let msg = ctx.say("🏓 Medindo...").await?;
    let roundtrip = start.elapsed();

    let manager = ctx.data().shard_manager.clone();
    let runners = manager.runners.lock().await;
    let shard_id = ctx.serenity_context().shard_id;
    let gateway = runners
        .get(&shard_id)
        .and_then(|runner| runner.latency)
        .unwrap_or_default();

    msg.edit(
        ctx,
        poise::CreateReply::default().content(format!(
            "🏓 Pong! Gateway: {} ms • API: {} ms",
            gateway.as_millis(),
            roundtrip.as_millis()
        )),
    )
    .await?;

    Ok(())
}
