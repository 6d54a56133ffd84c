use crate::constants::icon;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;
use rand::Rng;
use serenity::collector::ComponentInteractionCollector;
use serenity::{CreateActionRow, CreateButton};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfirmationOutcome {
    Accepted,
    Declined,
    Timeout,
}

pub struct ConfirmationPromptOptions {
    pub content: String,
    pub timeout: Duration,
}

impl ConfirmationPromptOptions {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            timeout: Duration::from_secs(45),
        }
    }
}

/// Asks `target_user` a yes/no question on a fresh message with two
/// buttons. The message is removed once the prompt resolves, and no
/// answer within the timeout counts as a refusal.
pub async fn confirmation_prompt(
    ctx: &Context<'_>,
    target_user: serenity::UserId,
    options: ConfirmationPromptOptions,
) -> Result<ConfirmationOutcome, Error> {
    let base_id = format!("confirm_{}", rand::rng().random::<u64>());
    let accept_id = format!("{base_id}_ok");
    let deny_id = format!("{base_id}_no");

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(&options.content)
                .components(create_buttons(&accept_id, &deny_id)),
        )
        .await?;
    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;

    let collector = ComponentInteractionCollector::new(ctx.serenity_context())
        .author_id(target_user)
        .message_id(message_id)
        .timeout(options.timeout);

    let outcome = if let Some(interaction) = collector.await {
        interaction
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::Acknowledge,
            )
            .await?;

        if interaction.data.custom_id == accept_id {
            ConfirmationOutcome::Accepted
        } else {
            ConfirmationOutcome::Declined
        }
    } else {
        ConfirmationOutcome::Timeout
    };

    let _ = channel_id
        .delete_message(ctx.serenity_context(), message_id)
        .await;

    Ok(outcome)
}

fn create_buttons(accept_id: &str, deny_id: &str) -> Vec<CreateActionRow> {
    let accept = CreateButton::new(accept_id)
        .label("Confirmar")
        .style(serenity::ButtonStyle::Success)
        .emoji(icon::CHECK.as_reaction());
    let deny = CreateButton::new(deny_id)
        .label("Cancelar")
        .style(serenity::ButtonStyle::Danger)
        .emoji(icon::ERROR.as_reaction());

    vec![CreateActionRow::Buttons(vec![accept, deny])]
}
