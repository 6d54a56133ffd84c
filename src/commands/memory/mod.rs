use crate::{
    Context, Error,
    constants::{colors, icon},
    functions::{
        time,
        ui::{
            component::{acknowledge_component, send_ephemeral_response, update_component_message},
            pretty_message::pretty_message,
            prompt::{ConfirmationOutcome, ConfirmationPromptOptions, confirmation_prompt},
        },
    },
    pares::ActiveGames,
};
use board::{ActivationResult, Board, GuessOutcome, TickResult};
use chrono::{DateTime, Utc};
use poise::serenity_prelude::{self as serenity, Mentionable};
use rand::Rng;
use serenity::builder::EditMessage;
use serenity::collector::ComponentInteractionCollector;
use serenity::{CreateActionRow, CreateButton};
use settings::{Settings, symbol_text};
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tile::TileState;
use tokio::sync::Notify;

mod board;
mod settings;
mod tile;

// Discord grants five action rows of five buttons each, and the last
// row belongs to the game controls.
const MAX_BOARD_ROWS: u32 = 4;
const MAX_BOARD_COLUMNS: u32 = 5;
const MAX_TURN_SECONDS: u32 = 600;
const GAME_TIMEOUT: Duration = Duration::from_secs(600);
const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(45);
const HIDDEN_LABEL: &str = "❔";

/// Jogo da memória: revele as peças e encontre os grupos de símbolos iguais.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    category = "Jogos",
    rename = "memoria",
    aliases("pares"),
    on_error = "crate::commands::util::command_error_handler"
)]
pub async fn memory(
    ctx: Context<'_>,
    #[description = "Linhas do tabuleiro (1 a 4)"]
    #[min = 1]
    #[max = 4]
    linhas: Option<u32>,
    #[description = "Colunas do tabuleiro (1 a 5)"]
    #[min = 1]
    #[max = 5]
    colunas: Option<u32>,
    #[description = "Peças iguais por grupo (mínimo 2)"]
    #[min = 2]
    #[max = 20]
    iguais: Option<u32>,
    #[description = "Código Unicode do primeiro símbolo"]
    simbolo: Option<u32>,
    #[description = "Segundos por jogada (0 desliga o relógio)"]
    #[max = 600]
    tempo: Option<u32>,
) -> Result<(), Error> {
    let defaults = Settings::default();
    let settings = Settings {
        rows: linhas.unwrap_or(defaults.rows),
        columns: colunas.unwrap_or(defaults.columns),
        group_size: iguais.unwrap_or(defaults.group_size),
        start_symbol: simbolo.unwrap_or(defaults.start_symbol),
        turn_seconds: tempo.unwrap_or(defaults.turn_seconds),
    };

    // Slash options carry these limits already, prefix invocations do not.
    if settings.rows == 0
        || settings.rows > MAX_BOARD_ROWS
        || settings.columns == 0
        || settings.columns > MAX_BOARD_COLUMNS
    {
        ctx.send(
            poise::CreateReply::default()
                .content(pretty_message(
                    icon::ERROR,
                    format!(
                        "O tabuleiro vai de 1x1 até {MAX_BOARD_ROWS}x{MAX_BOARD_COLUMNS} para caber nos botões do Discord."
                    ),
                ))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    if settings.turn_seconds > MAX_TURN_SECONDS {
        ctx.send(
            poise::CreateReply::default()
                .content(pretty_message(
                    icon::ERROR,
                    format!("O relógio por jogada vai até {MAX_TURN_SECONDS} segundos."),
                ))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    if let Err(problem) = settings.validate() {
        ctx.send(
            poise::CreateReply::default()
                .content(pretty_message(icon::ERROR, problem))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let registry = ctx.data().active_games.clone();
    let channel_id = ctx.channel_id();
    let claim = match claim_channel(&registry, channel_id).await {
        Some(claim) => claim,
        None => {
            let mut prompt_options = ConfirmationPromptOptions::new(pretty_message(
                icon::BELL,
                "Já existe um jogo da memória em andamento neste canal. Descartar esse jogo e começar outro?",
            ));
            prompt_options.timeout = CONFIRMATION_TIMEOUT;

            match confirmation_prompt(&ctx, ctx.author().id, prompt_options).await? {
                ConfirmationOutcome::Accepted => take_over_channel(&registry, channel_id).await,
                ConfirmationOutcome::Declined | ConfirmationOutcome::Timeout => return Ok(()),
            }
        }
    };

    run_game(ctx, settings, claim).await
}

struct GameView {
    status: String,
    settings_open: bool,
    started_at: DateTime<Utc>,
}

impl GameView {
    fn fresh(settings_open: bool) -> Self {
        Self {
            status: pretty_message(
                icon::BELL,
                "Revele as peças e encontre os grupos de símbolos iguais!",
            ),
            settings_open,
            started_at: Utc::now(),
        }
    }
}

async fn run_game(ctx: Context<'_>, settings: Settings, claim: GameClaim) -> Result<(), Error> {
    let player = ctx.author().clone();
    let custom_id_prefix = format!("mem_{}_", rand::rng().random::<u64>());
    let new_game_id = format!("{custom_id_prefix}new");
    let settings_id = format!("{custom_id_prefix}cfg");
    let quit_id = format!("{custom_id_prefix}quit");

    let mut board = deal_board(settings)?;
    let mut view = GameView::fresh(false);

    let (embed, components) = render_game(&board, &view, &player, &custom_id_prefix);
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(embed)
                .components(components),
        )
        .await?;
    let message = reply.message().await?;
    let message_id = message.id;
    let channel_id = message.channel_id;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first tick resolves immediately, burn it so the clock starts at zero.
    ticker.tick().await;
    let mut last_interaction = Instant::now();

    loop {
        let press = ComponentInteractionCollector::new(ctx.serenity_context())
            .author_id(player.id)
            .message_id(message_id)
            .into_future();

        tokio::select! {
            _ = claim.token.notified() => {
                view.status = pretty_message(
                    icon::ERROR,
                    "Este jogo foi substituído por um mais novo no canal.",
                );
                close_game(&ctx, channel_id, message_id, &board, &view, &player, &custom_id_prefix)
                    .await?;
                return Ok(());
            }
            _ = ticker.tick() => {
                match board.tick() {
                    TickResult::TurnExpired { covered } => {
                        view.status = pretty_message(
                            icon::ALARM,
                            format!("O tempo da jogada acabou e **{covered}** peça(s) viraram de novo."),
                        );
                        let (embed, components) =
                            render_game(&board, &view, &player, &custom_id_prefix);
                        edit_game_message(&ctx, channel_id, message_id, embed, components).await?;
                    }
                    TickResult::Clock | TickResult::Idle => {
                        if last_interaction.elapsed() >= GAME_TIMEOUT {
                            view.status =
                                pretty_message(icon::ERROR, "Jogo encerrado por inatividade.");
                            close_game(
                                &ctx,
                                channel_id,
                                message_id,
                                &board,
                                &view,
                                &player,
                                &custom_id_prefix,
                            )
                            .await?;
                            return Ok(());
                        }
                    }
                }
            }
            pressed = press => {
                let Some(interaction) = pressed else {
                    view.status = pretty_message(icon::ERROR, "Jogo encerrado por inatividade.");
                    close_game(&ctx, channel_id, message_id, &board, &view, &player, &custom_id_prefix)
                        .await?;
                    return Ok(());
                };
                last_interaction = Instant::now();

                if let Some(index) = parse_index(&interaction.data.custom_id, &custom_id_prefix) {
                    match board.activate(index) {
                        ActivationResult::Revealed { countdown_started } => {
                            view.status = reveal_status(&board, countdown_started);
                            let (embed, components) =
                                render_game(&board, &view, &player, &custom_id_prefix);
                            update_component_message(&ctx, &interaction, embed, components).await?;
                        }
                        ActivationResult::GuessFinalized(GuessOutcome::Matched {
                            summary: Some(summary),
                        }) => {
                            view.status = pretty_message(
                                icon::TROPHY,
                                format!(
                                    "{} encontrou os **{}** grupos em **{}** tentativas \
                                     (**{:.2}%** de acerto) e **{}s** de jogo!",
                                    player.mention(),
                                    summary.total_groups,
                                    summary.guess_count,
                                    summary.success_percent(),
                                    board.elapsed_seconds(),
                                ),
                            );
                            let (embed, components) =
                                render_game(&board, &view, &player, &custom_id_prefix);
                            update_component_message(&ctx, &interaction, embed, components).await?;
                            return Ok(());
                        }
                        ActivationResult::GuessFinalized(GuessOutcome::Matched { summary: None }) => {
                            view.status = pretty_message(
                                icon::CHECK,
                                "Grupo encontrado! Continue procurando.",
                            );
                            let (embed, components) =
                                render_game(&board, &view, &player, &custom_id_prefix);
                            update_component_message(&ctx, &interaction, embed, components).await?;
                        }
                        ActivationResult::GuessFinalized(GuessOutcome::Failed) => {
                            view.status = pretty_message(
                                icon::ERROR,
                                "As peças não eram iguais e viraram de novo.",
                            );
                            let (embed, components) =
                                render_game(&board, &view, &player, &custom_id_prefix);
                            update_component_message(&ctx, &interaction, embed, components).await?;
                        }
                        ActivationResult::Ignored => {
                            send_ephemeral_response(
                                &ctx,
                                &interaction,
                                pretty_message(icon::ERROR, "Essa peça não pode ser virada agora."),
                            )
                            .await?;
                        }
                    }
                } else if interaction.data.custom_id == new_game_id {
                    acknowledge_component(&ctx, &interaction).await?;
                    let question =
                        "O jogo atual ainda não terminou. Descartar e embaralhar um tabuleiro novo?";
                    if discard_confirmed(&ctx, player.id, &board, question).await? {
                        board = deal_board(settings)?;
                        view = GameView::fresh(view.settings_open);
                        // Ticks queued while the prompt was open belong to the
                        // discarded board, not the fresh one.
                        ticker.reset();
                        let (embed, components) =
                            render_game(&board, &view, &player, &custom_id_prefix);
                        edit_game_message(&ctx, channel_id, message_id, embed, components).await?;
                    }
                } else if interaction.data.custom_id == settings_id {
                    view.settings_open = !view.settings_open;
                    let (embed, components) =
                        render_game(&board, &view, &player, &custom_id_prefix);
                    update_component_message(&ctx, &interaction, embed, components).await?;
                } else if interaction.data.custom_id == quit_id {
                    acknowledge_component(&ctx, &interaction).await?;
                    let question = "Encerrar este jogo da memória e descartar o tabuleiro?";
                    if discard_confirmed(&ctx, player.id, &board, question).await? {
                        view.status = pretty_message(
                            icon::CHECK,
                            format!("{} encerrou o jogo. Até a próxima!", player.mention()),
                        );
                        close_game(
                            &ctx,
                            channel_id,
                            message_id,
                            &board,
                            &view,
                            &player,
                            &custom_id_prefix,
                        )
                        .await?;
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn deal_board(settings: Settings) -> Result<Board, Error> {
    let mut rng = rand::rng();
    Ok(Board::new(settings, &mut rng)?)
}

/// A board with unmatched tiles is only thrown away with the player's
/// say-so. Anything else can go silently.
async fn discard_confirmed(
    ctx: &Context<'_>,
    player_id: serenity::UserId,
    board: &Board,
    question: &str,
) -> Result<bool, Error> {
    if !board.in_progress() {
        return Ok(true);
    }

    let mut prompt_options = ConfirmationPromptOptions::new(pretty_message(icon::BELL, question));
    prompt_options.timeout = CONFIRMATION_TIMEOUT;

    Ok(confirmation_prompt(ctx, player_id, prompt_options).await? == ConfirmationOutcome::Accepted)
}

fn reveal_status(board: &Board, countdown_started: bool) -> String {
    let group_size = board.settings().group_size as usize;
    let revealed = board.revealed_count();
    if revealed == group_size {
        pretty_message(
            icon::CHECK,
            "Conjunto completo. A próxima peça que você tocar confere o palpite.",
        )
    } else if countdown_started {
        pretty_message(
            icon::ALARM,
            format!(
                "Relógio valendo! Faltam **{}** peça(s) para fechar o conjunto.",
                group_size - revealed
            ),
        )
    } else {
        pretty_message(
            icon::BELL,
            format!(
                "Faltam **{}** peça(s) para fechar o conjunto.",
                group_size - revealed
            ),
        )
    }
}

fn render_game(
    board: &Board,
    view: &GameView,
    player: &serenity::User,
    prefix: &str,
) -> (serenity::CreateEmbed, Vec<CreateActionRow>) {
    (
        build_embed(board, view, player),
        build_components(board, prefix, board.is_finished()),
    )
}

async fn close_game(
    ctx: &Context<'_>,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
    board: &Board,
    view: &GameView,
    player: &serenity::User,
    prefix: &str,
) -> Result<(), Error> {
    let embed = build_embed(board, view, player);
    let components = build_components(board, prefix, true);
    edit_game_message(ctx, channel_id, message_id, embed, components).await
}

async fn edit_game_message(
    ctx: &Context<'_>,
    channel_id: serenity::ChannelId,
    message_id: serenity::MessageId,
    embed: serenity::CreateEmbed,
    components: Vec<CreateActionRow>,
) -> Result<(), Error> {
    channel_id
        .edit_message(
            ctx.serenity_context(),
            message_id,
            EditMessage::new().embed(embed).components(components),
        )
        .await?;
    Ok(())
}

fn build_embed(board: &Board, view: &GameView, player: &serenity::User) -> serenity::CreateEmbed {
    let settings = board.settings();
    let mut lines = vec![
        pretty_message(
            icon::CHECK,
            format!(
                "**{}/{}** grupos encontrados",
                board.matched_groups(),
                settings.total_groups()
            ),
        ),
        pretty_message(icon::HASH, format!("**{}** tentativas", board.guess_count())),
        pretty_message(
            icon::TIMER,
            format!("Começou {}", time::describe_relative(view.started_at)),
        ),
    ];

    if let Some(remaining) = board.countdown() {
        lines.push(pretty_message(
            icon::ALARM,
            format!(
                "A jogada expira {}",
                time::describe_relative(time::in_seconds(remaining))
            ),
        ));
    }

    lines.push(String::new());
    lines.push(view.status.clone());

    let colour = if board.is_finished() {
        colors::MATCHA
    } else {
        colors::BLUEBERRY
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("🧠 Memória de {}", player.name))
        .colour(colour)
        .description(lines.join("\n"));

    if view.settings_open {
        embed = embed.field(
            format!("{} Configurações", icon::GEAR),
            settings_panel(settings),
            false,
        );
    }

    embed
}

fn settings_panel(settings: &Settings) -> String {
    let preview: Vec<String> = settings
        .symbols()
        .iter()
        .map(|&code| symbol_text(code))
        .collect();
    let clock = if settings.turn_seconds == 0 {
        "**sem limite**".to_string()
    } else {
        format!("**{}s** por jogada", settings.turn_seconds)
    };

    [
        format!("Tabuleiro: **{}x{}**", settings.rows, settings.columns),
        format!("Peças por grupo: **{}**", settings.group_size),
        format!("Relógio: {clock}"),
        format!("Símbolos: {}", preview.join(" ")),
        "Use `/memoria` com outras opções para mudar o tabuleiro.".to_string(),
    ]
    .join("\n")
}

fn build_components(board: &Board, prefix: &str, locked: bool) -> Vec<CreateActionRow> {
    let columns = board.settings().columns as usize;
    let tiles = board.tiles();
    let mut rows = Vec::new();
    for chunk_start in (0..tiles.len()).step_by(columns) {
        let mut buttons = Vec::new();
        for offset in 0..columns {
            let index = chunk_start + offset;
            if index >= tiles.len() {
                break;
            }

            let tile = &tiles[index];
            let button = CreateButton::new(format!("{prefix}{index}"));
            let mut button = match tile.state() {
                TileState::Covered => button
                    .label(HIDDEN_LABEL)
                    .style(serenity::ButtonStyle::Secondary),
                TileState::Revealed => button
                    .label(symbol_text(tile.symbol()))
                    .style(serenity::ButtonStyle::Primary),
                TileState::Matched => button
                    .label(symbol_text(tile.symbol()))
                    .style(serenity::ButtonStyle::Success)
                    .disabled(true),
            };
            if locked {
                button = button.disabled(true);
            }

            buttons.push(button);
        }
        rows.push(CreateActionRow::Buttons(buttons));
    }

    let controls = vec![
        CreateButton::new(format!("{prefix}new"))
            .label("Novo jogo")
            .emoji(icon::PLUS.as_reaction())
            .style(serenity::ButtonStyle::Primary)
            .disabled(locked),
        CreateButton::new(format!("{prefix}cfg"))
            .label("Configurações")
            .emoji(icon::GEAR.as_reaction())
            .style(serenity::ButtonStyle::Secondary)
            .disabled(locked),
        CreateButton::new(format!("{prefix}quit"))
            .label("Encerrar")
            .emoji(icon::ERROR.as_reaction())
            .style(serenity::ButtonStyle::Danger)
            .disabled(locked),
    ];
    rows.push(CreateActionRow::Buttons(controls));

    rows
}

fn parse_index(custom_id: &str, prefix: &str) -> Option<usize> {
    custom_id.strip_prefix(prefix)?.parse().ok()
}

struct GameClaim {
    channel_id: serenity::ChannelId,
    token: Arc<Notify>,
    registry: ActiveGames,
}

impl Drop for GameClaim {
    fn drop(&mut self) {
        let channel_id = self.channel_id;
        let token = Arc::clone(&self.token);
        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            let mut lock = registry.lock().await;
            // A takeover may have replaced the token; only the holder unregisters.
            if lock
                .get(&channel_id)
                .is_some_and(|current| Arc::ptr_eq(current, &token))
            {
                lock.remove(&channel_id);
            }
        });
    }
}

async fn claim_channel(
    registry: &ActiveGames,
    channel_id: serenity::ChannelId,
) -> Option<GameClaim> {
    let mut lock = registry.lock().await;
    if lock.contains_key(&channel_id) {
        return None;
    }
    let token = Arc::new(Notify::new());
    lock.insert(channel_id, Arc::clone(&token));
    drop(lock);

    Some(GameClaim {
        channel_id,
        token,
        registry: Arc::clone(registry),
    })
}

/// Replaces whatever game holds the channel and wakes it so it can close
/// its own message before the new board goes up.
async fn take_over_channel(registry: &ActiveGames, channel_id: serenity::ChannelId) -> GameClaim {
    let token = Arc::new(Notify::new());
    let previous = {
        let mut lock = registry.lock().await;
        lock.insert(channel_id, Arc::clone(&token))
    };
    if let Some(previous) = previous {
        previous.notify_one();
    }

    GameClaim {
        channel_id,
        token,
        registry: Arc::clone(registry),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_index_requires_the_game_prefix() {
        assert_eq!(parse_index("mem_42_7", "mem_42_"), Some(7));
        assert_eq!(parse_index("mem_42_new", "mem_42_"), None);
        assert_eq!(parse_index("mem_42_cfg", "mem_42_"), None);
        assert_eq!(parse_index("outro_7", "mem_42_"), None);
    }

    #[test]
    fn settings_panel_previews_the_symbol_run() {
        let settings = Settings {
            rows: 2,
            columns: 2,
            group_size: 2,
            start_symbol: 65,
            turn_seconds: 0,
        };
        let panel = settings_panel(&settings);
        assert!(panel.contains("**2x2**"));
        assert!(panel.contains("A B"));
        assert!(panel.contains("sem limite"));
    }
}
