use anyhow::{Context, Result};
use chrono::Local;
use serde_json::Value;
use tabled::Tabled;

use crate::api::catalog::ChannelQuery;
use crate::api::{TeliaSession, Transport};
use crate::cli::args::CliMode;
use crate::cli::display;
use crate::config::{self, AppConfig};
use crate::player;

pub async fn run(mode: CliMode) -> Result<()> {
    if mode == CliMode::Init {
        return AppConfig::generate_config();
    }

    let config = AppConfig::load()?;
    let mut session = TeliaSession::new(config.user_data()?)?;

    match mode {
        CliMode::Logout => {
            session.logout().await?;
            config::clear_tokens()?;
            println!("Logged out");
            return Ok(());
        }
        CliMode::Login => {
            login(&mut session, &config).await?;
            println!("Logged in as {}", config.credentials.username);
            return Ok(());
        }
        _ => ensure_logged_in(&mut session, &config).await?,
    }

    execute(&session, mode, config.stream.video_player.as_deref()).await
}

async fn login<T: Transport>(session: &mut TeliaSession<T>, config: &AppConfig) -> Result<()> {
    let creds = &config.credentials;
    let tokens = session
        .login(&creds.username, &creds.password)
        .await
        .context("Login failed")?;
    config::save_tokens(&tokens)
}

async fn ensure_logged_in<T: Transport>(
    session: &mut TeliaSession<T>,
    config: &AppConfig,
) -> Result<()> {
    let creds = &config.credentials;
    let restored = session
        .restore(&creds.username, &creds.password)
        .await
        .context("Could not restore session")?;

    match restored {
        Some(tokens) => config::save_tokens(&tokens),
        None => Ok(()),
    }
}

async fn execute<T: Transport>(
    session: &TeliaSession<T>,
    mode: CliMode,
    video_player: Option<&str>,
) -> Result<()> {
    match mode {
        CliMode::MainMenu => print_table(display::menu_rows(&session.get_main_menu().await?)),
        CliMode::Search { query, limit, offset } => {
            print_table(display::content_rows(&session.search(&query, limit, offset).await?))
        }
        CliMode::Page { page_id } => {
            let panels = Value::Array(session.get_page(&page_id).await?);
            print_table(display::content_rows(&panels))
        }
        CliMode::Channels { limit, offset } => {
            let query = ChannelQuery {
                timestamp: Local::now().timestamp_millis(),
                limit,
                offset,
            };
            print_table(display::channel_rows(&session.get_channels(query).await?))
        }
        CliMode::Channel { channel_id } => {
            let timestamp = Local::now().timestamp_millis();
            print_json(&session.get_channel(&channel_id, timestamp).await?)
        }
        CliMode::Store { store_id } => print_json(&session.get_store(&store_id).await?),
        CliMode::Panel { panel_id, limit, offset } => {
            print_table(display::content_rows(
                &session.get_panel(&panel_id, limit, offset).await?,
            ))
        }
        CliMode::Series { series_id } => print_json(&session.get_series(&series_id).await?),
        CliMode::Season { season_id } => {
            print_table(display::content_rows(&session.get_season(&season_id).await?))
        }
        CliMode::Vod { video_id } => match session.get_vod(&video_id).await? {
            Some(vod) => print_json(&vod),
            None => {
                println!("No web rental available for {video_id}");
                Ok(())
            }
        },
        CliMode::Play { stream_id, stream_type, url_only } => {
            session.validate_stream().await?;
            let Some(stream) = session.get_stream(&stream_id, &stream_type).await? else {
                anyhow::bail!("No {stream_type} stream available for {stream_id}");
            };
            player::handle_stream(&stream, url_only, video_player)
        }
        CliMode::Rent { vod_id, pin_code } => {
            print_json(&session.rent_video(&vod_id, &pin_code).await?)
        }
        CliMode::AddToMyList { media_id } => {
            session.add_to_my_list(&media_id).await?;
            println!("Added {media_id} to my list");
            Ok(())
        }
        CliMode::RemoveFromMyList { media_id } => {
            session.remove_from_my_list(&media_id).await?;
            println!("Removed {media_id} from my list");
            Ok(())
        }
        other => anyhow::bail!("{other:?} is not a catalog command"),
    }
}

fn print_table<R: Tabled>(rows: Vec<R>) -> Result<()> {
    if rows.is_empty() {
        println!("Nothing found");
        return Ok(());
    }

    println!("{}", display::format_table(rows));
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
