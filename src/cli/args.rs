use clap::{ArgGroup, Parser};

use crate::api::playback::StreamType;

/// teliaplay - Command-line client for Telia Play
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None,)]
#[command(group(
    ArgGroup::new("mode")
        .args([
            "init", "login", "logout", "search", "page", "channels", "channel", "store",
            "panel", "series", "season", "vod", "play", "rent", "add", "remove",
        ])
        .multiple(false)
        .required(false)
))]
pub struct Cli {
    /// Re-initializes application config file
    #[arg(long)]
    pub init: bool,

    /// Log in again with the configured credentials, discarding stored tokens
    #[arg(long)]
    pub login: bool,

    /// Log out and forget stored tokens
    #[arg(long)]
    pub logout: bool,

    /// Search the catalog
    #[arg(short, long)]
    pub search: Option<String>,

    /// List the panels of a page
    #[arg(long)]
    pub page: Option<String>,

    /// List live TV channels
    #[arg(short, long)]
    pub channels: bool,

    /// Show a single channel with its schedule
    #[arg(long)]
    pub channel: Option<String>,

    /// Show a store page
    #[arg(long)]
    pub store: Option<String>,

    /// List the content of a panel
    #[arg(long)]
    pub panel: Option<String>,

    /// Show a series with its seasons
    #[arg(long)]
    pub series: Option<String>,

    /// List the episodes of a season
    #[arg(long)]
    pub season: Option<String>,

    /// Show the web rental variant of a media item
    #[arg(long)]
    pub vod: Option<String>,

    /// Play a channel or media item by id
    #[arg(short, long)]
    pub play: Option<String>,

    /// Stream type used with --play (live, vod, rental, trailer)
    #[arg(short = 't', long, requires = "play")]
    pub stream_type: Option<StreamType>,

    /// Print the stream URL instead of launching the player
    #[arg(short, long, requires = "play")]
    pub url: bool,

    /// Rent a video by its VOD id
    #[arg(long, requires = "pin")]
    pub rent: Option<String>,

    /// Purchase PIN code used with --rent
    #[arg(long, requires = "rent")]
    pub pin: Option<String>,

    /// Add a series or media item to my list
    #[arg(long)]
    pub add: Option<String>,

    /// Remove a series or media item from my list
    #[arg(long)]
    pub remove: Option<String>,

    /// Number of results to fetch
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,

    /// Number of results to skip
    #[arg(short, long, default_value_t = 0)]
    pub offset: u32,

    /// Increase verbosity (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Init,
    Login,
    Logout,
    MainMenu,
    Search { query: String, limit: u32, offset: u32 },
    Page { page_id: String },
    Channels { limit: u32, offset: u32 },
    Channel { channel_id: String },
    Store { store_id: String },
    Panel { panel_id: String, limit: u32, offset: u32 },
    Series { series_id: String },
    Season { season_id: String },
    Vod { video_id: String },
    Play { stream_id: String, stream_type: StreamType, url_only: bool },
    Rent { vod_id: String, pin_code: String },
    AddToMyList { media_id: String },
    RemoveFromMyList { media_id: String },
}

impl Cli {
    pub fn to_mode(&self) -> anyhow::Result<CliMode> {
        let (limit, offset) = (self.limit, self.offset);

        if self.init {
            return Ok(CliMode::Init);
        }
        if self.login {
            return Ok(CliMode::Login);
        }
        if self.logout {
            return Ok(CliMode::Logout);
        }
        if let Some(query) = &self.search {
            if query.trim().is_empty() {
                anyhow::bail!("Search query must not be empty");
            }
            return Ok(CliMode::Search { query: query.clone(), limit, offset });
        }
        if let Some(page_id) = &self.page {
            return Ok(CliMode::Page { page_id: page_id.clone() });
        }
        if self.channels {
            return Ok(CliMode::Channels { limit, offset });
        }
        if let Some(channel_id) = &self.channel {
            return Ok(CliMode::Channel { channel_id: channel_id.clone() });
        }
        if let Some(store_id) = &self.store {
            return Ok(CliMode::Store { store_id: store_id.clone() });
        }
        if let Some(panel_id) = &self.panel {
            return Ok(CliMode::Panel { panel_id: panel_id.clone(), limit, offset });
        }
        if let Some(series_id) = &self.series {
            return Ok(CliMode::Series { series_id: series_id.clone() });
        }
        if let Some(season_id) = &self.season {
            return Ok(CliMode::Season { season_id: season_id.clone() });
        }
        if let Some(video_id) = &self.vod {
            return Ok(CliMode::Vod { video_id: video_id.clone() });
        }
        if let Some(stream_id) = &self.play {
            return Ok(CliMode::Play {
                stream_id: stream_id.clone(),
                stream_type: self.stream_type.clone().unwrap_or(StreamType::Live),
                url_only: self.url,
            });
        }
        if let (Some(vod_id), Some(pin_code)) = (&self.rent, &self.pin) {
            return Ok(CliMode::Rent { vod_id: vod_id.clone(), pin_code: pin_code.clone() });
        }
        if let Some(media_id) = &self.add {
            return Ok(CliMode::AddToMyList { media_id: media_id.clone() });
        }
        if let Some(media_id) = &self.remove {
            return Ok(CliMode::RemoveFromMyList { media_id: media_id.clone() });
        }

        Ok(CliMode::MainMenu)
    }
}
