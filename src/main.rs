use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use jamcli::{
    cli, config, error,
    jamendo::EntityKind,
    navigation::{Endpoint, NavigationTarget},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print JSON instead of tables
    #[clap(long, global = true)]
    json: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open a plugin://jamcli/ URL printed by a listing
    Open { url: String },

    /// Browse tracks
    Tracks(SortedListOptions),

    /// Browse albums
    Albums(AlbumsOptions),

    /// Browse artists
    Artists(SortedListOptions),

    /// Browse playlists
    Playlists(PageOptions),

    /// Browse radios
    Radios(PageOptions),

    /// Search the catalog; asks for the terms when none are given
    Search(SearchOptions),

    /// Tracks of an album
    Album {
        album_id: String,
        #[clap(flatten)]
        page: PageOptions,
    },

    /// Tracks of a playlist
    Playlist { playlist_id: String },

    /// Tracks similar to a track
    Similar {
        track_id: String,
        #[clap(flatten)]
        page: PageOptions,
    },

    /// Sort methods of a sortable listing
    SortMethods {
        #[clap(value_enum)]
        entity: SortableKind,
    },

    /// Resolve a playable stream or file
    #[command(subcommand)]
    Play(PlaySubcommand),

    /// Download a track into the download directory
    Download { track_id: String },

    /// Recently played tracks
    History,

    /// Downloaded tracks
    Downloads,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PageOptions {
    /// Page to show, starting at 1
    #[clap(long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct SortedListOptions {
    /// Sort method, see `jamcli sort-methods`
    #[clap(long)]
    pub sort_method: Option<String>,

    #[clap(flatten)]
    pub page: PageOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    /// Only albums of this artist
    #[clap(long, conflicts_with = "sort_method")]
    pub artist: Option<String>,

    #[clap(flatten)]
    pub list: SortedListOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    #[clap(value_enum)]
    pub kind: SearchKind,

    /// Search terms
    pub query: Option<String>,

    #[clap(flatten)]
    pub page: PageOptions,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SearchKind {
    Tracks,
    Albums,
    Artists,
    Playlists,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum SortableKind {
    Tracks,
    Albums,
    Artists,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaySubcommand {
    /// Stream URL of a track (recorded in the history)
    Track { track_id: String },
    /// Stream URL of a radio
    Radio { radio_id: String },
    /// Local file of a downloaded track
    Downloaded { track_id: String },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn paged(endpoint: Endpoint, page: &PageOptions) -> NavigationTarget {
    let target = NavigationTarget::new(endpoint);
    if page.page > 1 {
        target.with_param("page", page.page)
    } else {
        target
    }
}

fn sorted(endpoint: Endpoint, options: &SortedListOptions) -> NavigationTarget {
    let target = paged(endpoint, &options.page);
    match &options.sort_method {
        Some(sort_method) => target.with_param("sort_method", sort_method),
        None => target,
    }
}

fn main() {
    if let Err(e) = config::load_env() {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let target = match cli.command {
        None => NavigationTarget::new(Endpoint::Root),
        Some(Command::Open { url }) => return cli::open_url(&url, cli.json),
        Some(Command::Tracks(opt)) => sorted(Endpoint::ShowTracks, &opt),
        Some(Command::Albums(opt)) => match opt.artist {
            Some(artist_id) => paged(Endpoint::ShowAlbumsByArtist, &opt.list.page)
                .with_param("artist_id", artist_id),
            None => sorted(Endpoint::ShowAlbums, &opt.list),
        },
        Some(Command::Artists(opt)) => sorted(Endpoint::ShowArtists, &opt),
        Some(Command::Playlists(opt)) => paged(Endpoint::ShowPlaylists, &opt),
        Some(Command::Radios(opt)) => paged(Endpoint::ShowRadios, &opt),
        Some(Command::Search(opt)) => {
            let endpoint = match opt.kind {
                SearchKind::Tracks => Endpoint::SearchTracks,
                SearchKind::Albums => Endpoint::SearchAlbums,
                SearchKind::Artists => Endpoint::SearchArtists,
                SearchKind::Playlists => Endpoint::SearchPlaylists,
            };
            let target = paged(endpoint, &opt.page);
            match opt.query {
                Some(query) => target.with_param("query", query),
                None => target,
            }
        }
        Some(Command::Album { album_id, page }) => {
            paged(Endpoint::ShowTracksInAlbum, &page).with_param("album_id", album_id)
        }
        Some(Command::Playlist { playlist_id }) => {
            NavigationTarget::new(Endpoint::ShowTracksInPlaylist).with_param("playlist_id", playlist_id)
        }
        Some(Command::Similar { track_id, page }) => {
            paged(Endpoint::ShowSimilarTracks, &page).with_param("track_id", track_id)
        }
        Some(Command::SortMethods { entity }) => {
            let entity = match entity {
                SortableKind::Tracks => EntityKind::Track,
                SortableKind::Albums => EntityKind::Album,
                SortableKind::Artists => EntityKind::Artist,
            };
            NavigationTarget::new(Endpoint::ShowSortMethods).with_param("entity", entity.as_str())
        }
        Some(Command::Play(PlaySubcommand::Track { track_id })) => {
            NavigationTarget::new(Endpoint::PlayTrack).with_param("track_id", track_id)
        }
        Some(Command::Play(PlaySubcommand::Radio { radio_id })) => {
            NavigationTarget::new(Endpoint::PlayRadio).with_param("radio_id", radio_id)
        }
        Some(Command::Play(PlaySubcommand::Downloaded { track_id })) => {
            NavigationTarget::new(Endpoint::PlayDownloaded).with_param("track_id", track_id)
        }
        Some(Command::Download { track_id }) => {
            NavigationTarget::new(Endpoint::DownloadTrack).with_param("track_id", track_id)
        }
        Some(Command::History) => NavigationTarget::new(Endpoint::ShowHistory),
        Some(Command::Downloads) => NavigationTarget::new(Endpoint::ShowDownloads),
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            return;
        }
    };

    cli::open(target, cli.json);
}
