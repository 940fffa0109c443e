/// Line commands read from stdin
use aria_core::TrackId;
use aria_playback::{FavoriteOutcome, Player, RepeatMode, SessionState};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  play <id>      play a song, jumping to it if already queued
  queue <id>     append a song to the queue
  next | prev    skip forward or back
  seek <secs>    seek within the current song
  pause | resume | toggle
  shuffle        toggle shuffle
  repeat         cycle repeat mode (off, track, queue)
  fav <id>       toggle a favorite (current song if no id)
  refresh        reload the catalog
  login <token>  sign in with an access token
  logout         sign out
  status         show the current song and queue
  songs          list the catalog
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(TrackId),
    Queue(TrackId),
    Next,
    Previous,
    Seek(Duration),
    Pause,
    Resume,
    Toggle,
    Shuffle,
    Repeat,
    Favorite(Option<TrackId>),
    Refresh,
    Login(String),
    Logout,
    Status,
    Songs,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("Not a number of seconds: {0}")]
    InvalidSeconds(String),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();

        let required = |command: &'static str| arg.ok_or(ParseError::MissingArgument(command));

        let command = match name.as_str() {
            "play" | "p" => Self::Play(TrackId::new(required("play")?)),
            "queue" | "q" => Self::Queue(TrackId::new(required("queue")?)),
            "next" | "n" => Self::Next,
            "prev" | "previous" => Self::Previous,
            "seek" => {
                let secs = required("seek")?;
                let position = secs
                    .parse::<f64>()
                    .ok()
                    .and_then(|s| Duration::try_from_secs_f64(s).ok())
                    .ok_or_else(|| ParseError::InvalidSeconds(secs.to_string()))?;
                Self::Seek(position)
            }
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "toggle" | "t" => Self::Toggle,
            "shuffle" => Self::Shuffle,
            "repeat" => Self::Repeat,
            "fav" | "favorite" => Self::Favorite(arg.map(TrackId::new)),
            "refresh" => Self::Refresh,
            "login" => Self::Login(required("login")?.to_string()),
            "logout" => Self::Logout,
            "status" | "s" => Self::Status,
            "songs" | "ls" => Self::Songs,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Run one command; returns `false` when the loop should stop
pub async fn execute(player: &Player, command: Command) -> bool {
    let session = player.session();

    match command {
        Command::Play(id) => session.play_with_id(id).await,
        Command::Queue(id) => {
            session.add_to_queue(id).await;
            println!("Queue: {} tracks", session.state().queue.len());
        }
        Command::Next => session.skip_to_next().await,
        Command::Previous => session.skip_to_previous().await,
        Command::Seek(position) => session.seek_to(position).await,
        Command::Pause => session.pause().await,
        Command::Resume => session.play().await,
        Command::Toggle => session.toggle_play_pause().await,
        Command::Shuffle => {
            let enabled = session.toggle_shuffle().await;
            println!("Shuffle {}", if enabled { "on" } else { "off" });
        }
        Command::Repeat => {
            let mode = session.toggle_repeat().await;
            println!("Repeat {}", repeat_label(mode));
        }
        Command::Favorite(id) => {
            let id = id.or_else(|| session.state().current_track().map(|t| t.id.clone()));
            match id {
                Some(id) => match player.toggle_favorite(id.clone()).await {
                    FavoriteOutcome::Added => println!("Added {id} to favorites"),
                    FavoriteOutcome::Removed => println!("Removed {id} from favorites"),
                    FavoriteOutcome::AuthRequired | FavoriteOutcome::RolledBack => {}
                },
                None => println!("Nothing is playing"),
            }
        }
        Command::Refresh => {
            let report = player.refresh().await;
            if report.is_complete() {
                println!("Catalog: {} songs", player.catalog().snapshot().songs.len());
            }
        }
        Command::Login(token) => {
            player.set_access_token(Some(token)).await;
            println!(
                "Signed in, {} favorites",
                player.favorites().favorites().len()
            );
        }
        Command::Logout => {
            player.set_access_token(None).await;
            println!("Signed out");
        }
        Command::Status => print_status(player, &session.state()).await,
        Command::Songs => print_songs(player),
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "off",
        RepeatMode::Track => "track",
        RepeatMode::Queue => "queue",
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

async fn print_status(player: &Player, state: &SessionState) {
    if !state.player_ready {
        println!("Player is not ready");
        return;
    }

    match state.current_track() {
        Some(track) => {
            let star = if player.favorites().is_favorite(&track.id) {
                " *"
            } else {
                ""
            };
            println!("{} - {}{} [{:?}]", track.artist_name, track.title, star, state.playback);
            if let Some(progress) = player.session().progress().await {
                println!(
                    "  {} / {}",
                    format_duration(progress.position),
                    format_duration(progress.duration)
                );
            }
        }
        None => println!("Nothing queued"),
    }

    println!(
        "Repeat {}, shuffle {}",
        repeat_label(state.repeat),
        if state.shuffle.enabled() { "on" } else { "off" }
    );
    for (i, entry) in state.queue.entries().iter().enumerate() {
        let marker = if state.queue.current_index() == Some(i) {
            ">"
        } else {
            " "
        };
        println!("{marker} {:>3}. {} ({})", i + 1, entry.track.title, entry.track.id);
    }
}

fn print_songs(player: &Player) {
    let snapshot = player.catalog().snapshot();
    if snapshot.songs.is_empty() {
        println!("Catalog is empty");
        return;
    }
    for song in &snapshot.songs {
        let star = if player.favorites().is_favorite(&song.id) {
            "*"
        } else {
            " "
        };
        println!("{star} {}  {}", song.id, song.title);
    }
}
