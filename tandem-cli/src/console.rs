use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;
use tandem_core::{Mode, Participant};
use tandem_peer::{ChatEntry, ModeState, SessionError, SessionHandle, TransportState};
use tokio::task::JoinHandle;

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    SwitchMode(Mode),
    ToggleMute,
    SendFile { name: String, size: u64 },
    Chat(String),
    Quit,
    Empty,
    Invalid(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ConsoleCommand::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ConsoleCommand::Chat(line.to_owned());
        };

        let mut words = rest.split_whitespace();
        match words.next() {
            Some("video") => ConsoleCommand::SwitchMode(Mode::Video),
            Some("chat") => ConsoleCommand::SwitchMode(Mode::Chat),
            Some("dashboard") => ConsoleCommand::SwitchMode(Mode::Dashboard),
            Some("mute") => ConsoleCommand::ToggleMute,
            Some("quit") => ConsoleCommand::Quit,
            Some("file") => match (words.next(), words.next().map(str::parse::<u64>)) {
                (Some(name), Some(Ok(size))) => ConsoleCommand::SendFile {
                    name: name.to_owned(),
                    size,
                },
                _ => ConsoleCommand::Invalid("usage: /file <name> <size>".to_owned()),
            },
            _ => ConsoleCommand::Invalid(format!("unknown command: {}", line)),
        }
    }
}

/// Reads prompt lines until `/quit` or a closed session.
pub async fn run(handle: SessionHandle) -> Result<()> {
    let local = handle.membership().role.participant();
    let watchers = spawn_watchers(&handle, local);

    println!(
        "{}",
        "Commands: /video /chat /dashboard /mute /file <name> <size> /quit".dimmed()
    );

    loop {
        let line = read_line().await?;

        let outcome = match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Empty => continue,
            ConsoleCommand::Invalid(reason) => {
                println!("{}", reason.red());
                continue;
            }
            ConsoleCommand::SwitchMode(mode) => handle.switch_mode(mode).await,
            ConsoleCommand::ToggleMute => match handle.toggle_mute().await {
                Ok(Some(muted)) => {
                    let label = if muted { "Muted" } else { "Unmuted" };
                    println!("{}", label.yellow());
                    Ok(())
                }
                Ok(None) => {
                    println!("{}", "No microphone to mute".yellow());
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ConsoleCommand::SendFile { name, size } => handle.send_file(name, size).await,
            ConsoleCommand::Chat(message) => handle.send_chat(message).await,
        };

        match outcome {
            Ok(()) => {}
            Err(SessionError::Closed) => {
                println!("{}", "Session closed".red().bold());
                break;
            }
            Err(e) => println!("{} {}", "Error:".red().bold(), e),
        }
    }

    handle.shutdown().await;
    for watcher in watchers {
        watcher.abort();
    }
    Ok(())
}

async fn read_line() -> Result<String> {
    tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("tandem")
            .allow_empty(true)
            .interact_text()
    })
    .await
    .context("Prompt task panicked")?
    .context("Failed to read from terminal")
}

fn spawn_watchers(handle: &SessionHandle, local: Participant) -> Vec<JoinHandle<()>> {
    let mut chat = handle.chat();
    let chat_task = tokio::spawn(async move {
        let mut printed = 0;
        while chat.changed().await.is_ok() {
            let log = chat.borrow_and_update().clone();
            for entry in log.entries().iter().skip(printed) {
                if entry.sender() != local {
                    println!("{}", render_entry(entry));
                }
            }
            printed = log.len();
        }
    });

    let mut status = handle.status();
    let status_task = tokio::spawn(async move {
        let mut last = status.borrow().transport;
        while status.changed().await.is_ok() {
            let transport = status.borrow_and_update().transport;
            if transport != last {
                println!("{}", render_transport(transport));
                last = transport;
            }
        }
    });

    let mut mode = handle.mode();
    let mode_task = tokio::spawn(async move {
        while mode.changed().await.is_ok() {
            let state = *mode.borrow_and_update();
            match state {
                ModeState::Active(mode) => println!("{} {:?}", "Mode:".cyan(), mode),
                ModeState::Failed { mode, attempted } => println!(
                    "{} {:?}, staying in {:?}",
                    "Could not switch to".red(),
                    attempted,
                    mode
                ),
                ModeState::Switching { .. } => {}
            }
        }
    });

    vec![chat_task, status_task, mode_task]
}

fn render_entry(entry: &ChatEntry) -> String {
    let sender = entry.sender().to_string().magenta().bold();
    match entry {
        ChatEntry::Text { message, .. } => format!("{}: {}", sender, message),
        ChatEntry::Image { name, data, .. } => {
            format!("{} sent image {} ({} bytes encoded)", sender, name.blue(), data.len())
        }
        ChatEntry::File { name, size, .. } => {
            format!("{} shared file {} ({} bytes)", sender, name.blue(), size)
        }
    }
}

fn render_transport(state: TransportState) -> ColoredString {
    match state {
        TransportState::Connected => "Peer connected".green().bold(),
        TransportState::Disconnected => "Peer disconnected".yellow(),
        TransportState::Failed => "Peer connection failed".red().bold(),
        TransportState::Closed => "Peer connection closed".red(),
        TransportState::New | TransportState::Connecting => "Connecting to peer...".dimmed(),
    }
}
