use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use std::sync::Arc;
use tandem_core::{IceServerConfig, Membership};
use tandem_peer::{PeerConfig, SampleDevices, Session, SessionConfig};
use tandem_relay::RelayConfig;
use tracing_subscriber::EnvFilter;

mod console;

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Two-party rooms with video, audio and chat over WebRTC")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, env = "TANDEM_RELAY_ADDR", default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },
    /// Create a new room and wait for someone to join.
    Create(PeerArgs),
    /// Join an existing room.
    Join {
        room: String,

        #[command(flatten)]
        peer: PeerArgs,
    },
}

#[derive(Args)]
struct PeerArgs {
    #[arg(long, env = "TANDEM_RELAY_URL", default_value = "ws://127.0.0.1:8000")]
    relay: String,

    /// STUN server URL. May be repeated.
    #[arg(long = "stun")]
    stun: Vec<String>,

    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL", hide_env_values = true)]
    turn_credential: Option<String>,
}

impl PeerArgs {
    fn into_config(self) -> SessionConfig {
        let mut peer = PeerConfig::default();
        if !self.stun.is_empty() {
            peer.ice_servers = vec![IceServerConfig {
                urls: self.stun,
                username: None,
                credential: None,
            }];
        }
        if let Some(url) = self.turn_url {
            peer.ice_servers.push(IceServerConfig {
                urls: vec![url],
                username: self.turn_username,
                credential: self.turn_credential,
            });
        }

        SessionConfig {
            relay_url: self.relay,
            peer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Relay { addr } => {
            println!("{} {}", "Relay listening on".green().bold(), addr);
            tandem_relay::serve(RelayConfig { addr }).await?;
        }
        Commands::Create(args) => {
            let membership = Membership::create();
            println!(
                "{} {}",
                "Room created:".green().bold(),
                membership.room.to_string().yellow().bold()
            );
            println!("   Share it with: tandem join {}", membership.room);
            run_peer(args.into_config(), membership).await?;
        }
        Commands::Join { room, peer } => {
            let membership = Membership::join(room.trim());
            println!(
                "{} {}",
                "Joining room".green().bold(),
                membership.room.to_string().yellow().bold()
            );
            run_peer(peer.into_config(), membership).await?;
        }
    }

    Ok(())
}

async fn run_peer(config: SessionConfig, membership: Membership) -> Result<()> {
    let (session, handle) = Session::connect(config, membership, Arc::new(SampleDevices::new()))
        .await
        .context("Failed to start session")?;
    let session_task = tokio::spawn(session.run());

    console::run(handle).await?;

    session_task.await.context("Session task panicked")?;
    println!("{}", "Left the room.".cyan());
    Ok(())
}
