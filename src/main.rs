use clap::{Parser, Subcommand};
use sinkfleet::{
    init_logging, Framing, GameConfig, RepeatShotPolicy, Server, ServerConfig, ServerMessage,
    SessionClient, BOARD_SIZE, DEFAULT_PORT, NUM_SHIPS,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host games; every connection gets its own board.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value_t = BOARD_SIZE)]
        board_size: usize,
        #[arg(long, default_value_t = NUM_SHIPS)]
        ships: usize,
        #[arg(long, value_enum, default_value_t = Framing::Utf)]
        framing: Framing,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = RepeatShotPolicy::ResolveAsMiss)]
        repeat_shots: RepeatShotPolicy,
    },
    /// Connect to a server, place a fleet and shoot every cell in order.
    Sweep {
        #[arg(long, default_value = "127.0.0.1:12345")]
        connect: String,
        #[arg(long, value_enum, default_value_t = Framing::Utf)]
        framing: Framing,
        #[arg(long, default_value_t = BOARD_SIZE)]
        board_size: usize,
        #[arg(long, default_value_t = NUM_SHIPS)]
        ships: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            port,
            board_size,
            ships,
            framing,
            seed,
            repeat_shots,
        } => {
            if let Some(s) = seed {
                log::info!("using fixed seed {} (fleets will be reproducible)", s);
            }
            let config = ServerConfig {
                bind,
                port,
                game: GameConfig {
                    board_size,
                    ship_count: ships,
                    repeat_policy: repeat_shots,
                },
                framing,
                seed,
            };
            let server = Server::bind(config).await?;
            tokio::select! {
                res = server.run() => res?,
                _ = tokio::signal::ctrl_c() => log::info!("shutting down"),
            }
        }
        Commands::Sweep {
            connect,
            framing,
            board_size,
            ships,
        } => {
            println!("Connecting to {}...", connect);
            let mut client = SessionClient::connect(&connect, framing, ships).await?;
            println!("{}", client.expect_greeting().await?);
            println!("{}", client.place_ships().await?);

            let summary = client
                .sweep_with(board_size, |report| match &report.reply {
                    ServerMessage::Impacto(at) => println!("Impacto en {}", at),
                    ServerMessage::Agua(at) => println!("Agua en {}", at),
                    other => println!("{}", other),
                })
                .await?;
            if summary.fleet_sunk {
                println!("Fleet sunk after {} shots.", summary.shots);
            } else {
                println!("Board swept, fleet still afloat.");
            }
        }
    }
    Ok(())
}
