use serde_json::json;
use sinkfleet::{Framing, GameConfig, Server, ServerConfig, SessionClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;

    let game = GameConfig::default();
    let server = Server::bind(ServerConfig {
        bind: "127.0.0.1".into(),
        port: 0,
        game,
        framing: Framing::Utf,
        seed: Some(seed),
    })
    .await?;
    let addr = server.local_addr()?;
    let server_task = tokio::spawn(server.run());

    let mut client = SessionClient::connect(addr, Framing::Utf, game.ship_count).await?;
    client.expect_greeting().await?;
    client.place_ships().await?;
    let summary = client.sweep(game.board_size).await?;
    server_task.abort();

    let result = json!({
        "seed": seed,
        "board_size": game.board_size,
        "ships": game.ship_count,
        "sweep": summary,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
