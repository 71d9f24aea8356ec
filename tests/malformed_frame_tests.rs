use sinkfleet::{Framing, GameConfig, Server, ServerConfig, TcpTransport, Transport};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

async fn start(framing: Framing) -> anyhow::Result<std::net::SocketAddr> {
    let server = Server::bind(ServerConfig {
        bind: "127.0.0.1".into(),
        port: 0,
        game: GameConfig::default(),
        framing,
        seed: Some(99),
    })
    .await?;
    let addr = server.local_addr()?;
    tokio::spawn(server.run());
    Ok(addr)
}

/// Frame `msg` the way Java's `DataOutputStream::writeUTF` does for ASCII.
fn write_utf(msg: &str) -> Vec<u8> {
    let mut out = (msg.len() as u16).to_be_bytes().to_vec();
    out.extend_from_slice(msg.as_bytes());
    out
}

async fn read_utf(stream: &mut TcpStream) -> anyhow::Result<String> {
    let len = stream.read_u16().await? as usize;
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await?;
    Ok(String::from_utf8(buf)?)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_write_utf_client() -> anyhow::Result<()> {
    let addr = start(Framing::Utf).await?;
    let mut stream = TcpStream::connect(addr).await?;

    assert!(read_utf(&mut stream).await?.starts_with("INICIO:"));
    stream.write_all(&write_utf("ADD_SHIPS")).await?;
    assert_eq!(
        read_utf(&mut stream).await?,
        "RESET:Barcos colocados. ¡Que comience el juego!"
    );
    stream.write_all(&write_utf("7,-2")).await?;
    assert_eq!(read_utf(&mut stream).await?, "INVALIDO:7,-2");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_utf8_frame_is_skipped() -> anyhow::Result<()> {
    let addr = start(Framing::Utf).await?;
    let mut transport = TcpTransport::connect(addr, Framing::Utf).await?;
    transport.recv().await?;

    // A complete frame holding bytes that are not UTF-8.
    let mut raw = TcpStream::connect(addr).await?;
    read_utf(&mut raw).await?;
    raw.write_all(&[0x00, 0x02, 0xC3, 0x28]).await?;
    raw.write_all(&write_utf("ADD_SHIPS")).await?;
    assert!(read_utf(&mut raw).await?.starts_with("RESET:"));

    // The other session is unaffected throughout.
    transport.send("RESET").await?;
    assert!(transport.recv().await?.unwrap().starts_with("RESET:"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_truncated_frame_ends_only_that_session() -> anyhow::Result<()> {
    let addr = start(Framing::Utf).await?;

    let mut broken = TcpStream::connect(addr).await?;
    read_utf(&mut broken).await?;
    // Length says 100 bytes, but only 3 arrive before the write side closes.
    broken.write_all(&[0x00, 0x64, b'1', b',', b'1']).await?;
    broken.shutdown().await?;
    let mut rest = Vec::new();
    let res = timeout(Duration::from_secs(2), broken.read_to_end(&mut rest)).await?;
    assert!(rest.is_empty(), "server must not answer a truncated frame");
    assert!(matches!(res, Ok(0) | Err(_)));

    let mut healthy = TcpTransport::connect(addr, Framing::Utf).await?;
    assert!(healthy.recv().await?.unwrap().starts_with("INICIO:"));
    healthy.send("ADD_SHIPS").await?;
    assert!(healthy.recv().await?.unwrap().starts_with("RESET:"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_line_framing_accepts_crlf() -> anyhow::Result<()> {
    let addr = start(Framing::Line).await?;
    let mut stream = tokio::io::BufReader::new(TcpStream::connect(addr).await?);

    stream.get_mut().write_all(b"ADD_SHIPS\r\n9,9\r\n").await?;
    let mut lines = Vec::new();
    for _ in 0..3 {
        let mut line = String::new();
        stream.read_line(&mut line).await?;
        lines.push(line);
    }
    assert!(lines[0].starts_with("INICIO:"));
    assert!(lines[1].starts_with("RESET:"));
    assert_eq!(lines[2], "INVALIDO:9,9\n");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_overlong_line_closes_session() -> anyhow::Result<()> {
    let addr = start(Framing::Line).await?;
    let mut stream = tokio::io::BufReader::new(TcpStream::connect(addr).await?);
    let mut greeting = String::new();
    stream.read_line(&mut greeting).await?;
    assert!(greeting.starts_with("INICIO:"));

    // The server may hang up while we are still writing.
    let _ = stream.get_mut().write_all(&vec![b'7'; 70_000]).await;

    let mut buf = [0u8; 64];
    let res = timeout(Duration::from_secs(2), stream.read(&mut buf)).await?;
    assert!(matches!(res, Ok(0) | Err(_)), "no reply expected, got {:?}", res);
    Ok(())
}
