use sinkfleet::{FramedTransport, Framing, InMemoryTransport, Transport, TransportError, MAX_FRAME_LEN};
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn test_framed_pair_exchanges_messages() -> anyhow::Result<()> {
    for framing in [Framing::Utf, Framing::Line] {
        let (a, b) = duplex(1024);
        let mut left = FramedTransport::new(a, framing);
        let mut right = FramedTransport::new(b, framing);

        left.send("IMPACTO:0,0").await?;
        left.send("HUNDIDA:¡Enhorabuena!").await?;
        assert_eq!(right.recv().await?.as_deref(), Some("IMPACTO:0,0"));
        assert_eq!(right.recv().await?.as_deref(), Some("HUNDIDA:¡Enhorabuena!"));

        drop(left);
        assert_eq!(right.recv().await?, None);
    }
    Ok(())
}

#[tokio::test]
async fn test_utf_framing_matches_write_utf() -> anyhow::Result<()> {
    let (a, mut b) = duplex(64);
    let mut transport = FramedTransport::new(a, Framing::Utf);
    transport.send("1,2").await?;
    drop(transport);

    let mut bytes = Vec::new();
    b.read_to_end(&mut bytes).await?;
    assert_eq!(bytes, [0x00, 0x03, b'1', b',', b'2']);
    Ok(())
}

#[tokio::test]
async fn test_eof_inside_length_prefix_is_a_fault() -> anyhow::Result<()> {
    let (a, mut b) = duplex(64);
    let mut transport = FramedTransport::new(a, Framing::Utf);
    b.write_all(&[0x00]).await?;
    drop(b);
    assert!(matches!(transport.recv().await, Err(TransportError::Io(_))));
    Ok(())
}

#[tokio::test]
async fn test_line_framing_strips_crlf_and_keeps_last_line() -> anyhow::Result<()> {
    let (a, mut b) = duplex(64);
    let mut transport = FramedTransport::new(a, Framing::Line);
    b.write_all(b"RESET\r\n2,3").await?;
    drop(b);
    assert_eq!(transport.recv().await?.as_deref(), Some("RESET"));
    assert_eq!(transport.recv().await?.as_deref(), Some("2,3"));
    assert_eq!(transport.recv().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_send_rejects_unframeable_messages() {
    let (a, _b) = duplex(64);
    let mut line = FramedTransport::new(a, Framing::Line);
    assert!(matches!(
        line.send("AGUA:1,1\nIMPACTO:2,2").await,
        Err(TransportError::EmbeddedNewline)
    ));

    let (a, _b) = duplex(64);
    let mut utf = FramedTransport::new(a, Framing::Utf);
    let huge = "x".repeat(MAX_FRAME_LEN + 1);
    assert!(matches!(
        utf.send(&huge).await,
        Err(TransportError::FrameTooLarge { .. })
    ));
}

#[tokio::test]
async fn test_in_memory_close() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send("RESET").await?;
    drop(a);
    assert_eq!(b.recv().await?.as_deref(), Some("RESET"));
    assert_eq!(b.recv().await?, None);
    assert!(matches!(b.send("0,0").await, Err(TransportError::Closed)));
    Ok(())
}
