use std::sync::Arc;

use battleship_server::{serve, GameServer};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: std::net::SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Client {
            lines: BufReader::new(read_half).lines(),
            writer,
        })
    }

    async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    async fn expect(&mut self, line: &str) -> anyhow::Result<()> {
        let got = timeout(Duration::from_secs(5), self.lines.next_line()).await??;
        anyhow::ensure!(got.as_deref() == Some(line), "expected {:?}, got {:?}", line, got);
        Ok(())
    }

    async fn expect_eof(&mut self) -> anyhow::Result<()> {
        let got = timeout(Duration::from_secs(5), self.lines.next_line()).await?;
        anyhow::ensure!(matches!(got, Ok(None) | Err(_)), "expected EOF, got {:?}", got);
        Ok(())
    }
}

async fn start_server() -> anyhow::Result<std::net::SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(serve(listener, Arc::new(GameServer::new())));
    Ok(addr)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_alice_and_bob_play_to_victory() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut alice = Client::connect(addr).await?;
    let mut bob = Client::connect(addr).await?;

    // a probe miss after each login confirms the login has been processed
    alice.send("login Alice").await?;
    alice.send("attack 5 5").await?;
    alice.expect("Alice:Miss 5 5").await?;

    bob.send("login Bob").await?;
    bob.send("attack 5 5").await?;
    bob.expect("Bob:Miss 5 5").await?;
    alice.expect("Bob:Miss 5 5").await?;

    // reference deployment: single-cell ships at (0,0) and (9,9)
    alice.send("attack 0 0").await?;
    alice.expect("Alice:Hit 0 0").await?;
    bob.expect("Alice:Hit 0 0").await?;

    alice.send("attack 0 0").await?;
    alice.expect("Alice:AlreadyHit 0 0").await?;
    bob.expect("Alice:AlreadyHit 0 0").await?;

    bob.send("attack 9 9").await?;
    alice.expect("Bob:Hit 9 9").await?;
    bob.expect("Bob:Hit 9 9").await?;
    bob.expect("Game won by Bob").await?;

    // victory force-logs both players out and closes both connections
    alice.expect_eof().await?;
    bob.expect_eof().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_lines_are_ignored_and_session_survives() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut client = Client::connect(addr).await?;

    client.send("bogus 1").await?;
    client.send("attack 1 2 3").await?;
    client.send("").await?;
    client.send("LOGIN Alice").await?;
    client.send("attack 3 4").await?;

    client.expect("Alice:Miss 3 4").await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_closes_the_connection() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut client = Client::connect(addr).await?;

    client.send("login Alice").await?;
    client.send("logout Alice").await?;
    client.expect_eof().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_third_login_is_ignored_and_unattributed() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut alice = Client::connect(addr).await?;
    let mut bob = Client::connect(addr).await?;
    let mut carol = Client::connect(addr).await?;

    alice.send("login Alice").await?;
    alice.send("attack 5 5").await?;
    alice.expect("Alice:Miss 5 5").await?;

    bob.send("login Bob").await?;
    bob.send("attack 5 5").await?;
    bob.expect("Bob:Miss 5 5").await?;
    alice.expect("Bob:Miss 5 5").await?;

    // both slots are taken: Carol's login is silently dropped, but her
    // attacks still resolve, attributed to nobody
    carol.send("login Carol").await?;
    carol.send("attack 4 4").await?;
    alice.expect(":Miss 4 4").await?;
    bob.expect(":Miss 4 4").await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_disconnect_frees_the_slot() -> anyhow::Result<()> {
    let addr = start_server().await?;

    let mut alice = Client::connect(addr).await?;
    alice.send("login Alice").await?;
    alice.send("attack 5 5").await?;
    alice.expect("Alice:Miss 5 5").await?;
    drop(alice);

    // the freed slot becomes reusable; retry while the server notices the
    // disconnect, using attribution of a probe attack as the signal
    let mut bob = Client::connect(addr).await?;
    bob.send("login Bob").await?;
    bob.send("attack 5 5").await?;
    bob.expect("Bob:Miss 5 5").await?;

    let mut carol = Client::connect(addr).await?;
    for _ in 0..50u32 {
        carol.send("login Carol").await?;
        carol.send("attack 4 4").await?;
        // Bob sees every probe; attribution flips once the dead slot is free
        match timeout(Duration::from_secs(5), bob.lines.next_line()).await?? {
            Some(line) if line == "Carol:Miss 4 4" => return Ok(()),
            Some(_) => tokio::time::sleep(Duration::from_millis(20)).await,
            None => anyhow::bail!("bob's connection closed unexpectedly"),
        }
    }
    anyhow::bail!("slot was never released after disconnect")
}
