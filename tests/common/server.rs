//! Fake chat server.
//!
//! Accepts one connection on a local port, writes a script of lines to it
//! and records every line the bot sends back.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct FakeChatServer {
    addr: SocketAddr,
    received: mpsc::UnboundedReceiver<String>,
    task: JoinHandle<()>,
}

impl FakeChatServer {
    /// Bind to an ephemeral port. Once the bot has logged in (sent `NICK`),
    /// `script` is written to it and the connection is closed after the
    /// bot sends `until`.
    pub async fn spawn(script: Vec<String>, until: &'static str) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, received) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();

            while let Ok(Some(line)) = lines.next_line().await {
                let line = line.trim_end_matches('\r').to_string();
                let logged_in = line.starts_with("NICK ");
                let done = line.starts_with(until);
                let _ = tx.send(line);

                if logged_in {
                    for out in &script {
                        if write.write_all(out.as_bytes()).await.is_err() {
                            return;
                        }
                    }
                }
                if done {
                    break;
                }
            }
        });

        Ok(Self {
            addr,
            received,
            task,
        })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Wait for the session to end and return what the bot sent.
    pub async fn finish(mut self) -> Vec<String> {
        let _ = tokio::time::timeout(Duration::from_secs(5), &mut self.task).await;
        let mut lines = Vec::new();
        while let Ok(line) = self.received.try_recv() {
            lines.push(line);
        }
        lines
    }
}
