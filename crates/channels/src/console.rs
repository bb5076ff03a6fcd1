//! Console channel: interactive terminal chat.
//!
//! Reads from stdin, writes to stdout. Lines that arrive within the paste
//! window of each other are delivered as a single multi-line message, so a
//! pasted block is answered once instead of line by line.

use std::io::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use parley_core::channel::{Channel, ChannelId, ChannelMessage};
use parley_core::error::ChannelError;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Typing this on its own ends the session.
pub const EXIT_COMMAND: &str = "exit";

/// Interactive console channel.
pub struct ConsoleChannel {
    id: ChannelId,
    user_id: String,
    paste_window: Duration,
    reply_prefix: String,
}

impl ConsoleChannel {
    pub fn new(
        user_id: impl Into<String>,
        paste_window: Duration,
        reply_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id: ChannelId("console".into()),
            user_id: user_id.into(),
            paste_window,
            reply_prefix: reply_prefix.into(),
        }
    }

    pub fn from_config(config: &parley_config::AppConfig) -> Self {
        Self::new(
            &config.user_id,
            Duration::from_millis(config.console.paste_window_ms),
            &config.console.reply_prefix,
        )
    }

    /// The reply exactly as [`Channel::send`] prints it.
    pub fn format_reply(&self, content: &str) -> String {
        format!("{}{content}", self.reply_prefix)
    }

    /// Read messages from any line source until EOF or the exit command.
    pub fn spawn_reader<R>(
        &self,
        reader: R,
    ) -> mpsc::Receiver<Result<ChannelMessage, ChannelError>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        let channel_id = self.id.clone();
        let sender_id = self.user_id.clone();
        let paste_window = self.paste_window;

        tokio::spawn(async move {
            let mut lines = reader.lines();

            loop {
                let first = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break, // EOF (Ctrl+D)
                    Err(e) => {
                        let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                };

                let mut batch = vec![first];
                let mut eof = false;
                loop {
                    match tokio::time::timeout(paste_window, lines.next_line()).await {
                        Ok(Ok(Some(line))) => batch.push(line),
                        Ok(Ok(None)) => {
                            eof = true;
                            break;
                        }
                        Ok(Err(e)) => {
                            let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                            eof = true;
                            break;
                        }
                        // Quiet for a full window: the user is done typing.
                        Err(_) => break,
                    }
                }

                if batch.len() > 1 {
                    debug!(lines = batch.len(), "Coalesced pasted input");
                }

                if let Some(content) = coalesce_lines(&batch) {
                    if content.trim() == EXIT_COMMAND {
                        break;
                    }

                    let msg = ChannelMessage {
                        channel_id: channel_id.clone(),
                        sender_id: sender_id.clone(),
                        content,
                    };
                    if tx.send(Ok(msg)).await.is_err() {
                        break;
                    }
                }

                if eof {
                    break;
                }
            }
        });

        rx
    }
}

#[async_trait]
impl Channel for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
    }

    fn id(&self) -> &ChannelId {
        &self.id
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<ChannelMessage, ChannelError>>, ChannelError> {
        Ok(self.spawn_reader(BufReader::new(io::stdin())))
    }

    async fn send(&self, content: &str) -> Result<(), ChannelError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", self.format_reply(content))
            .and_then(|()| stdout.flush())
            .map_err(|e| ChannelError::DeliveryFailed {
                channel: "console".into(),
                reason: e.to_string(),
            })
    }
}

/// Join one burst of lines into a message.
///
/// Returns `None` when the burst holds nothing but whitespace.
pub fn coalesce_lines(lines: &[String]) -> Option<String> {
    let joined = lines.join("\n");
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Print `prompt` and read one line from stdin, without the line ending.
///
/// Returns `Ok(None)` at EOF. Blocks the calling thread. Lines typed ahead
/// stay in the process-wide stdin buffer, which `tokio::io::stdin` reads
/// from later, so nothing is dropped when the console channel starts.
pub fn read_line_blocking(prompt: &str) -> std::io::Result<Option<String>> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut line = String::new();
    if std::io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
