//! Line-oriented console loop.

use cadence_ai::{ChatRequest, ChatService};
use cadence_common::SessionId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

const QUIT: &str = "/quit";

/// Submit each non-blank input line for `session` and write the reply.
///
/// Stops on `/quit` or end of input. Turn errors are reported and the loop
/// carries on.
pub async fn run<R, W>(
    service: &ChatService,
    session: &SessionId,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        output.write_all(b"you> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line == QUIT {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let request = ChatRequest {
            text: line.to_string(),
        };
        match service.submit(session, request).await {
            Ok(response) => {
                output
                    .write_all(format!("cadence> {}\n", response.reply).as_bytes())
                    .await?;
            }
            Err(e) => {
                warn!(session = %session, error = %e, "Turn failed");
                output.write_all(format!("error: {e}\n").as_bytes()).await?;
            }
        }
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    info!(session = %session, "Console session closed");
    Ok(())
}
