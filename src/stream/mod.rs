//! Line-oriented rendering of newline-delimited JSON events.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::InterpolationError;
use crate::event::JsonEvent;
use crate::template::Interpolator;

/// Stream-specific error type
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {source}")]
    Event {
        line: usize,
        #[source]
        source: InterpolationError,
    },
}

/// Counters reported after a stream has been drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Lines rendered and written
    pub rendered: usize,
    /// Lines dropped because they could not be decoded or rendered
    pub skipped: usize,
}

/// Render every event read from `reader` through `template`, one output
/// line per event.
///
/// Blank input lines are ignored. When `skip_invalid` is set, lines that
/// fail to decode or render are logged and counted instead of aborting.
pub async fn render_lines<R, W>(
    interpolator: &Interpolator,
    template: &str,
    mut reader: R,
    mut writer: W,
    skip_invalid: bool,
) -> Result<RenderStats, StreamError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = RenderStats::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let rendered = match decode_line(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => line.trim().parse::<JsonEvent>().and_then(|event| {
                interpolator
                    .evaluate(&event, template)
                    .map(|output| output.into_owned())
            }),
            Err(e) => Err(e),
        };

        match rendered {
            Ok(mut output) => {
                output.push('\n');
                writer.write_all(output.as_bytes()).await?;
                stats.rendered += 1;
            }
            Err(e) if skip_invalid => {
                tracing::warn!(line = line_no, error = %e, "Skipping event");
                stats.skipped += 1;
            }
            Err(e) => {
                return Err(StreamError::Event {
                    line: line_no,
                    source: e,
                })
            }
        }
    }

    writer.flush().await?;

    tracing::debug!(
        rendered = stats.rendered,
        skipped = stats.skipped,
        "Event stream drained"
    );
    Ok(stats)
}

fn decode_line(bytes: &[u8]) -> Result<&str, InterpolationError> {
    std::str::from_utf8(bytes)
        .map_err(|e| InterpolationError::InvalidEvent(format!("line is not valid UTF-8: {e}")))
}
