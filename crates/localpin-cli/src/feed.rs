//! JSON adapters for vendor snapshots and the JSON-lines feed.

use anyhow::{bail, Context};
use futures::Stream;
use localpin_core::RawVendorDocument;
use localpin_live::FeedEvent;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Parse a snapshot file: a JSON array of documents carrying inline ids.
///
/// # Errors
///
/// Returns an error if the text is not JSON or not an array.
pub(crate) fn parse_snapshot(text: &str) -> anyhow::Result<Vec<RawVendorDocument>> {
    let value: Value = serde_json::from_str(text).context("vendor snapshot is not valid JSON")?;
    let Value::Array(docs) = value else {
        bail!("vendor snapshot must be a JSON array of documents");
    };
    Ok(inline_documents(docs))
}

/// Parse one feed line. Blank lines yield `None`.
///
/// # Errors
///
/// Returns an error for anything other than a document array or a
/// `{"event": "disconnected"}` marker.
pub(crate) fn parse_feed_line(line: &str) -> anyhow::Result<Option<FeedEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(line).context("feed line is not valid JSON")?;
    match value {
        Value::Array(docs) => Ok(Some(FeedEvent::Snapshot(inline_documents(docs)))),
        Value::Object(map) if map.get("event").and_then(Value::as_str) == Some("disconnected") => {
            Ok(Some(FeedEvent::Disconnected))
        }
        _ => bail!(r#"feed line must be a document array or {{"event": "disconnected"}}"#),
    }
}

/// Turn a line-oriented reader into a feed stream.
///
/// Unparseable lines are logged and skipped; a read error ends the stream.
pub(crate) fn line_feed<R>(reader: R) -> impl Stream<Item = FeedEvent>
where
    R: AsyncBufRead + Unpin,
{
    futures::stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_feed_line(&line) {
                    Ok(Some(event)) => return Some((event, lines)),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "skipping vendor feed line"),
                },
                Ok(None) => return None,
                Err(err) => {
                    tracing::warn!(error = %err, "vendor feed read failed");
                    return None;
                }
            }
        }
    })
}

fn inline_documents(docs: Vec<Value>) -> Vec<RawVendorDocument> {
    docs.into_iter()
        .enumerate()
        .map(|(index, doc)| RawVendorDocument::from_inline(index, doc))
        .collect()
}
