use crate::reading::{extract_reading, Reading};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Spawn a background task that reads one payload per line from stdin and
/// forwards each as a [`Reading`].
///
/// The channel closes at end of input, on an I/O error, or once every
/// receiver is dropped.  A line that is not valid UTF-8 is forwarded as
/// [`Reading::Missing`] and reading continues.
pub fn spawn_stdin_feed(field: impl Into<String>) -> mpsc::Receiver<Reading> {
    spawn_line_feed(tokio::io::stdin(), field)
}

/// Same as [`spawn_stdin_feed`] for any line-oriented reader.
pub fn spawn_line_feed<R>(reader: R, field: impl Into<String>) -> mpsc::Receiver<Reading>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);
    let field = field.into();

    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    debug!("feed reached end of input");
                    return;
                }
                Ok(_) => {
                    if tx.send(decode_line(&buf, &field)).await.is_err() {
                        return; // all receivers dropped
                    }
                }
                Err(e) => {
                    error!("feed read error: {e}");
                    return;
                }
            }
        }
    });

    rx
}

/// Turn one raw line (trailing newline included) into a [`Reading`].
fn decode_line(raw: &[u8], field: &str) -> Reading {
    match std::str::from_utf8(raw) {
        Ok(line) => extract_reading(line, field),
        Err(_) => Reading::Missing("invalid UTF-8".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_one_reading_per_line() {
        let input: &[u8] = b"1.5\n{\"body\": 2}\noops\n\n3\n";
        let mut rx = spawn_line_feed(input, "body");

        let mut readings = Vec::new();
        while let Some(r) = rx.recv().await {
            readings.push(r);
        }

        assert_eq!(readings.len(), 5);
        assert_eq!(readings[0], Reading::Value(1.5));
        assert_eq!(readings[1], Reading::Value(2.0));
        assert!(matches!(readings[2], Reading::Missing(_)));
        assert!(matches!(readings[3], Reading::Missing(_)));
        assert_eq!(readings[4], Reading::Value(3.0));
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_feed() {
        let input: &[u8] = b"1\n\xff\xfe\n2\n3";
        let mut rx = spawn_line_feed(input, "body");

        let mut readings = Vec::new();
        while let Some(r) = rx.recv().await {
            readings.push(r);
        }

        assert_eq!(readings.len(), 4);
        assert_eq!(readings[0], Reading::Value(1.0));
        assert_eq!(readings[1], Reading::Missing("invalid UTF-8".into()));
        assert_eq!(readings[2], Reading::Value(2.0));
        assert_eq!(readings[3], Reading::Value(3.0));
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        assert_eq!(decode_line(b"4.5\r\n", "body"), Reading::Value(4.5));
    }

    #[tokio::test]
    async fn empty_input_closes_channel() {
        let input: &[u8] = b"";
        let mut rx = spawn_line_feed(input, "body");
        assert!(rx.recv().await.is_none());
    }
}
