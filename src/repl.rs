//! Interactive shell
//!
//! A line-oriented front-end over [`CommandHandler`]. Each input line is
//! split into arguments, executed, and the reply is written back in the
//! usual CLI rendering.
//!
//! ## Session Lifecycle
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  write prompt (if any)       │◄──┐
//! └──────────────┬───────────────┘   │
//!                ▼                   │
//! ┌──────────────────────────────┐   │
//! │  read line ── EOF ──► end    │   │
//! └──────────────┬───────────────┘   │
//!                ▼                   │
//! ┌──────────────────────────────┐   │
//! │  split_args ── QUIT ──► end  │   │
//! └──────────────┬───────────────┘   │
//!                ▼                   │
//! ┌──────────────────────────────┐   │
//! │  execute, write reply        │───┘
//! └──────────────────────────────┘
//! ```
//!
//! Reader and writer are generic so the same loop runs on stdin/stdout and
//! on in-memory mocks in tests.

use std::io;

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

use crate::commands::{CommandHandler, Reply};
use crate::error::{Error, Result};

/// Splits a shell line into arguments.
///
/// Arguments are separated by whitespace. Double quotes group text and
/// understand `\"`, `\\`, `\n`, `\r` and `\t`; single quotes group text
/// literally. An unterminated quote is an error.
pub fn split_args(line: &str) -> Result<Vec<Bytes>> {
    let mut args = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut current = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            match c {
                '"' => loop {
                    match chars.next().ok_or(Error::UnbalancedQuotes)? {
                        '"' => break,
                        '\\' => match chars.next().ok_or(Error::UnbalancedQuotes)? {
                            'n' => current.push('\n'),
                            'r' => current.push('\r'),
                            't' => current.push('\t'),
                            other => current.push(other),
                        },
                        other => current.push(other),
                    }
                },
                '\'' => loop {
                    match chars.next().ok_or(Error::UnbalancedQuotes)? {
                        '\'' => break,
                        other => current.push(other),
                    }
                },
                other => current.push(other),
            }
        }
        args.push(Bytes::from(current));
    }

    Ok(args)
}

fn is_quit(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"QUIT") || name.eq_ignore_ascii_case(b"EXIT")
}

async fn write_reply<W>(writer: &mut W, reply: &Reply) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut out = reply.to_string();
    out.push('\n');
    writer.write_all(out.as_bytes()).await?;
    writer.flush().await
}

/// Runs a shell session until `QUIT`/`EXIT` or end of input.
///
/// `prompt` is written before every read when present; pass `None` for
/// piped input.
pub async fn run<R, W>(
    handler: &CommandHandler,
    mut reader: R,
    mut writer: W,
    prompt: Option<&str>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Shell session started");

    let mut line = Vec::new();
    let mut executed: u64 = 0;

    loop {
        if let Some(prompt) = prompt {
            writer.write_all(prompt.as_bytes()).await?;
            writer.flush().await?;
        }

        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => {
                debug!("End of input");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Failed to read input");
                return Err(e);
            }
        }

        let argv = match split_args(&String::from_utf8_lossy(&line)) {
            Ok(argv) => argv,
            Err(e) => {
                write_reply(&mut writer, &Reply::from(e)).await?;
                continue;
            }
        };

        let Some(name) = argv.first() else {
            continue;
        };
        if is_quit(name) {
            debug!("Quit requested");
            break;
        }

        let reply = handler.execute(&argv);
        executed += 1;
        write_reply(&mut writer, &reply).await?;
    }

    info!(commands = executed, "Shell session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageEngine;
    use std::sync::Arc;
    use tokio::io::BufReader;
    use tokio_test::io::Builder;

    fn create_handler() -> CommandHandler {
        CommandHandler::new(Arc::new(StorageEngine::new()))
    }

    fn args(values: &[&str]) -> Vec<Bytes> {
        values.iter().map(|v| Bytes::from(v.to_string())).collect()
    }

    #[test]
    fn test_split_plain_words() {
        assert_eq!(
            split_args("  SET  key value \r\n").unwrap(),
            args(&["SET", "key", "value"])
        );
        assert!(split_args("   \n").unwrap().is_empty());
    }

    #[test]
    fn test_split_quoted() {
        assert_eq!(
            split_args(r#"SET "my key" "say \"hi\"\n""#).unwrap(),
            args(&["SET", "my key", "say \"hi\"\n"])
        );
        assert_eq!(
            split_args("SET k 'a \"b\"'").unwrap(),
            args(&["SET", "k", "a \"b\""])
        );
        assert_eq!(split_args(r#"SET k """#).unwrap(), args(&["SET", "k", ""]));
    }

    #[test]
    fn test_split_unbalanced_quotes() {
        assert_eq!(split_args(r#"SET k "oops"#), Err(Error::UnbalancedQuotes));
        assert_eq!(split_args("SET k 'oops"), Err(Error::UnbalancedQuotes));
        assert_eq!(split_args(r#"SET k "trailing\"#), Err(Error::UnbalancedQuotes));
    }

    #[tokio::test]
    async fn test_session_set_get() {
        let handler = create_handler();
        let reader = Builder::new().read(b"SET k v\nGET k\nGET nope\n").build();
        let writer = Builder::new()
            .write(b"OK\n")
            .write(b"\"v\"\n")
            .write(b"(nil)\n")
            .build();

        run(&handler, BufReader::new(reader), writer, None)
            .await
            .unwrap();
        assert_eq!(handler.storage().len(), 1);
    }

    #[tokio::test]
    async fn test_session_errors_and_arrays() {
        let handler = create_handler();
        let reader = Builder::new()
            .read(b"RPUSH l a b\nLRANGE l 0 -1\nnope\nSET \"k\n")
            .build();
        let writer = Builder::new()
            .write(b"(integer) 2\n")
            .write(b"1) \"a\"\n2) \"b\"\n")
            .write(b"(error) ERR unknown command 'nope'\n")
            .write(b"(error) ERR unbalanced quotes in request\n")
            .build();

        run(&handler, BufReader::new(reader), writer, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let handler = create_handler();
        let reader = Builder::new().read(b"\nPING\nquit\nSET k v\n").build();
        let writer = Builder::new().write(b"PONG\n").build();

        run(&handler, BufReader::new(reader), writer, None)
            .await
            .unwrap();
        assert!(handler.storage().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_is_written_before_each_read() {
        let handler = create_handler();
        let reader = Builder::new().read(b"PING\n").build();
        let writer = Builder::new()
            .write(b"> ")
            .write(b"PONG\n")
            .write(b"> ")
            .build();

        run(&handler, BufReader::new(reader), writer, Some("> "))
            .await
            .unwrap();
    }
}
