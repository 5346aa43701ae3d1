//! Line-oriented user input shared by the REPL prompt and commands that
//! read more than one line.

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::Mutex;

/// A source of input lines. The REPL reads its prompt through one and
/// hands the same source to commands, so no line is buffered twice.
#[async_trait]
pub trait LineSource: Send {
    /// The next line without its terminator, or `None` at end of input.
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// The REPL's input, locked by whoever is reading.
pub type SharedInput = Mutex<Box<dyn LineSource>>;

#[async_trait]
impl<R> LineSource for Lines<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Lines::next_line(self).await
    }
}
