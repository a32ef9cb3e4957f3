use std::collections::VecDeque;
use std::io::BufRead;

use crate::action::{InputEvent, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid command: {0}")]
    Parse(#[from] ParseError),
}

/// Input collaborator polled once per loop iteration.
pub trait InputSource {
    /// Zero or one event. `Ok(None)` means nothing happened this frame.
    fn poll_input(&mut self) -> Result<Option<InputEvent>, InputError>;
}

/// Pre-recorded events, delivered one per poll. Drained scripts yield `None`.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<Option<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().map(Some).collect(),
        }
    }

    /// Events with explicit empty frames, for scripts that skip polls.
    pub fn with_gaps(events: impl IntoIterator<Item = Option<InputEvent>>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Parse a `;`-separated list of commands.
    pub fn parse(script: &str) -> Result<Self, ParseError> {
        let events = script
            .split(';')
            .map(str::parse::<InputEvent>)
            .collect::<Result<Vec<InputEvent>, _>>()?;
        Ok(Self::new(events))
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_input(&mut self) -> Result<Option<InputEvent>, InputError> {
        Ok(self.events.pop_front().flatten())
    }
}

/// One textual command per line from any buffered reader.
///
/// Blocks on each read. End of input is reported as [`InputEvent::Quit`] so
/// the loop terminates when the stream closes.
pub struct LineInput<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }
}

impl<R: BufRead> InputSource for LineInput<R> {
    fn poll_input(&mut self) -> Result<Option<InputEvent>, InputError> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            tracing::debug!("input stream closed");
            return Ok(Some(InputEvent::Quit));
        }
        match self.line.parse::<InputEvent>()? {
            InputEvent::Wait => Ok(None),
            event => Ok(Some(event)),
        }
    }
}

/// Wraps a source and turns a run of consecutive errors into
/// [`InputEvent::Quit`].
///
/// Errors below the limit are passed through. Any successful poll resets the
/// count.
pub struct FailureLimit<S> {
    inner: S,
    limit: u32,
    consecutive: u32,
}

impl<S: InputSource> FailureLimit<S> {
    pub fn new(inner: S, limit: u32) -> Self {
        Self {
            inner,
            limit: limit.max(1),
            consecutive: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: InputSource> InputSource for FailureLimit<S> {
    fn poll_input(&mut self) -> Result<Option<InputEvent>, InputError> {
        match self.inner.poll_input() {
            Ok(event) => {
                self.consecutive = 0;
                Ok(event)
            }
            Err(e) => {
                self.consecutive += 1;
                if self.consecutive >= self.limit {
                    tracing::error!(failures = self.consecutive, "giving up on input: {e}");
                    return Ok(Some(InputEvent::Quit));
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    /// Reader whose every read fails.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("is a directory"))
        }
    }

    #[test]
    fn scripted_input_delivers_in_order_then_none() {
        let mut input = ScriptedInput::new([InputEvent::Move { dx: 1, dy: 0 }, InputEvent::Quit]);
        assert_eq!(
            input.poll_input().unwrap(),
            Some(InputEvent::Move { dx: 1, dy: 0 })
        );
        assert_eq!(input.poll_input().unwrap(), Some(InputEvent::Quit));
        assert_eq!(input.poll_input().unwrap(), None);
        assert_eq!(input.poll_input().unwrap(), None);
    }

    #[test]
    fn scripted_gaps_are_empty_frames() {
        let mut input = ScriptedInput::with_gaps([None, Some(InputEvent::Quit)]);
        assert_eq!(input.poll_input().unwrap(), None);
        assert_eq!(input.poll_input().unwrap(), Some(InputEvent::Quit));
    }

    #[test]
    fn scripted_parse() {
        let input = ScriptedInput::parse("d;d;spawn grass 1 1;q").unwrap();
        assert_eq!(input.remaining(), 4);
        assert!(ScriptedInput::parse("d;fly").is_err());
    }

    #[test]
    fn line_input_reads_commands() {
        let mut input = LineInput::new(Cursor::new("w\n\nmove 2 3\n"));
        assert_eq!(
            input.poll_input().unwrap(),
            Some(InputEvent::Move { dx: 0, dy: 1 })
        );
        assert_eq!(input.poll_input().unwrap(), None);
        assert_eq!(
            input.poll_input().unwrap(),
            Some(InputEvent::Move { dx: 2, dy: 3 })
        );
        assert_eq!(input.poll_input().unwrap(), Some(InputEvent::Quit));
    }

    #[test]
    fn line_input_reports_bad_commands() {
        let mut input = LineInput::new(Cursor::new("teleport\nq\n"));
        assert!(matches!(input.poll_input(), Err(InputError::Parse(_))));
        assert_eq!(input.poll_input().unwrap(), Some(InputEvent::Quit));
    }

    #[test]
    fn failure_limit_quits_after_consecutive_errors() {
        let mut input = FailureLimit::new(LineInput::new(io::BufReader::new(Broken)), 3);
        assert!(matches!(input.poll_input(), Err(InputError::Io(_))));
        assert!(matches!(input.poll_input(), Err(InputError::Io(_))));
        assert_eq!(input.poll_input().unwrap(), Some(InputEvent::Quit));
    }

    #[test]
    fn failure_limit_resets_on_success() {
        let mut input = FailureLimit::new(LineInput::new(Cursor::new("fly\nfly\nd\nfly\nq\n")), 3);
        assert!(input.poll_input().is_err());
        assert!(input.poll_input().is_err());
        assert_eq!(input.consecutive_failures(), 2);
        assert_eq!(
            input.poll_input().unwrap(),
            Some(InputEvent::Move { dx: 1, dy: 0 })
        );
        assert_eq!(input.consecutive_failures(), 0);
        assert!(input.poll_input().is_err());
        assert_eq!(input.poll_input().unwrap(), Some(InputEvent::Quit));
    }
}
