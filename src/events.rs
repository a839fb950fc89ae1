use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use crate::geo::Position;
use crate::proximity::PositionSource;

pub enum Event {
    Fix(Position),
    Closed,
}

/// Turns lines of text into position fix events. Blank lines and lines
/// starting with `#` are ignored, malformed lines are logged and skipped.
fn forward_fixes<R: BufRead>(reader: R, tx: &mpsc::Sender<Event>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Could not read position input: {}", e);
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.parse::<Position>() {
            Ok(fix) => {
                if tx.send(Event::Fix(fix)).is_err() {
                    return;
                }
            }
            Err(e) => log::warn!("Skipping position '{}': {}", trimmed, e),
        }
    }

    let _ = tx.send(Event::Closed);
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    /// Reads fixes from stdin on a background thread.
    pub fn from_stdin() -> io::Result<Dispatcher> {
        Dispatcher::from_reader(|| io::stdin().lock())
    }

    pub fn from_reader<F, R>(open: F) -> io::Result<Dispatcher>
    where
        F: FnOnce() -> R + Send + 'static,
        R: BufRead,
    {
        let (tx, rx) = mpsc::channel();
        let input_handle = thread::Builder::new()
            .name("tipsy-position-input".to_owned())
            .spawn(move || forward_fixes(open(), &tx))?;

        Ok(Dispatcher {
            rx,
            _input_handle: input_handle,
        })
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

impl PositionSource for Dispatcher {
    fn next_fix(&mut self) -> Option<Position> {
        match self.next() {
            Ok(Event::Fix(fix)) => Some(fix),
            Ok(Event::Closed) | Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn dispatcher_yields_parsed_fixes() {
        let input = "# bar crawl\n37.867993,-122.259592\n\nnot a fix\n37.9 -122.3\n";
        let mut dispatcher = Dispatcher::from_reader(move || Cursor::new(input)).unwrap();

        assert_eq!(
            dispatcher.next_fix(),
            Some(Position::new(37.867993, -122.259592).unwrap())
        );
        assert_eq!(
            dispatcher.next_fix(),
            Some(Position::new(37.9, -122.3).unwrap())
        );
        assert_eq!(dispatcher.next_fix(), None);
    }
}
