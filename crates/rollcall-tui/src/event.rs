//! Terminal input plus the board's two clocks.
//!
//! A background task merges crossterm input with a throbber tick and a
//! redraw clock into one channel of [`Event`]s.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New terminal size (cols, rows).
    Resize(u16, u16),
    /// Advances the loading throbber.
    Tick,
    Render,
}

/// How often the reader emits [`Event::Tick`] and [`Event::Render`].
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    pub tick: Duration,
    pub render: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            render: Duration::from_millis(33),
        }
    }
}

/// Map a raw terminal event to a board event. Key releases and repeats,
/// mouse, focus and paste events are dropped.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Owns the input task. Dropping the reader stops it.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn spawn(cadence: Cadence) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cadence, cancel.clone()));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the input task has ended.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(tx: mpsc::UnboundedSender<Event>, cadence: Cadence, cancel: CancellationToken) {
    let mut input = EventStream::new();
    let mut tick = clock(cadence.tick);
    let mut render = clock(cadence.render);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => return,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            raw = input.next() => match raw {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "terminal input error");
                    continue;
                }
                None => return,
            },
        };

        if tx.send(event).is_err() {
            return;
        }
    }
}
