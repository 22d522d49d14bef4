use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Resize,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tick_rate: watch::Sender<Duration>,
    _task: tokio::task::JoinHandle<()>,
}

fn tick_interval(period: Duration) -> tokio::time::Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();
        let (rate_tx, mut rate_rx) = watch::channel(tick_rate);

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut ticks = tick_interval(tick_rate);

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    _ = ticks.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    changed = rate_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // The new cadence starts from now.
                        let period = *rate_rx.borrow_and_update();
                        ticks = tick_interval(period);
                    }
                }
            }
        });

        Self {
            rx,
            tick_rate: rate_tx,
            _task: task,
        }
    }

    pub fn set_tick_rate(&self, tick_rate: Duration) {
        self.tick_rate.send_if_modified(|current| {
            if *current == tick_rate {
                return false;
            }
            *current = tick_rate;
            true
        });
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
