use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::{sync::mpsc, time::interval};

use crate::layout::{LayoutEvent, LifecycleSink};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickFrame,
    Input(Event),
    /// Lifecycle event of the run started as `generation`.
    Layout {
        generation: u64,
        event: LayoutEvent,
    },
    Quit,
}

/// Forwards run events into the app loop, tagged with the run generation so
/// events from a cancelled run can be told apart.
#[derive(Debug, Clone)]
pub struct LayoutForwarder {
    generation: u64,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl LayoutForwarder {
    #[must_use]
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { generation, tx }
    }
}

impl LifecycleSink for LayoutForwarder {
    fn notify(&mut self, event: LayoutEvent) {
        let _ = self.tx.send(AppEvent::Layout {
            generation: self.generation,
            event,
        });
    }
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn start_frame_task(tx: mpsc::Sender<AppEvent>, fps: u8) {
    let fps = fps.clamp(15, 60);
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        loop {
            ticker.tick().await;
            if tx.send(AppEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarder_tags_events_with_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = LayoutForwarder::new(3, tx);
        sink.notify(LayoutEvent::Start);
        match rx.try_recv() {
            Ok(AppEvent::Layout { generation, event }) => {
                assert_eq!(generation, 3);
                assert_eq!(event, LayoutEvent::Start);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn forwarder_ignores_closed_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = LayoutForwarder::new(0, tx);
        sink.notify(LayoutEvent::Stop);
    }
}
