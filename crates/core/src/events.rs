//! Outbound notifications for the presentation layer
//!
//! Every event is emitted after the core state it describes is final, so a
//! listener can animate toward a state it already knows the end of. Delivery
//! is fire-and-forget: events go to each subscribed sink and into an outbox
//! the driver drains at its own pace. The outbox is bounded; a driver that
//! never drains loses the oldest events, never memory.

use std::collections::VecDeque;

use serde::Serialize;

use crate::types::{Coord, OccupantId, PieceKind, Rotation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum GameEvent {
    GameStarted,
    PieceSpawned {
        kind: PieceKind,
        origin: Coord,
    },
    PieceMoved {
        from: Coord,
        to: Coord,
    },
    PieceRotated {
        rotation: Rotation,
    },
    PieceLanded {
        cells: Vec<Coord>,
    },
    RowsCleared {
        rows: Vec<i32>,
        cells: Vec<(Coord, OccupantId)>,
    },
    ScoreChanged {
        score: u32,
        delta: u32,
    },
    LevelChanged {
        level: u32,
    },
    GamePaused {
        paused: bool,
    },
    GameOver {
        score: u32,
    },
}

/// Receiver of game events
pub trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GameEvent),
{
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Undrained events kept before the oldest are discarded
pub const OUTBOX_CAPACITY: usize = 4096;

/// Subscribers plus the undrained outbox
pub struct EventBus {
    sinks: Vec<(SubscriptionId, Box<dyn EventSink>)>,
    next_id: u64,
    outbox: VecDeque<GameEvent>,
    capacity: usize,
    /// Events discarded since the last drain
    dropped: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(OUTBOX_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sinks: Vec::new(),
            next_id: 0,
            outbox: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.sinks.push((id, sink));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sid, _)| *sid != id);
        self.sinks.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn emit(&mut self, event: GameEvent) {
        for (_, sink) in &mut self.sinks {
            sink.notify(&event);
        }
        if self.outbox.len() == self.capacity {
            if self.dropped == 0 {
                log::warn!(
                    "event outbox full ({} events), discarding oldest until drained",
                    self.capacity
                );
            }
            self.outbox.pop_front();
            self.dropped += 1;
        }
        self.outbox.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.dropped = 0;
        self.outbox.drain(..).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &GameEvent> + '_ {
        self.outbox.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.outbox.len()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.sinks.len())
            .field("outbox", &self.outbox.len())
            .field("dropped", &self.dropped)
            .finish()
    }
}
