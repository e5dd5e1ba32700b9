//! Ticker actor: the clock behind every animation.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::tea::Message;
use crate::zlog_debug;

use super::ActorHandle;

/// Half a spin frame, so wheel frames land within 50ms of schedule.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Actor that sends `Message::Tick` with the current instant and local date.
pub struct TickerActor {
    msg_tx: mpsc::UnboundedSender<Message>,
    interval: Duration,
}

impl TickerActor {
    pub fn new(msg_tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            msg_tx,
            interval: TICK_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn spawn(self) -> ActorHandle {
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        zlog_debug!("TickerActor::spawn interval={:?}", self.interval);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            // A stalled logic thread should not get a burst of stale ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel_clone.cancelled() => {
                        zlog_debug!("TickerActor cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let tick = Message::Tick {
                            now: Instant::now(),
                            today: chrono::Local::now().date_naive(),
                        };
                        if self.msg_tx.send(tick).is_err() {
                            zlog_debug!("TickerActor: message channel closed");
                            break;
                        }
                    }
                }
            }
        });

        ActorHandle::new(cancel)
    }
}
