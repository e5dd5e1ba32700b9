use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use crossterm::event::{self, Event};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::actors::{ActorHandle, TickerActor};
use crate::config::Config;
use crate::render::RenderState;
use crate::store::Store;
use crate::tea::{update, Command, Message, Model};
use crate::tone::{TonePlayer, KNOCK};
use crate::util::blocking;
use crate::{fish, food};
use crate::{zlog_debug, zlog_error, zlog_warn, Result};

const MAX_BG_MESSAGES: usize = 50;

pub struct LogicThread;

impl LogicThread {
    pub fn run(
        config: Config,
        store: Store,
        player: Box<dyn TonePlayer>,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        Runtime::new()?.block_on(Self::run_async(config, store, player, state_tx, shutdown))
    }

    async fn run_async(
        config: Config,
        store: Store,
        mut player: Box<dyn TonePlayer>,
        state_tx: Sender<RenderState>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()> {
        zlog_debug!(
            "LogicThread::run_async dark_mode={} sound={} store={}",
            config.dark_mode,
            config.sound,
            store.dir().display()
        );
        let mut model = Model::load(&config, &store);
        zlog_debug!(
            "Model loaded: {} foods, merit={}",
            model.food.foods().len(),
            model.fish.merit()
        );

        let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Message>();
        let actors = spawn_actors(msg_tx.clone());

        flush_state(&state_tx, &mut model);

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            // Keyboard input (priority)
            while event::poll(Duration::ZERO)? {
                let msg = match event::read()? {
                    Event::Key(key) => Message::Key(key),
                    Event::Resize(w, h) => Message::Resize(w, h),
                    _ => continue,
                };

                for cmd in update(&mut model, msg) {
                    if execute_command(cmd, &store, player.as_mut(), &msg_tx).await {
                        shutdown.store(true, Ordering::Relaxed);
                        shutdown_actors(&actors);
                        save_state_sync(&model, &store);
                        return Ok(());
                    }
                }
            }

            // Background messages (bounded)
            for _ in 0..MAX_BG_MESSAGES {
                let Ok(msg) = msg_rx.try_recv() else { break };
                for cmd in update(&mut model, msg) {
                    if execute_command(cmd, &store, player.as_mut(), &msg_tx).await {
                        shutdown.store(true, Ordering::Relaxed);
                        shutdown_actors(&actors);
                        save_state_sync(&model, &store);
                        return Ok(());
                    }
                }
            }

            // One snapshot per pass, after every pending key is applied
            flush_state(&state_tx, &mut model);

            tokio::time::sleep(Duration::from_micros(500)).await;
        }

        shutdown_actors(&actors);
        save_state_sync(&model, &store);
        Ok(())
    }
}

/// Run one side effect. Returns true when the app should quit.
///
/// Saves are awaited in order so two writes of the same key never race on
/// the temp file.
pub async fn execute_command(
    cmd: Command,
    store: &Store,
    player: &mut dyn TonePlayer,
    msg_tx: &mpsc::UnboundedSender<Message>,
) -> bool {
    match cmd {
        Command::SaveFood(blob) => {
            zlog_debug!(
                "Command::SaveFood foods={:?} history={:?}",
                blob.foods.as_ref().map(Vec::len),
                blob.history.as_ref().map(Vec::len)
            );
            let store = store.clone();
            let result = blocking(move || store.save(food::STORE_KEY, &blob)).await;
            report_save(food::STORE_KEY, result, msg_tx);
        }

        Command::SaveFish(blob) => {
            zlog_debug!("Command::SaveFish merit={:?}", blob.merit);
            let store = store.clone();
            let result = blocking(move || store.save(fish::STORE_KEY, &blob)).await;
            report_save(fish::STORE_KEY, result, msg_tx);
        }

        Command::PlayTone => {
            if let Err(e) = player.play(&KNOCK) {
                zlog_warn!("Tone playback failed: {}", e);
            }
        }

        Command::Quit => {
            zlog_debug!("Command::Quit");
            return true;
        }
    }

    false
}

fn report_save(key: &'static str, result: Result<()>, msg_tx: &mpsc::UnboundedSender<Message>) {
    let msg = match result {
        Ok(()) => Message::Saved(key),
        Err(e) => {
            zlog_error!("Save failed key={}: {}", key, e);
            Message::SaveFailed(key, e.to_string())
        }
    };
    let _ = msg_tx.send(msg);
}

/// Send a snapshot if anything changed. While the render thread has not yet
/// taken the previous one, `dirty` stays set and a later pass retries with
/// the newer state. Returns true if a snapshot went out.
fn flush_state(state_tx: &Sender<RenderState>, model: &mut Model) -> bool {
    if !model.dirty {
        return false;
    }
    match state_tx.try_send(model.snapshot()) {
        Ok(()) => {
            model.dirty = false;
            true
        }
        Err(_) => false,
    }
}

/// Flush both widgets before exit.
pub fn save_state_sync(model: &Model, store: &Store) {
    if let Err(e) = store.save(food::STORE_KEY, &model.food.to_blob()) {
        zlog_error!("Final save failed key={}: {}", food::STORE_KEY, e);
    }
    if let Err(e) = store.save(fish::STORE_KEY, &model.fish.to_blob()) {
        zlog_error!("Final save failed key={}: {}", fish::STORE_KEY, e);
    }
}

fn spawn_actors(msg_tx: mpsc::UnboundedSender<Message>) -> Vec<ActorHandle> {
    zlog_debug!("Spawning actors");
    vec![TickerActor::new(msg_tx).spawn()]
}

fn shutdown_actors(actors: &[ActorHandle]) {
    zlog_debug!("Shutting down {} actors", actors.len());
    for actor in actors {
        actor.shutdown();
    }
}
