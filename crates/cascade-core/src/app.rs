//! The application loop: [`Model`], [`Driver`], [`Effect`], [`App`].
//!
//! One message is fully handled (update, then draw) before the next one is
//! taken from the queue; nothing in the loop runs concurrently with the
//! model.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::grid::{Frame, Grid, compute_frame};
use crate::messages::Msg;

/// Cooperative stop flag shared between the loop and its driver.
#[derive(Clone, Debug, Default)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// Run a command; a returned message is queued for the model.
    Cmd(Box<dyn FnOnce() -> Option<Msg>>),
    Batch(Vec<Effect>),
    /// Stop the loop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// The application model (Elm architecture).
pub trait Model {
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`, which covers the whole screen.
    fn draw(&self, grid: &mut Grid);
}

/// Back-end that produces input and displays frames.
pub trait Driver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Push any pending input into `tx`, waiting at most a short while.
    /// Should return promptly once `ctx.is_done()`.
    fn poll_msgs(&mut self, ctx: &Context, tx: &Sender<Msg>)
    -> Result<(), Box<dyn std::error::Error>>;

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Restore the terminal. Called on every exit path.
    fn close(&mut self);
}

pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// Runs a [`Model`] against a [`Driver`].
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    prev: Grid,
    curr: Grid,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            prev: Grid::new(config.width, config.height),
            curr: Grid::new(config.width, config.height),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Poll, update, draw, diff and flush until the model returns
    /// [`Effect::End`] or a [`Msg::Quit`] arrives.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.run_loop();
        self.driver.close();
        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        while !ctx.is_done() {
            self.process_pending(&rx, &tx, &ctx)?;
            if ctx.is_done() {
                break;
            }
            self.driver.poll_msgs(&ctx, &tx)?;
        }
        Ok(())
    }

    /// Drain queued messages through the model, then redraw once.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        tx: &Sender<Msg>,
        ctx: &Context,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut dirty = false;
        while let Ok(msg) = rx.try_recv() {
            match msg {
                Msg::Quit => {
                    ctx.cancel();
                    return Ok(());
                }
                Msg::Screen { width, height, .. } if self.curr.size().x != width
                    || self.curr.size().y != height =>
                {
                    log::debug!("app: resizing grids to {width}x{height}");
                    self.prev = Grid::new(0, 0);
                    self.curr = Grid::new(width, height);
                }
                _ => {}
            }
            if let Some(effect) = self.model.update(msg) {
                if handle_effect(effect, tx, ctx) {
                    return Ok(());
                }
            }
            dirty = true;
        }

        if dirty {
            self.model.draw(&mut self.curr);
            let frame = compute_frame(&self.prev, &self.curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            if self.prev.size() != self.curr.size() {
                self.prev = Grid::new(self.curr.width(), self.curr.height());
            }
            self.prev.copy_from(&self.curr);
        }
        Ok(())
    }
}

/// Returns `true` if the loop should stop.
fn handle_effect(effect: Effect, tx: &Sender<Msg>, ctx: &Context) -> bool {
    match effect {
        Effect::End => {
            ctx.cancel();
            true
        }
        Effect::Cmd(f) => {
            if let Some(msg) = f() {
                tx.send(msg).ok();
            }
            false
        }
        Effect::Batch(effects) => effects.into_iter().any(|e| handle_effect(e, tx, ctx)),
    }
}
