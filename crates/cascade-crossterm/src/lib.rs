//! Crossterm terminal driver for cascade.
//!
//! Provides a [`CrosstermDriver`] that implements [`cascade_core::Driver`],
//! turning terminal input into [`Msg`]s and painting [`Frame`]s with
//! crossterm.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{self, Attribute, Color as CtColor, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use cascade_core::{
    Point,
    app::{Context, Driver},
    grid::Frame,
    messages::{Key, ModMask, MouseAction, Msg},
    style::{AttrMask, Color},
};

/// Current terminal size in cells, as `(width, height)`.
pub fn terminal_size() -> io::Result<Point> {
    let (w, h) = terminal::size()?;
    Ok(Point::new(w as i32, h as i32))
}

fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        CtColor::Rgb {
            r: c.r(),
            g: c.g(),
            b: c.b(),
        }
    }
}

fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    m
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::PageUp => Some(Key::PageUp),
        KeyCode::PageDown => Some(Key::PageDown),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

fn to_mouse_action(kind: MouseEventKind) -> Option<MouseAction> {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(MouseAction::Main),
        MouseEventKind::Down(MouseButton::Right) => Some(MouseAction::Secondary),
        MouseEventKind::Down(MouseButton::Middle) => Some(MouseAction::Auxiliary),
        MouseEventKind::Up(_) => Some(MouseAction::Release),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(MouseAction::Move),
        MouseEventKind::ScrollUp => Some(MouseAction::WheelUp),
        MouseEventKind::ScrollDown => Some(MouseAction::WheelDown),
        _ => None,
    }
}

/// Translate one crossterm event. Key releases and unmapped input yield
/// `None`.
fn to_msg(ev: Event) -> Option<Msg> {
    let time = Instant::now();
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if kind != KeyEventKind::Release => to_key(code).map(|key| Msg::KeyDown {
            key,
            modifiers: to_mod_mask(modifiers),
            time,
        }),
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers,
        }) => to_mouse_action(kind).map(|action| Msg::Mouse {
            action,
            pos: Point::new(column as i32, row as i32),
            modifiers: to_mod_mask(modifiers),
            time,
        }),
        Event::Resize(w, h) => Some(Msg::Screen {
            width: w as i32,
            height: h as i32,
            time,
        }),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    poll_timeout: Duration,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            poll_timeout: Duration::from_millis(16),
        }
    }

    /// Configure whether mouse events are captured. Menus need them for
    /// hover and clicks.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// How long [`Driver::poll_msgs`] waits for the first event.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        log::debug!("crossterm: terminal initialised (mouse: {})", self.mouse_enabled);
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: &Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if !event::poll(self.poll_timeout)? {
            return Ok(());
        }
        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }
            if let Some(msg) = to_msg(event::read()?) {
                log::trace!("crossterm: {msg:?}");
                tx.send(msg).ok();
            }
        }
        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout().lock();
        for fc in &frame.cells {
            let (p, cell) = (fc.pos, &fc.cell);
            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;

            let attrs = cell.style.attrs;
            for (mask, attr) in [
                (AttrMask::BOLD, Attribute::Bold),
                (AttrMask::ITALIC, Attribute::Italic),
                (AttrMask::UNDERLINE, Attribute::Underlined),
                (AttrMask::REVERSE, Attribute::Reverse),
                (AttrMask::DIM, Attribute::Dim),
            ] {
                if attrs.contains(mask) {
                    queue!(stdout, style::SetAttribute(attr))?;
                }
            }

            queue!(stdout, Print(cell.ch))?;

            if attrs != AttrMask::NONE {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, style::ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        log::debug!("crossterm: terminal restored");
    }
}
