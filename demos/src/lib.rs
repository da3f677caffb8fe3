//! A small system monitor with two panels, CPU and memory. Right-clicking a
//! panel (or pressing `c` / `m`) opens that panel's nested context menu;
//! menu actions change what the panel shows.
//!
//! The figures are fixed sample numbers.

mod panel;

use std::cell::RefCell;
use std::rc::Rc;

use cascade_core::{
    Cell, Color, Grid, Point, Range, Style,
    app::{Effect, Model},
    messages::{Key, MouseAction, Msg},
};
use cascade_menu::{ActionTable, ContextMenu, ContextMenuConfig, MenuError, MenuSpec, NodeId};
use serde_json::json;

use panel::{draw_bar, draw_border, draw_text};

pub const WIDTH: i32 = 80;
pub const HEIGHT: i32 = 24;

const COL_BG: Color = Color::from_rgb(0x07, 0x15, 0x1e);
const COL_TEXT: Color = Color::from_rgb(0xdd, 0xdd, 0xdd);
const COL_BORDER: Color = Color::from_rgb(0x4e, 0x6e, 0x81);
const COL_BAR: Color = Color::from_rgb(0x3d, 0xc6, 0x8f);
const COL_BAR_EMPTY: Color = Color::from_rgb(0x2a, 0x3a, 0x44);
const COL_STATUS: Color = Color::from_rgb(0x9a, 0xa8, 0xb0);

/// CPU time fields and their sample percentages.
pub const CPU_FIELDS: [(&str, f32); 6] = [
    ("total", 23.5),
    ("user", 14.2),
    ("nice", 0.4),
    ("system", 7.1),
    ("idle", 76.5),
    ("iowait", 1.8),
];

/// Sample memory figures: name, used bytes, total bytes.
const MEMORY: [(&str, u64, u64); 2] = [
    ("virtual", 6_234_112_000, 16_777_216_000),
    ("swap", 512_000_000, 4_294_967_296),
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Bytes,
    KiB,
    MiB,
    GiB,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Bytes, Unit::KiB, Unit::MiB, Unit::GiB];

    pub fn label(self) -> &'static str {
        match self {
            Unit::Bytes => "B",
            Unit::KiB => "KiB",
            Unit::MiB => "MiB",
            Unit::GiB => "GiB",
        }
    }

    pub fn format(self, bytes: u64) -> String {
        let div = match self {
            Unit::Bytes => return format!("{bytes} B"),
            Unit::KiB => 1024f64,
            Unit::MiB => 1024f64.powi(2),
            Unit::GiB => 1024f64.powi(3),
        };
        format!("{:.1} {}", bytes as f64 / div, self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    Cpu,
    Memory,
}

/// Settings changed by menu actions.
#[derive(Clone, Debug)]
pub struct Settings {
    pub top_spark: String,
    pub bottom_spark: String,
    pub unit: Unit,
    pub refresh_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_spark: "total".into(),
            bottom_spark: "total".into(),
            unit: Unit::GiB,
            refresh_secs: 1,
        }
    }
}

pub struct Monitor {
    size: Point,
    settings: Rc<RefCell<Settings>>,
    cpu_menu: ContextMenu,
    mem_menu: ContextMenu,
    status: String,
}

impl Monitor {
    pub fn new(size: Point) -> Result<Self, MenuError> {
        let settings = Rc::new(RefCell::new(Settings::default()));
        let cpu_menu = ContextMenu::new(ContextMenuConfig::new(cpu_spec(&settings)))?;
        let mut mem_menu = ContextMenu::new(ContextMenuConfig::new(memory_spec(&settings)?))?;
        if let Some((node, index)) = find_item(&mem_menu, &["Refresh", "Live"]) {
            mem_menu.set_disabled(node, index, true);
        }
        Ok(Self {
            size,
            settings,
            cpu_menu,
            mem_menu,
            status: String::new(),
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings.borrow().clone()
    }

    pub fn menu(&self, panel: Panel) -> &ContextMenu {
        match panel {
            Panel::Cpu => &self.cpu_menu,
            Panel::Memory => &self.mem_menu,
        }
    }

    fn menu_mut(&mut self, panel: Panel) -> &mut ContextMenu {
        match panel {
            Panel::Cpu => &mut self.cpu_menu,
            Panel::Memory => &mut self.mem_menu,
        }
    }

    /// The panel whose menu is open, if any.
    pub fn open_panel(&self) -> Option<Panel> {
        [Panel::Cpu, Panel::Memory]
            .into_iter()
            .find(|&p| self.menu(p).is_open())
    }

    /// Screen area of `panel`. The last row is the status line.
    pub fn panel_rect(&self, panel: Panel) -> Range {
        let split = (self.size.y - 1) / 2;
        match panel {
            Panel::Cpu => Range::new(0, 0, self.size.x, split),
            Panel::Memory => Range::new(0, split, self.size.x, self.size.y - 1),
        }
    }

    fn panel_at(&self, p: Point) -> Option<Panel> {
        [Panel::Cpu, Panel::Memory]
            .into_iter()
            .find(|&panel| self.panel_rect(panel).contains(p))
    }

    fn open_menu(&mut self, panel: Panel, at: Point) {
        for other in [Panel::Cpu, Panel::Memory] {
            if other != panel {
                self.menu_mut(other).close();
            }
        }
        let size = self.size;
        self.menu_mut(panel).open(at, size);
        log::debug!("monitor: {panel:?} menu opened at {at}");
    }

    /// Give `msg` to the open menu. Returns `true` if the host must not
    /// handle it any further.
    fn route_to_menu(&mut self, panel: Panel, msg: &Msg) -> bool {
        match self.menu_mut(panel).update(msg) {
            Ok(true) => {
                self.status.clear();
                return true;
            }
            Ok(false) => {}
            Err(e) => {
                log::warn!("monitor: {panel:?} menu: {e}");
                self.status = e.to_string();
                return true;
            }
        }
        if !self.menu(panel).is_open() {
            return false;
        }
        match msg {
            Msg::KeyDown { key: Key::Escape, .. } => {
                self.menu_mut(panel).close();
                true
            }
            // an open menu keeps keys from reaching the panels
            Msg::KeyDown { .. } => true,
            _ => false,
        }
    }

    fn draw_cpu(&self, grid: &Grid) {
        let border = Style::default().with_fg(COL_BORDER).with_bg(COL_BG);
        let inner = grid.slice(draw_border(grid, "cpu", border));
        let settings = self.settings.borrow();
        let rows = [("top", &settings.top_spark), ("bottom", &settings.bottom_spark)];
        for (y, (which, field)) in rows.into_iter().enumerate() {
            let value = cpu_value(field);
            let label = format!("{which:<7}{field:<7}{value:>5.1}% ");
            self.draw_gauge(&inner, y as i32 * 2, &label, value);
        }
    }

    fn draw_memory(&self, grid: &Grid) {
        let border = Style::default().with_fg(COL_BORDER).with_bg(COL_BG);
        let inner = grid.slice(draw_border(grid, "memory", border));
        let settings = self.settings.borrow();
        for (y, (name, used, total)) in MEMORY.into_iter().enumerate() {
            let label = format!(
                "{name:<8}{:>10} / {:<10} ",
                settings.unit.format(used),
                settings.unit.format(total)
            );
            let percent = used as f32 * 100.0 / total as f32;
            self.draw_gauge(&inner, y as i32 * 2, &label, percent);
        }
        let refresh = format!("refresh every {} s", settings.refresh_secs);
        let text = Style::default().with_fg(COL_STATUS).with_bg(COL_BG);
        draw_text(&inner, Point::new(0, 4), &refresh, text);
    }

    fn draw_gauge(&self, grid: &Grid, y: i32, label: &str, percent: f32) {
        let text = Style::default().with_fg(COL_TEXT).with_bg(COL_BG);
        let x = draw_text(grid, Point::new(0, y), label, text);
        let fill = Style::default().with_fg(COL_BAR).with_bg(COL_BG);
        let empty = Style::default().with_fg(COL_BAR_EMPTY).with_bg(COL_BG);
        draw_bar(grid, Point::new(x, y), grid.width() - x, percent, fill, empty);
    }
}

fn cpu_value(field: &str) -> f32 {
    CPU_FIELDS
        .iter()
        .find(|(f, _)| *f == field)
        .map_or(0.0, |&(_, v)| v)
}

/// `{"Top Spark": {fields…}, "Bottom Spark": {fields…}}`.
fn cpu_spec(settings: &Rc<RefCell<Settings>>) -> MenuSpec {
    let fields = |top: bool| {
        CPU_FIELDS.iter().fold(MenuSpec::new(), |spec, &(field, _)| {
            let settings = Rc::clone(settings);
            spec.action(field, move || {
                let mut s = settings.borrow_mut();
                let slot = if top {
                    &mut s.top_spark
                } else {
                    &mut s.bottom_spark
                };
                *slot = field.to_string();
                Ok(())
            })
        })
    };
    MenuSpec::new()
        .submenu("Top Spark", fields(true))
        .submenu("Bottom Spark", fields(false))
}

/// The memory menu is declared in JSON against a table of named actions.
fn memory_spec(settings: &Rc<RefCell<Settings>>) -> Result<MenuSpec, MenuError> {
    let mut actions = ActionTable::new();
    for unit in Unit::ALL {
        let settings = Rc::clone(settings);
        actions.register(format!("unit-{}", unit.label()), move || {
            settings.borrow_mut().unit = unit;
            Ok(())
        });
    }
    for secs in [1, 2, 5] {
        let settings = Rc::clone(settings);
        actions.register(format!("every-{secs}"), move || {
            settings.borrow_mut().refresh_secs = secs;
            Ok(())
        });
    }
    actions.register("live", || Err("live refresh needs a system probe".into()));

    let spec = json!({
        "Units": {
            "B": "unit-B",
            "KiB": "unit-KiB",
            "MiB": "unit-MiB",
            "GiB": "unit-GiB",
        },
        "Refresh": {
            "Interval": {
                "1 s": "every-1",
                "2 s": "every-2",
                "5 s": "every-5",
            },
            "Live": "live",
        },
    });
    MenuSpec::from_json(&spec, &actions)
}

/// Follow `path` of labels from the root to an item.
fn find_item(menu: &ContextMenu, path: &[&str]) -> Option<(NodeId, usize)> {
    let tree = menu.tree();
    let mut node = menu.root();
    let (last, init) = path.split_last()?;
    for label in init {
        let item = tree.node(node).items().iter().find(|it| it.label() == *label)?;
        node = item.submenu()?;
    }
    let index = tree
        .node(node)
        .items()
        .iter()
        .position(|it| it.label() == *last)?;
    Some((node, index))
}

impl Model for Monitor {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        if let Msg::Screen { width, height, .. } = msg {
            self.size = Point::new(width, height);
            self.cpu_menu.set_viewport(self.size);
            self.mem_menu.set_viewport(self.size);
            return None;
        }

        if let Some(panel) = self.open_panel() {
            if self.route_to_menu(panel, &msg) {
                return None;
            }
        }

        match msg {
            Msg::Quit | Msg::KeyDown { key: Key::Char('q'), .. } => Some(Effect::End),
            Msg::KeyDown { key: Key::Char('c'), .. } => {
                let at = self.panel_rect(Panel::Cpu).min.shift(2, 1);
                self.open_menu(Panel::Cpu, at);
                None
            }
            Msg::KeyDown { key: Key::Char('m'), .. } => {
                let at = self.panel_rect(Panel::Memory).min.shift(2, 1);
                self.open_menu(Panel::Memory, at);
                None
            }
            Msg::Mouse {
                action: MouseAction::Secondary,
                pos,
                ..
            } => {
                if let Some(panel) = self.panel_at(pos) {
                    self.open_menu(panel, pos);
                }
                None
            }
            _ => None,
        }
    }

    fn draw(&self, grid: &mut Grid) {
        grid.fill(Cell::new(' ', Style::default().with_fg(COL_TEXT).with_bg(COL_BG)));
        self.draw_cpu(&grid.slice(self.panel_rect(Panel::Cpu)));
        self.draw_memory(&grid.slice(self.panel_rect(Panel::Memory)));

        let status = if self.status.is_empty() {
            "right-click a panel or press c/m for its menu, Esc closes, q quits"
        } else {
            self.status.as_str()
        };
        let line = grid.slice(Range::new(0, self.size.y - 1, self.size.x, self.size.y));
        draw_text(&line, Point::new(1, 0), status, Style::default().with_fg(COL_STATUS).with_bg(COL_BG));

        self.cpu_menu.draw(grid);
        self.mem_menu.draw(grid);
    }
}
