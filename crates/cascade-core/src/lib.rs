//! **cascade-core**: grid-cell primitives for the *cascade* menu engine.
//!
//! Geometry in integer cells, styled cells, a shared-buffer grid with frame
//! diffing, input messages, and the Model/Driver application loop that hosts
//! menus in a terminal.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::{Point, Range};
pub use grid::Grid;
pub use messages::*;
pub use style::{AttrMask, Color, Style};
