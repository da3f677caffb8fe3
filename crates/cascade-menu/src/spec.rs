//! Declarative menu descriptions.
//!
//! A [`MenuSpec`] is an ordered map from labels to entries. Each entry is an
//! action (a leaf), a nested spec (a submenu), or inert. Specs can be written
//! in Rust with the builder methods or loaded from JSON with
//! [`MenuSpec::from_json`], where strings name actions registered in an
//! [`ActionTable`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::MenuError;

pub type ActionError = Box<dyn std::error::Error + Send + Sync>;
pub type ActionResult = Result<(), ActionError>;

/// A leaf callback. Shared so that one action can back several items.
pub type Action = Rc<dyn Fn() -> ActionResult>;

/// What a label leads to.
#[derive(Clone)]
pub enum EntryKind {
    Action(Action),
    Submenu(MenuSpec),
    /// Selectable, but activating it does nothing.
    Inert,
}

impl fmt::Debug for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(_) => f.write_str("Action(..)"),
            Self::Submenu(spec) => f.debug_tuple("Submenu").field(spec).finish(),
            Self::Inert => f.write_str("Inert"),
        }
    }
}

/// One labelled row of a menu level.
#[derive(Clone, Debug)]
pub struct Entry {
    /// Text shown in the row, unique within its level.
    pub label: String,
    pub kind: EntryKind,
    /// Drawn dimmed, skipped by navigation and never activated.
    pub disabled: bool,
}

/// An ordered label → entry map describing one menu level.
#[derive(Clone, Debug, Default)]
pub struct MenuSpec {
    entries: Vec<Entry>,
}

impl MenuSpec {
    /// An empty level. Building a tree from it fails until items are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf that runs `f` when activated.
    pub fn action<F>(self, label: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> ActionResult + 'static,
    {
        self.insert(label.into(), EntryKind::Action(Rc::new(f)))
    }

    /// Add a leaf backed by an already shared action.
    pub fn shared_action(self, label: impl Into<String>, action: Action) -> Self {
        self.insert(label.into(), EntryKind::Action(action))
    }

    /// Add an item that opens `spec` as a nested menu.
    pub fn submenu(self, label: impl Into<String>, spec: MenuSpec) -> Self {
        self.insert(label.into(), EntryKind::Submenu(spec))
    }

    /// Add an item with neither action nor submenu.
    pub fn inert(self, label: impl Into<String>) -> Self {
        self.insert(label.into(), EntryKind::Inert)
    }

    /// Mark the entry named `label` as disabled. Unknown labels are ignored.
    pub fn disable(mut self, label: &str) -> Self {
        if let Some(e) = self.entries.iter_mut().find(|e| e.label == label) {
            e.disabled = true;
        }
        self
    }

    /// Map semantics: an existing label keeps its position and gets the new
    /// value, enabled again.
    fn insert(mut self, label: String, kind: EntryKind) -> Self {
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(e) => {
                e.kind = kind;
                e.disabled = false;
            }
            None => self.entries.push(Entry {
                label,
                kind,
                disabled: false,
            }),
        }
        self
    }

    /// Entries in menu order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry as `(label path, is_leaf)`, depth-first, each submenu
    /// label listed before its contents.
    pub fn shape(&self) -> Vec<(Vec<String>, bool)> {
        let mut out = Vec::new();
        self.collect_shape(&mut Vec::new(), &mut out);
        out
    }

    fn collect_shape(&self, path: &mut Vec<String>, out: &mut Vec<(Vec<String>, bool)>) {
        for e in &self.entries {
            path.push(e.label.clone());
            match &e.kind {
                EntryKind::Submenu(spec) => {
                    out.push((path.clone(), false));
                    spec.collect_shape(path, out);
                }
                _ => out.push((path.clone(), true)),
            }
            path.pop();
        }
    }

    /// Load a spec from JSON: objects are submenus (key order is kept),
    /// strings name actions in `actions`.
    pub fn from_json(value: &Value, actions: &ActionTable) -> Result<Self, MenuError> {
        match value {
            Value::Object(map) => Self::from_json_object(map, None, actions),
            other => Err(MenuError::invalid(
                None,
                format!("expected a JSON object, got {}", json_kind(other)),
            )),
        }
    }

    fn from_json_object(
        map: &Map<String, Value>,
        owner: Option<&str>,
        actions: &ActionTable,
    ) -> Result<Self, MenuError> {
        if map.is_empty() {
            return Err(MenuError::invalid(owner, "menu has no entries"));
        }
        let mut spec = MenuSpec::new();
        for (label, value) in map {
            spec = match value {
                Value::String(name) => {
                    let action = actions.get(name).ok_or_else(|| {
                        MenuError::invalid(Some(label.as_str()), format!("no action named `{name}`"))
                    })?;
                    spec.shared_action(label.as_str(), action)
                }
                Value::Object(inner) => {
                    let sub = Self::from_json_object(inner, Some(label.as_str()), actions)?;
                    spec.submenu(label.as_str(), sub)
                }
                other => {
                    return Err(MenuError::invalid(
                        Some(label.as_str()),
                        format!(
                            "expected an action name or a nested menu, got {}",
                            json_kind(other)
                        ),
                    ));
                }
            };
        }
        Ok(spec)
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Named actions for JSON-declared menus.
#[derive(Clone, Default)]
pub struct ActionTable {
    actions: HashMap<String, Action>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn() -> ActionResult + 'static,
    {
        self.actions.insert(name.into(), Rc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<Action> {
        self.actions.get(name).cloned()
    }
}

impl fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}
