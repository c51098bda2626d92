//! The in-memory item tree.
//!
//! Items live in an index-addressed arena: children are `ItemId` lists and
//! the parent is an optional `ItemId`, so ancestor walks are O(1) per step
//! without reference cycles. The root menu is always at index 0 and is the
//! only item without a parent.

use std::fmt;
use std::rc::Rc;

use crate::expr::{Expr, Symbol};

/// Index of an item inside its [`ItemTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(usize);

/// What kind of node an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// The synthetic root, named after the start file.
    RootMenu,
    /// A `menu` / `mainmenu` block, or a reconstructed submenu parent's scope.
    SubMenu,
    /// A `config` entry.
    Config,
    /// A `menuconfig` entry.
    MenuConfig,
    /// A `choice` block.
    Choice,
}

/// Where an item was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub file: String,
    pub line: usize,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One node of the configuration tree.
#[derive(Debug)]
pub struct Item {
    pub kind: ItemKind,
    /// Display text, set by the declaring directive or a later type line.
    pub text: Option<String>,
    /// The configuration symbol, present on Config/MenuConfig items.
    pub symbol: Option<Symbol>,
    pub origin: Origin,
    /// Help lines with the common block indent already stripped.
    pub help: Vec<String>,
    /// Accumulated conditions, a conjunction. Conditional-scope expressions
    /// are shared between items via `Rc`.
    pub conditions: Vec<Rc<Expr>>,
    /// Monotone search-visibility flag; never cleared except by
    /// [`ItemTree::reset_visibility`].
    pub visible: bool,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
}

impl Item {
    pub fn new(kind: ItemKind, origin: Origin) -> Self {
        Self {
            kind,
            text: None,
            symbol: None,
            origin,
            help: Vec::new(),
            conditions: Vec::new(),
            visible: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }
}

/// Arena holding the whole tree, rooted at [`ItemTree::ROOT`].
#[derive(Debug)]
pub struct ItemTree {
    items: Vec<Item>,
}

impl ItemTree {
    pub const ROOT: ItemId = ItemId(0);

    /// Creates a tree containing only the root menu.
    pub fn new(root_text: impl Into<String>, origin: Origin) -> Self {
        Self {
            items: vec![Item::new(ItemKind::RootMenu, origin).with_text(root_text)],
        }
    }

    /// Number of items, root included; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: ItemId) -> &Item {
        &self.items[id.0]
    }

    pub fn get_mut(&mut self, id: ItemId) -> &mut Item {
        &mut self.items[id.0]
    }

    /// Appends `item` as the last child of `parent`.
    pub fn push(&mut self, parent: ItemId, mut item: Item) -> ItemId {
        let id = ItemId(self.items.len());
        item.parent = Some(parent);
        self.items.push(item);
        self.items[parent.0].children.push(id);
        id
    }

    /// Moves `child` to become the last child of `new_parent`.
    ///
    /// The caller is responsible for removing `child` from its former
    /// parent's child list; submenu reconstruction rebuilds that list
    /// wholesale.
    pub(crate) fn adopt(&mut self, new_parent: ItemId, child: ItemId) {
        self.items[child.0].parent = Some(new_parent);
        self.items[new_parent.0].children.push(child);
    }

    /// Replaces the child list of `id`.
    pub(crate) fn set_children(&mut self, id: ItemId, children: Vec<ItemId>) {
        self.items[id.0].children = children;
    }

    /// Depth of `id`, where the root has depth 0.
    pub fn depth(&self, id: ItemId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.items[current.0].parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Marks `id` and every ancestor up to the root visible.
    pub fn mark_visible(&mut self, id: ItemId) {
        let mut current = Some(id);
        while let Some(c) = current {
            self.items[c.0].visible = true;
            current = self.items[c.0].parent;
        }
    }

    /// Clears all visibility flags, allowing an independent search run.
    pub fn reset_visibility(&mut self) {
        for item in &mut self.items {
            item.visible = false;
        }
    }

    /// Depth-first pre-order walk of the whole tree.
    pub fn preorder(&self) -> impl Iterator<Item = ItemId> + '_ {
        let mut stack = vec![Self::ROOT];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.items[id.0].children.iter().rev().copied());
            Some(id)
        })
    }
}
