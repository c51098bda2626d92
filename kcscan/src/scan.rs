//! Per-file scanning state machine.
//!
//! The scanner walks one Kconfig file line by line, joining backslash
//! continuations into logical lines, capturing indentation-bounded help
//! blocks, handling structural keywords (`choice`, `endmenu`, `endif`, …)
//! itself, and dispatching everything else to the grammar engine. `source`
//! directives recurse into the included file against the same base
//! directory, with an inclusion stack kept for error context.
//!
//! Any failure is fatal and aborts the whole scan; there is no partial-tree
//! mode.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::mem;
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, trace};
use thiserror::Error;

use crate::expr::Expr;
use crate::parse::{self, ConfigKind, Directive, ParseError};
use crate::tree::{Item, ItemId, ItemKind, ItemTree, Origin};

const TABSIZE: usize = 8;

/// One open file on the inclusion stack.
#[derive(Debug, Clone)]
pub struct IncludeFrame {
    pub file: String,
    pub line: usize,
}

/// The chain of `source` directives that led to the failing file,
/// innermost first.
#[derive(Debug, Clone, Default)]
pub struct IncludeTrace(Vec<IncludeFrame>);

impl fmt::Display for IncludeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.0 {
            write!(f, "\n  included from {}:{}", frame.file, frame.line)?;
        }
        Ok(())
    }
}

/// A fatal scanning failure.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The grammar engine could not derive a directive.
    #[error("{file}:{line}: {source}{stack}")]
    Syntax {
        file: String,
        line: usize,
        source: ParseError,
        stack: IncludeTrace,
    },
    /// An `endmenu`, `endchoice`, or `endif` without an open scope.
    #[error("{file}:{line}: unmatched `{keyword}`{stack}")]
    Unbalanced {
        file: String,
        line: usize,
        keyword: String,
        stack: IncludeTrace,
    },
    /// A missing or unreadable file.
    #[error("cannot read `{file}`: {source}")]
    Io {
        file: String,
        source: std::io::Error,
    },
    /// A `source` directive naming a file already on the inclusion stack.
    #[error("{file}:{line}: inclusion cycle through `{target}`{stack}")]
    Cycle {
        file: String,
        line: usize,
        target: String,
        stack: IncludeTrace,
    },
}

/// Mutable per-scan state, passed explicitly through the recursion.
struct ScanState {
    tree: ItemTree,
    /// The scope new items are appended to.
    scope: ItemId,
    /// The item later type/depends/help lines attach to.
    current: Option<ItemId>,
    /// Open `if` blocks; shared with items by reference.
    conditions: Vec<Rc<Expr>>,
    include_stack: Vec<IncludeFrame>,
}

impl ScanState {
    fn new(startfile: &str) -> Self {
        let origin = Origin {
            file: startfile.to_string(),
            line: 0,
        };
        Self {
            tree: ItemTree::new(startfile, origin),
            scope: ItemTree::ROOT,
            current: None,
            conditions: Vec::new(),
            include_stack: Vec::new(),
        }
    }

    /// Error context: every open frame except the one being reported.
    fn trace(&self) -> IncludeTrace {
        let outer = self.include_stack.len().saturating_sub(1);
        IncludeTrace(self.include_stack[..outer].iter().rev().cloned().collect())
    }
}

/// Help-capture phase of the line state machine.
#[derive(Debug, Clone, Copy)]
enum HelpState {
    Off,
    /// A help marker was seen; the next non-blank line fixes the indent.
    AwaitIndent,
    /// Capturing lines indented at least this many columns.
    Capturing(usize),
}

/// Scans a tree of Kconfig files into an [`ItemTree`].
pub struct Scanner {
    basedir: PathBuf,
    startfile: String,
    replacements: HashMap<String, String>,
}

impl Scanner {
    pub fn new(basedir: impl Into<PathBuf>, startfile: impl Into<String>) -> Self {
        Self {
            basedir: basedir.into(),
            startfile: startfile.into(),
            replacements: HashMap::new(),
        }
    }

    /// Registers a string variable substituted inside `source` filenames,
    /// e.g. `$SRCARCH` → `x86`.
    pub fn with_replacement(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.replacements.insert(from.into(), to.into());
        self
    }

    /// Scans the start file (and everything it sources) from disk.
    pub fn scan(&self) -> Result<ItemTree, ScanError> {
        let mut state = ScanState::new(&self.startfile);
        self.scan_file(&mut state, &self.startfile)?;
        Ok(state.tree)
    }

    /// Scans already-loaded content as if it were the start file.
    ///
    /// `source` directives inside the content still resolve against the
    /// base directory.
    pub fn scan_str(&self, content: &str) -> Result<ItemTree, ScanError> {
        let startfile = self.startfile.clone();
        let mut state = ScanState::new(&startfile);
        state.include_stack.push(IncludeFrame {
            file: startfile.clone(),
            line: 0,
        });
        let result = self.scan_lines(&mut state, &startfile, content);
        state.include_stack.pop();
        result?;
        Ok(state.tree)
    }

    fn replace_all(&self, filename: &str) -> String {
        let mut result = filename.to_string();
        for (from, to) in &self.replacements {
            result = result.replace(from, to);
        }
        result
    }

    fn scan_file(&self, state: &mut ScanState, filename: &str) -> Result<(), ScanError> {
        let path = self.basedir.join(filename);
        let content = fs::read_to_string(&path).map_err(|source| ScanError::Io {
            file: path.display().to_string(),
            source,
        })?;
        debug!("scanning {}", path.display());
        state.include_stack.push(IncludeFrame {
            file: filename.to_string(),
            line: 0,
        });
        let result = self.scan_lines(state, filename, &content);
        state.include_stack.pop();
        result
    }

    fn scan_lines(
        &self,
        state: &mut ScanState,
        filename: &str,
        content: &str,
    ) -> Result<(), ScanError> {
        let mut help = HelpState::Off;
        let mut pending = String::new();
        let mut lineno = 0;
        for (idx, raw) in content.lines().enumerate() {
            lineno = idx + 1;
            if let Some(frame) = state.include_stack.last_mut() {
                frame.line = lineno;
            }
            if let Some(unmarked) = raw.strip_suffix('\\') {
                // Continuation: marker removed, no separator inserted.
                pending.push_str(unmarked);
                continue;
            }
            let line = if pending.is_empty() {
                raw.to_string()
            } else {
                let mut joined = mem::take(&mut pending);
                joined.push_str(raw);
                joined
            };
            self.handle_line(state, &mut help, filename, lineno, &line)?;
        }
        if !pending.is_empty() {
            // A trailing continuation at EOF is taken as-is.
            self.handle_line(state, &mut help, filename, lineno, &pending)?;
        }
        Ok(())
    }

    fn handle_line(
        &self,
        state: &mut ScanState,
        help: &mut HelpState,
        filename: &str,
        lineno: usize,
        line: &str,
    ) -> Result<(), ScanError> {
        let stripped = line.trim();
        if stripped.starts_with('#') {
            return Ok(());
        }

        match *help {
            HelpState::Off => {}
            HelpState::AwaitIndent | HelpState::Capturing(_) if stripped.is_empty() => {
                append_help(state, String::new());
                return Ok(());
            }
            HelpState::AwaitIndent => {
                let indent = apparent_indent(line, TABSIZE);
                if indent > 0 {
                    *help = HelpState::Capturing(indent);
                    append_help(state, strip_columns(line, indent));
                    return Ok(());
                }
                // A zero-indent line right after the marker means there is
                // no help body; the line is an ordinary directive.
                *help = HelpState::Off;
            }
            HelpState::Capturing(block) => {
                let indent = apparent_indent(line, TABSIZE);
                if indent >= block {
                    append_help(state, strip_columns(line, block));
                    return Ok(());
                }
                // Dedent ends the capture; reprocess this line below.
                *help = HelpState::Off;
            }
        }

        let Some(keyword) = stripped.split_whitespace().next() else {
            return Ok(());
        };

        match keyword {
            "help" | "---help---" => *help = HelpState::AwaitIndent,
            "endmenu" | "endchoice" => match state.tree.get(state.scope).parent() {
                Some(parent) => {
                    state.scope = parent;
                    state.current = Some(parent);
                }
                None => {
                    return Err(ScanError::Unbalanced {
                        file: filename.to_string(),
                        line: lineno,
                        keyword: keyword.to_string(),
                        stack: state.trace(),
                    });
                }
            },
            "choice" => {
                let origin = Origin {
                    file: filename.to_string(),
                    line: lineno,
                };
                let id = state.tree.push(
                    state.scope,
                    Item::new(ItemKind::Choice, origin).with_text("Multiple choices"),
                );
                state.scope = id;
                state.current = Some(id);
            }
            "endif" => {
                if state.conditions.pop().is_none() {
                    return Err(ScanError::Unbalanced {
                        file: filename.to_string(),
                        line: lineno,
                        keyword: keyword.to_string(),
                        stack: state.trace(),
                    });
                }
            }
            "optional" => {}
            _ => {
                let directive =
                    parse::parse_directive(line).map_err(|source| ScanError::Syntax {
                        file: filename.to_string(),
                        line: lineno,
                        source,
                        stack: state.trace(),
                    })?;
                self.apply(state, filename, lineno, directive)?;
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut ScanState,
        filename: &str,
        lineno: usize,
        directive: Directive,
    ) -> Result<(), ScanError> {
        let origin = Origin {
            file: filename.to_string(),
            line: lineno,
        };
        match directive {
            Directive::Menu { text, .. } => {
                let id = state
                    .tree
                    .push(state.scope, Item::new(ItemKind::SubMenu, origin).with_text(text));
                state.scope = id;
                state.current = Some(id);
            }
            Directive::Config { kind, symbol } => {
                let kind = match kind {
                    ConfigKind::Config => ItemKind::Config,
                    ConfigKind::MenuConfig => ItemKind::MenuConfig,
                };
                let mut item = Item::new(kind, origin).with_symbol(symbol);
                // Open conditional scopes apply to the new item; the
                // expressions are shared, not copied.
                item.conditions = state.conditions.clone();
                let id = state.tree.push(state.scope, item);
                state.current = Some(id);
            }
            Directive::ConfigType {
                text: Some(text), ..
            } if !text.is_empty() => {
                if let Some(id) = state.current {
                    let item = state.tree.get_mut(id);
                    item.text = Some(if item.kind == ItemKind::Choice {
                        format!("{{{text}}}")
                    } else {
                        text
                    });
                }
            }
            Directive::ConfigType { .. } => {}
            Directive::DependsOn { dependency } => append_condition(state, dependency),
            Directive::VisibleIf { condition } => append_condition(state, condition),
            Directive::Conditional { condition } => {
                state.conditions.push(Rc::new(condition));
            }
            Directive::Source { filename: raw } => {
                let target = self.replace_all(&raw);
                if state.include_stack.iter().any(|f| f.file == target) {
                    return Err(ScanError::Cycle {
                        file: filename.to_string(),
                        line: lineno,
                        target,
                        stack: state.trace(),
                    });
                }
                self.scan_file(state, &target)?;
            }
            // Recorded for completeness; these never affect tree shape,
            // conditions, or children.
            d @ (Directive::Select { .. }
            | Directive::Imply { .. }
            | Directive::Range { .. }
            | Directive::DefType { .. }
            | Directive::DefaultValue { .. }
            | Directive::Option { .. }
            | Directive::Comment { .. }) => {
                trace!("{filename}:{lineno}: inert directive `{d}`");
            }
        }
        Ok(())
    }
}

fn append_help(state: &mut ScanState, line: String) {
    if let Some(id) = state.current {
        state.tree.get_mut(id).help.push(line);
    }
}

fn append_condition(state: &mut ScanState, condition: Expr) {
    if let Some(id) = state.current {
        state.tree.get_mut(id).conditions.push(Rc::new(condition));
    }
}

/// Expands tabs to the next multiple of `tabsize` columns.
fn expand_tabs(text: &str, tabsize: usize) -> String {
    let mut result = String::with_capacity(text.len());
    let mut width = 0usize;
    for c in text.chars() {
        if c == '\t' {
            let next = (width / tabsize + 1) * tabsize;
            for _ in width..next {
                result.push(' ');
            }
            width = next;
        } else {
            result.push(c);
            width += 1;
        }
    }
    result
}

/// Column width of the leading whitespace of `line`.
fn apparent_indent(line: &str, tabsize: usize) -> usize {
    let mut width = 0usize;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / tabsize + 1) * tabsize,
            _ => break,
        }
    }
    width
}

/// Tab-expands `line` and drops its first `columns` columns.
fn strip_columns(line: &str, columns: usize) -> String {
    expand_tabs(line, TABSIZE).chars().skip(columns).collect()
}
