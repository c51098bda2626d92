//! Renders the visible subtree to text.
//!
//! Visible nodes are printed depth-first in their original order and depth,
//! indented four spaces per level. Options show their display text, their
//! bare symbol, or `text (symbol)` when both exist; the symbol is colorized
//! by its `.config` state when one was loaded.

use colored::Colorize;

use kcscan::expr::Expr;
use kcscan::tree::{Item, ItemId, ItemKind, ItemTree};

use crate::dotconfig::{ConfigStates, SymbolState};

/// Keys usable as single-character menu shortcuts. `m`, `n`, and `y` are
/// reserved for tristate answers.
const NAV_KEYS: &str = "abcdefghijklopqrstuvwxz";

/// What to include when rendering.
#[derive(Debug, Default)]
pub struct DumpSpec {
    /// Append `{file:line}` to every option.
    pub show_origin: bool,
    /// Print captured help text under every option.
    pub show_help: bool,
    /// Append the accumulated conditions, joined by `and`.
    pub show_conditions: bool,
    /// Prefix options with a `[k]` navigation key.
    pub show_keys: bool,
    /// Symbol states used for coloring.
    pub states: Option<ConfigStates>,
}

/// Renders every visible node of `tree` into a string.
pub fn render(tree: &ItemTree, spec: &DumpSpec) -> String {
    let mut out = String::new();
    render_item(tree, ItemTree::ROOT, 0, spec, &mut out);
    out
}

fn render_item(tree: &ItemTree, id: ItemId, depth: usize, spec: &DumpSpec, out: &mut String) {
    let item = tree.get(id);
    if !item.visible {
        return;
    }
    let indent = "    ".repeat(depth);
    out.push_str(&indent);
    out.push_str(&format_item(item, spec));
    out.push('\n');
    if spec.show_help {
        for line in trimmed_help(&item.help) {
            out.push_str(&format!("{indent}    {}\n", line.trim_end()));
        }
    }
    for &child in item.children() {
        render_item(tree, child, depth + 1, spec, out);
    }
}

fn format_item(item: &Item, spec: &DumpSpec) -> String {
    let mut line = String::new();
    if spec.show_keys
        && let Some(key) = nav_key(item)
    {
        line.push_str(&format!("[{key}] "));
    }
    let symbol = item
        .symbol
        .as_ref()
        .map(|s| colorize(s.name(), spec.states.as_ref()));
    match (item.text.as_deref(), symbol) {
        (Some(text), Some(symbol)) => line.push_str(&format!("{text} ({symbol})")),
        (Some(text), None) => line.push_str(text),
        (None, Some(symbol)) => line.push_str(&symbol),
        (None, None) => {}
    }
    // The root's origin is synthetic (line 0); only declared items get one.
    if spec.show_origin && item.kind != ItemKind::RootMenu {
        line.push_str(&format!(" {{{}}}", item.origin));
    }
    if spec.show_conditions && !item.conditions.is_empty() {
        let conditions: Vec<String> = item
            .conditions
            .iter()
            .map(|c| format_expr(c, spec.states.as_ref()))
            .collect();
        line.push_str(" if ");
        line.push_str(&conditions.join(" and "));
    }
    line
}

/// The navigation key for an item: the first character of its display text,
/// lowercased, if it is in the usable key set.
fn nav_key(item: &Item) -> Option<char> {
    let key = item.text.as_ref()?.chars().next()?.to_ascii_lowercase();
    NAV_KEYS.contains(key).then_some(key)
}

/// Help lines with leading and trailing blank lines dropped.
fn trimmed_help(help: &[String]) -> &[String] {
    let start = help
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(help.len());
    let end = help
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    &help[start..end]
}

/// Formats a condition the way the tree was written, coloring symbols.
fn format_expr(expr: &Expr, states: Option<&ConfigStates>) -> String {
    match expr {
        Expr::Literal(value) => value.clone(),
        Expr::Symbol(symbol) => colorize(symbol.name(), states),
        Expr::Not(rhs) => format!("!({})", format_expr(rhs, states)),
        Expr::Binary { lhs, op, rhs } => format!(
            "({} {op} {})",
            format_expr(lhs, states),
            format_expr(rhs, states)
        ),
    }
}

fn colorize(name: &str, states: Option<&ConfigStates>) -> String {
    let Some(states) = states else {
        return name.to_string();
    };
    match states.get(name) {
        SymbolState::Enabled => name.green(),
        SymbolState::Disabled => name.red(),
        SymbolState::Module => name.cyan(),
        SymbolState::Unknown => name.white(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcscan::{rebuild_submenus, search, Scanner, SearchSpec};
    use regex::RegexBuilder;

    fn searched(content: &str, pattern: &str) -> ItemTree {
        let mut tree = Scanner::new(".", "Kconfig").scan_str(content).unwrap();
        let spec = SearchSpec {
            regex: Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .unwrap(),
            ),
            include_unnamed: true,
        };
        assert!(search(&mut tree, &spec) > 0, "no match for {pattern}");
        tree
    }

    fn plain(spec: DumpSpec) -> DumpSpec {
        colored::control::set_override(false);
        spec
    }

    #[test]
    fn renders_text_symbol_and_both() {
        let tree = searched(
            "config BAR\n\tbool \"Bar option\"\nconfig UNNAMED\n",
            ".",
        );
        let out = render(&tree, &plain(DumpSpec::default()));
        assert_eq!(out, "Kconfig\n    Bar option (BAR)\n    UNNAMED\n");
    }

    #[test]
    fn end_to_end_source_inclusion_search() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A"), "source \"B\"\n").unwrap();
        std::fs::write(dir.path().join("B"), "config BAR\n\tbool \"Bar option\"\n").unwrap();

        let mut tree = Scanner::new(dir.path(), "A").scan().unwrap();
        rebuild_submenus(&mut tree);
        let spec = SearchSpec {
            regex: Some(
                RegexBuilder::new("bar")
                    .case_insensitive(true)
                    .build()
                    .unwrap(),
            ),
            include_unnamed: false,
        };
        assert_eq!(search(&mut tree, &spec), 1);
        let out = render(&tree, &plain(DumpSpec::default()));
        assert_eq!(out, "A\n    Bar option (BAR)\n");
    }

    #[test]
    fn origin_and_conditions_are_appended() {
        let tree = searched(
            "config FOO\n\tbool \"Foo\"\n\tdepends on A && !B\n\tvisible if C\n",
            "foo",
        );
        let out = render(
            &tree,
            &plain(DumpSpec {
                show_origin: true,
                show_conditions: true,
                ..Default::default()
            }),
        );
        assert_eq!(
            out,
            "Kconfig\n    Foo (FOO) {Kconfig:1} if (A && !(B)) and C\n"
        );
    }

    #[test]
    fn help_is_printed_indented_under_the_option() {
        let tree = searched(
            "config FOO\n\tbool \"Foo\"\n\thelp\n\t  Enables foo.\n\t  Say Y here.\n",
            "foo",
        );
        let out = render(
            &tree,
            &plain(DumpSpec {
                show_help: true,
                ..Default::default()
            }),
        );
        assert_eq!(
            out,
            "Kconfig\n    Foo (FOO)\n        Enables foo.\n        Say Y here.\n"
        );
    }

    #[test]
    fn navigation_keys_skip_the_tristate_letters() {
        let tree = searched(
            "config BUS\n\tbool \"Bus options\"\nconfig MEM\n\tbool \"Memory model\"\n",
            ".",
        );
        let out = render(
            &tree,
            &plain(DumpSpec {
                show_keys: true,
                ..Default::default()
            }),
        );
        // 'b' and 'k' are usable keys; 'm' is reserved and gets no prefix.
        assert_eq!(
            out,
            "[k] Kconfig\n    [b] Bus options (BUS)\n    Memory model (MEM)\n"
        );
    }

    #[test]
    fn invisible_siblings_are_omitted_at_original_depth() {
        let tree = searched(
            "menu \"Devices\"\nconfig X\n\tbool \"X driver\"\nconfig Y\n\tbool \"Y driver\"\nendmenu\n",
            "x driver",
        );
        let out = render(&tree, &plain(DumpSpec::default()));
        assert_eq!(out, "Kconfig\n    Devices\n        X driver (X)\n");
    }

    #[test]
    fn condition_literals_render_unquoted() {
        let tree = searched(
            "config FOO\n\tbool \"Foo\"\n\tdepends on ARCH != \"i386\"\n",
            "foo",
        );
        let out = render(
            &tree,
            &plain(DumpSpec {
                show_conditions: true,
                ..Default::default()
            }),
        );
        assert_eq!(out, "Kconfig\n    Foo (FOO) if (ARCH != i386)\n");
    }
}
