//! Search and visibility propagation.
//!
//! A search walks the whole tree once, marks every matching item visible,
//! and propagates visibility to all ancestors so the renderer can print the
//! matching subtree with its context intact. Flags are monotone; call
//! [`ItemTree::reset_visibility`] before reusing a tree for an independent
//! search.

use regex::Regex;

use crate::tree::{Item, ItemTree};

/// What to search for.
#[derive(Debug, Default)]
pub struct SearchSpec {
    /// Pattern matched against the symbol name and display text. `None`
    /// matches every eligible item.
    pub regex: Option<Regex>,
    /// Whether items without display text are eligible.
    pub include_unnamed: bool,
}

impl SearchSpec {
    /// Whether `item` itself matches (ancestor propagation aside).
    fn matches(&self, item: &Item) -> bool {
        // Menus and choices carry no symbol and never match on their own.
        let Some(symbol) = item.symbol.as_ref() else {
            return false;
        };
        if item.text.is_none() && !self.include_unnamed {
            return false;
        }
        match &self.regex {
            Some(regex) => {
                regex.is_match(symbol.name())
                    || item.text.as_deref().is_some_and(|text| regex.is_match(text))
            }
            None => true,
        }
    }
}

/// Marks matching items and their ancestors visible.
///
/// Returns the number of matching items; zero means nothing became visible.
pub fn search(tree: &mut ItemTree, spec: &SearchSpec) -> usize {
    let matches: Vec<_> = tree
        .preorder()
        .filter(|&id| spec.matches(tree.get(id)))
        .collect();
    for &id in &matches {
        tree.mark_visible(id);
    }
    matches.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Scanner;
    use regex::RegexBuilder;

    fn scan(content: &str) -> ItemTree {
        Scanner::new(".", "Kconfig").scan_str(content).unwrap()
    }

    fn regex(pattern: &str) -> Option<Regex> {
        Some(
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap(),
        )
    }

    fn visible_symbols(tree: &ItemTree) -> Vec<String> {
        tree.preorder()
            .filter(|&id| tree.get(id).visible)
            .map(|id| {
                let item = tree.get(id);
                item.symbol
                    .as_ref()
                    .map(|s| s.name().to_string())
                    .or_else(|| item.text.clone())
                    .unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn match_marks_the_spine_only() {
        let mut tree = scan(
            "menu \"Devices\"\n\
             config X\n\
             \tbool \"X driver\"\n\
             config Y\n\
             \tbool \"Y driver\"\n\
             endmenu\n",
        );
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: regex("x"),
                include_unnamed: false,
            },
        );
        assert_eq!(count, 1);
        assert_eq!(visible_symbols(&tree), vec!["Kconfig", "Devices", "X"]);
    }

    #[test]
    fn case_insensitive_by_default_and_matches_text_too() {
        let mut tree = scan("config BAR\n\tbool \"Bar option\"\n");
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: regex("bar"),
                include_unnamed: false,
            },
        );
        assert_eq!(count, 1);

        tree.reset_visibility();
        // "option" only appears in the display text.
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: regex("option"),
                include_unnamed: false,
            },
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn unnamed_items_need_the_flag() {
        let mut tree = scan("config HIDDEN\nconfig SHOWN\n\tbool \"Shown\"\n");
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: None,
                include_unnamed: false,
            },
        );
        assert_eq!(count, 1);

        tree.reset_visibility();
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: None,
                include_unnamed: true,
            },
        );
        assert_eq!(count, 2);
    }

    #[test]
    fn menus_never_match_directly() {
        let mut tree = scan("menu \"Networking\"\nendmenu\n");
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: regex("networking"),
                include_unnamed: true,
            },
        );
        assert_eq!(count, 0);
        assert!(visible_symbols(&tree).is_empty());
    }

    #[test]
    fn empty_query_matches_every_eligible_item() {
        let mut tree = scan(
            "config A\n\tbool \"a\"\n\
             config B\n\tbool \"b\"\n\
             config C\n",
        );
        let count = search(
            &mut tree,
            &SearchSpec {
                regex: None,
                include_unnamed: false,
            },
        );
        assert_eq!(count, 2);
    }
}
