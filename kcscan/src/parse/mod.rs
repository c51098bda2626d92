//! Grammar engine for single logical lines.
//!
//! The scanner hands this module one logical line at a time (continuations
//! already joined, full-line comments already dropped) and gets back a typed
//! [`Directive`]. Parsing is top-down with a context-sensitive cursor: each
//! alternative commits after one token of lookahead, and a failed parse never
//! leaves partial state behind.
//!
//! ## Line shapes
//!
//! ```text
//! config|menuconfig SYMBOL
//! menu|mainmenu "text"
//! source "file"
//! comment "text"
//! string|hex|bool|prompt|tristate|int ["text"] [if EXPR]
//! def_bool|def_tristate EXPR [if EXPR]
//! range INT|SYMBOL INT|SYMBOL [if EXPR]
//! depends on EXPR
//! option raw parameters
//! default EXPR [if EXPR]
//! select|imply SYMBOL [if EXPR]
//! visible if EXPR
//! if EXPR
//! ```
//!
//! A trailing `# comment` is permitted after any directive.

mod directive;

pub use directive::{ConfigKind, DefKind, Directive, MenuKind, RangeBound, TypeName};

use thiserror::Error;

use crate::expr::{CmpOp, Expr, Symbol};

/// A grammar failure inside one logical line.
///
/// `column` is 1-based and counts characters of the original line; the
/// scanner wraps this with file and line context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column {column}: {message}")]
pub struct ParseError {
    pub column: usize,
    pub message: String,
}

/// Parses one logical line into a [`Directive`].
pub fn parse_directive(line: &str) -> Result<Directive, ParseError> {
    let mut cur = Cursor::new(line);
    cur.skip_ws();
    let keyword_column = cur.column();
    let Some(keyword) = cur.take_symbol() else {
        return Err(cur.error("expected a directive keyword"));
    };

    let directive = match keyword {
        "config" => Directive::Config {
            kind: ConfigKind::Config,
            symbol: cur.expect_symbol()?,
        },
        "menuconfig" => Directive::Config {
            kind: ConfigKind::MenuConfig,
            symbol: cur.expect_symbol()?,
        },
        "menu" => Directive::Menu {
            kind: MenuKind::Menu,
            text: cur.expect_string()?,
        },
        "mainmenu" => Directive::Menu {
            kind: MenuKind::MainMenu,
            text: cur.expect_string()?,
        },
        "source" => Directive::Source {
            filename: cur.expect_string()?,
        },
        "comment" => Directive::Comment {
            text: cur.expect_string()?,
        },
        "def_bool" => cur.def_type(DefKind::Bool)?,
        "def_tristate" => cur.def_type(DefKind::Tristate)?,
        "range" => {
            let from = cur.range_bound()?;
            let to = cur.range_bound()?;
            let condition = cur.opt_if()?;
            Directive::Range {
                from,
                to,
                condition,
            }
        }
        "depends" => {
            if !cur.try_keyword("on") {
                return Err(cur.error("expected `on` after `depends`"));
            }
            Directive::DependsOn {
                dependency: cur.expr()?,
            }
        }
        "option" => {
            // The rest of the line is kept verbatim, trailing comment and all.
            let parameters = cur.take_rest().trim().to_string();
            return Ok(Directive::Option { parameters });
        }
        "default" => {
            let value = cur.expr()?;
            let condition = cur.opt_if()?;
            Directive::DefaultValue { value, condition }
        }
        "select" => {
            let symbol = cur.expect_symbol()?;
            let condition = cur.opt_if()?;
            Directive::Select { symbol, condition }
        }
        "imply" => {
            let symbol = cur.expect_symbol()?;
            let condition = cur.opt_if()?;
            Directive::Imply { symbol, condition }
        }
        "visible" => {
            if !cur.try_keyword("if") {
                return Err(cur.error("expected `if` after `visible`"));
            }
            Directive::VisibleIf {
                condition: cur.expr()?,
            }
        }
        "if" => Directive::Conditional {
            condition: cur.expr()?,
        },
        other => {
            if let Some(typename) = TypeName::from_keyword(other) {
                cur.config_type(typename)?
            } else {
                return Err(ParseError {
                    column: keyword_column,
                    message: format!("unknown directive keyword `{other}`"),
                });
            }
        }
    };

    cur.expect_end()?;
    Ok(directive)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn column(&self) -> usize {
        self.src[..self.pos].chars().count() + 1
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            column: self.column(),
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn take_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.src.len();
        rest
    }

    fn is_symbol_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    /// Takes a `[A-Za-z0-9_]+` run, if one starts here.
    fn take_symbol(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(Self::is_symbol_char) {
            self.bump();
        }
        (self.pos > start).then(|| &self.src[start..self.pos])
    }

    fn expect_symbol(&mut self) -> Result<Symbol, ParseError> {
        self.take_symbol()
            .map(Symbol::new)
            .ok_or_else(|| self.error("expected a symbol"))
    }

    /// Consumes `keyword` only if the next symbol run is exactly it.
    fn try_keyword(&mut self, keyword: &str) -> bool {
        let saved = self.pos;
        match self.take_symbol() {
            Some(word) if word == keyword => true,
            _ => {
                self.pos = saved;
                false
            }
        }
    }

    /// A quoted string body, with the matching quote backslash-escapable.
    fn quoted_string(&mut self, quote: char) -> Result<String, ParseError> {
        let open_column = self.column();
        self.bump();
        let mut value = String::new();
        while let Some(c) = self.bump() {
            if c == '\\' && self.peek() == Some(quote) {
                value.push(quote);
                self.bump();
            } else if c == quote {
                return Ok(value);
            } else {
                value.push(c);
            }
        }
        Err(ParseError {
            column: open_column,
            message: "unterminated string".into(),
        })
    }

    /// A bare word: anything up to whitespace, `)`, or a trailing comment.
    fn bare_word(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && c != ')' && c != '#')
        {
            self.bump();
        }
        (self.pos > start).then(|| &self.src[start..self.pos])
    }

    /// Quoted string or bare word.
    fn expect_string(&mut self) -> Result<String, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.quoted_string(quote),
            Some(_) => self
                .bare_word()
                .map(str::to_string)
                .ok_or_else(|| self.error("expected a string")),
            None => Err(self.error("expected a string")),
        }
    }

    fn take_cmp_op(&mut self) -> Option<CmpOp> {
        self.skip_ws();
        for (text, op) in [
            ("!=", CmpOp::Ne),
            ("&&", CmpOp::And),
            ("||", CmpOp::Or),
            (">=", CmpOp::Ge),
            ("<=", CmpOp::Le),
            ("=", CmpOp::Eq),
            (">", CmpOp::Gt),
            ("<", CmpOp::Lt),
        ] {
            if self.eat(text) {
                return Some(op);
            }
        }
        None
    }

    /// `Expr := '!' Expr | Term CmpOp Expr | Term` (right-associative).
    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        if self.peek() == Some('!') && !self.rest().starts_with("!=") {
            self.bump();
            return Ok(Expr::Not(Box::new(self.expr()?)));
        }
        let lhs = self.term()?;
        match self.take_cmp_op() {
            Some(op) => Ok(Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(self.expr()?),
            }),
            None => Ok(lhs),
        }
    }

    /// `Term := '(' Expr ')' | y/n/m | symbol | string`.
    fn term(&mut self) -> Result<Expr, ParseError> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.bump();
                let inner = self.expr()?;
                self.skip_ws();
                if !self.eat(")") {
                    return Err(self.error("expected `)`"));
                }
                Ok(inner)
            }
            Some(quote @ ('"' | '\'')) => Ok(Expr::Literal(self.quoted_string(quote)?)),
            Some(_) => {
                if let Some(word) = self.take_symbol() {
                    if matches!(word, "y" | "n" | "m") {
                        Ok(Expr::Literal(word.to_string()))
                    } else {
                        Ok(Expr::Symbol(Symbol::new(word)))
                    }
                } else if let Some(word) = self.bare_word() {
                    Ok(Expr::Literal(word.to_string()))
                } else {
                    Err(self.error("expected an expression term"))
                }
            }
            None => Err(self.error("expected an expression term")),
        }
    }

    /// Optional `if EXPR` suffix.
    fn opt_if(&mut self) -> Result<Option<Expr>, ParseError> {
        if self.try_keyword("if") {
            Ok(Some(self.expr()?))
        } else {
            Ok(None)
        }
    }

    fn def_type(&mut self, kind: DefKind) -> Result<Directive, ParseError> {
        let value = self.expr()?;
        let condition = self.opt_if()?;
        Ok(Directive::DefType {
            kind,
            value,
            condition,
        })
    }

    /// `kw_type ["text"] [if EXPR]`; a bare `if` means there is no text.
    fn config_type(&mut self, typename: TypeName) -> Result<Directive, ParseError> {
        self.skip_ws();
        if self.at_line_end() {
            return Ok(Directive::ConfigType {
                typename,
                text: None,
                condition: None,
            });
        }
        if self.try_keyword("if") {
            return Ok(Directive::ConfigType {
                typename,
                text: None,
                condition: Some(self.expr()?),
            });
        }
        let text = self.expect_string()?;
        let condition = self.opt_if()?;
        Ok(Directive::ConfigType {
            typename,
            text: Some(text),
            condition,
        })
    }

    /// Integer literal (hex or signed decimal) or symbol.
    fn range_bound(&mut self) -> Result<RangeBound, ParseError> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(Self::is_symbol_char) {
            self.bump();
        }
        let word = &self.src[start..self.pos];
        if word.is_empty() || word == "-" {
            return Err(ParseError {
                column: self.src[..start].chars().count() + 1,
                message: "expected an integer or symbol".into(),
            });
        }
        if let Some(hex) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
            return i64::from_str_radix(hex, 16)
                .map(RangeBound::Int)
                .map_err(|_| self.error(format!("invalid hex literal `{word}`")));
        }
        if word.starts_with('-') || word.chars().all(|c| c.is_ascii_digit()) {
            return word
                .parse::<i64>()
                .map(RangeBound::Int)
                .map_err(|_| self.error(format!("invalid integer literal `{word}`")));
        }
        Ok(RangeBound::Symbol(Symbol::new(word)))
    }

    fn at_line_end(&self) -> bool {
        match self.rest().trim_start().chars().next() {
            None => true,
            Some('#') => true,
            Some(_) => false,
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.skip_ws();
        if self.at_line_end() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Directive {
        parse_directive(line).unwrap()
    }

    fn round_trip(line: &str) {
        let first = parse(line);
        let formatted = first.to_string();
        let second = parse_directive(&formatted)
            .unwrap_or_else(|e| panic!("reparse of `{formatted}` failed: {e}"));
        assert_eq!(first, second, "round trip through `{formatted}`");
    }

    #[test]
    fn round_trips_are_ast_stable() {
        for line in [
            "config FOO",
            "menuconfig FOO",
            "bool \"Text\" if BAR",
            "depends on A && !B",
            "default \"x\" if Y",
            "select Z",
            "range 0 10",
            "menu \"Processor type\"",
            "source \"arch/x86/Kconfig\"",
            "comment \"Helpers\"",
            "def_bool y if X86_64",
            "imply FRAME_POINTER if DEBUG",
            "visible if EXPERT",
            "if ARM && MMU",
            "range 0x0 0xFF if PCI",
            "option env=\"ARCH\"",
        ] {
            round_trip(line);
        }
    }

    #[test]
    fn config_carries_its_keyword() {
        assert_eq!(
            parse("menuconfig NET"),
            Directive::Config {
                kind: ConfigKind::MenuConfig,
                symbol: Symbol::new("NET"),
            }
        );
    }

    #[test]
    fn type_without_text_or_with_bare_condition() {
        assert_eq!(
            parse("bool"),
            Directive::ConfigType {
                typename: TypeName::Bool,
                text: None,
                condition: None,
            }
        );
        assert_eq!(
            parse("tristate if NET"),
            Directive::ConfigType {
                typename: TypeName::Tristate,
                text: None,
                condition: Some(Expr::Symbol(Symbol::new("NET"))),
            }
        );
    }

    #[test]
    fn default_binds_trailing_if_to_the_directive() {
        // `default A || B if C` guards the whole default with C.
        let Directive::DefaultValue { value, condition } =
            parse("default ARCH_MXC || SOC_IMX28 if ARM")
        else {
            panic!("not a default");
        };
        assert_eq!(
            value,
            Expr::Binary {
                lhs: Box::new(Expr::Symbol(Symbol::new("ARCH_MXC"))),
                op: CmpOp::Or,
                rhs: Box::new(Expr::Symbol(Symbol::new("SOC_IMX28"))),
            }
        );
        assert_eq!(condition, Some(Expr::Symbol(Symbol::new("ARM"))));
    }

    #[test]
    fn comparison_against_quoted_literal() {
        assert_eq!(
            parse("default ARCH != \"i386\""),
            Directive::DefaultValue {
                value: Expr::Binary {
                    lhs: Box::new(Expr::Symbol(Symbol::new("ARCH"))),
                    op: CmpOp::Ne,
                    rhs: Box::new(Expr::Literal("i386".into())),
                },
                condition: None,
            }
        );
    }

    #[test]
    fn negation_and_parentheses() {
        let Directive::DefaultValue { value, .. } = parse("default !IA64 && !(TILE && 64BIT)")
        else {
            panic!("not a default");
        };
        let Expr::Not(inner) = value else {
            panic!("unary applies first: {value:?}");
        };
        // The original grammar parses `!a && b` as `!(a && b)`.
        assert!(matches!(
            *inner,
            Expr::Binary {
                op: CmpOp::And,
                ..
            }
        ));
    }

    #[test]
    fn tristate_literals_in_expressions() {
        assert_eq!(
            parse("def_bool y"),
            Directive::DefType {
                kind: DefKind::Bool,
                value: Expr::Literal("y".into()),
                condition: None,
            }
        );
    }

    #[test]
    fn range_accepts_hex_decimal_and_symbols() {
        assert_eq!(
            parse("range 0x10 -5"),
            Directive::Range {
                from: RangeBound::Int(16),
                to: RangeBound::Int(-5),
                condition: None,
            }
        );
        assert_eq!(
            parse("range 1 MAX_CPUS"),
            Directive::Range {
                from: RangeBound::Int(1),
                to: RangeBound::Symbol(Symbol::new("MAX_CPUS")),
                condition: None,
            }
        );
    }

    #[test]
    fn trailing_comments_are_ignored() {
        assert_eq!(
            parse("select CRYPTO # implied by EVM"),
            Directive::Select {
                symbol: Symbol::new("CRYPTO"),
                condition: None,
            }
        );
    }

    #[test]
    fn option_keeps_raw_parameters() {
        assert_eq!(
            parse("option defconfig_list"),
            Directive::Option {
                parameters: "defconfig_list".into(),
            }
        );
    }

    #[test]
    fn unknown_keyword_reports_its_column() {
        let err = parse_directive("  frobnicate FOO").unwrap_err();
        assert_eq!(err.column, 3);
        assert!(err.message.contains("frobnicate"));
    }

    #[test]
    fn missing_pieces_report_errors() {
        assert!(parse_directive("config").is_err());
        assert!(parse_directive("depends FOO").is_err());
        assert!(parse_directive("menu \"unterminated").is_err());
        assert!(parse_directive("config FOO extra").is_err());
        assert!(parse_directive("range 0x 10").is_err());
    }
}
