//! Typed directives, one per parsed logical line.

use std::fmt;

use crate::expr::{Expr, Symbol};

/// Which keyword introduced a configuration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Config,
    MenuConfig,
}

impl ConfigKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKind::Config => "config",
            ConfigKind::MenuConfig => "menuconfig",
        }
    }
}

/// Which keyword introduced a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Menu,
    MainMenu,
}

impl MenuKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuKind::Menu => "menu",
            MenuKind::MainMenu => "mainmenu",
        }
    }
}

/// A value type keyword (`string`, `hex`, `bool`, `prompt`, `tristate`, `int`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    String,
    Hex,
    Bool,
    Prompt,
    Tristate,
    Int,
}

impl TypeName {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "string" => Some(TypeName::String),
            "hex" => Some(TypeName::Hex),
            "bool" => Some(TypeName::Bool),
            "prompt" => Some(TypeName::Prompt),
            "tristate" => Some(TypeName::Tristate),
            "int" => Some(TypeName::Int),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::String => "string",
            TypeName::Hex => "hex",
            TypeName::Bool => "bool",
            TypeName::Prompt => "prompt",
            TypeName::Tristate => "tristate",
            TypeName::Int => "int",
        }
    }
}

/// A defaulted type keyword (`def_bool`, `def_tristate`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Bool,
    Tristate,
}

impl DefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DefKind::Bool => "def_bool",
            DefKind::Tristate => "def_tristate",
        }
    }
}

/// One endpoint of a `range` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeBound {
    Int(i64),
    Symbol(Symbol),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Int(value) => write!(f, "{value}"),
            RangeBound::Symbol(symbol) => write!(f, "{symbol}"),
        }
    }
}

/// The structured meaning of one parsed logical line.
///
/// A closed union: directive interpretation in the scanner is an exhaustive
/// match, so adding a kind is a compile-time-checked change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `config FOO` / `menuconfig FOO`.
    Config { kind: ConfigKind, symbol: Symbol },
    /// `menu "text"` / `mainmenu "text"`.
    Menu { kind: MenuKind, text: String },
    /// `source "path"`.
    Source { filename: String },
    /// `comment "text"`.
    Comment { text: String },
    /// `bool "text" if EXPR` and friends.
    ConfigType {
        typename: TypeName,
        text: Option<String>,
        condition: Option<Expr>,
    },
    /// `def_bool EXPR if EXPR` / `def_tristate EXPR if EXPR`.
    DefType {
        kind: DefKind,
        value: Expr,
        condition: Option<Expr>,
    },
    /// `range 0 10 if EXPR`.
    Range {
        from: RangeBound,
        to: RangeBound,
        condition: Option<Expr>,
    },
    /// `depends on EXPR`.
    DependsOn { dependency: Expr },
    /// `option <raw parameters>`.
    Option { parameters: String },
    /// `default EXPR if EXPR`.
    DefaultValue {
        value: Expr,
        condition: Option<Expr>,
    },
    /// `select FOO if EXPR`.
    Select {
        symbol: Symbol,
        condition: Option<Expr>,
    },
    /// `imply FOO if EXPR`.
    Imply {
        symbol: Symbol,
        condition: Option<Expr>,
    },
    /// `visible if EXPR`.
    VisibleIf { condition: Expr },
    /// Bare `if EXPR`, opening a conditional scope.
    Conditional { condition: Expr },
}

fn write_if(f: &mut fmt::Formatter<'_>, condition: &Option<Expr>) -> fmt::Result {
    if let Some(condition) = condition {
        write!(f, " if {condition}")?;
    }
    Ok(())
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Config { kind, symbol } => write!(f, "{} {symbol}", kind.as_str()),
            Directive::Menu { kind, text } => write!(f, "{} \"{text}\"", kind.as_str()),
            Directive::Source { filename } => write!(f, "source \"{filename}\""),
            Directive::Comment { text } => write!(f, "comment \"{text}\""),
            Directive::ConfigType {
                typename,
                text,
                condition,
            } => {
                write!(f, "{}", typename.as_str())?;
                if let Some(text) = text {
                    write!(f, " \"{text}\"")?;
                }
                write_if(f, condition)
            }
            Directive::DefType {
                kind,
                value,
                condition,
            } => {
                write!(f, "{} {value}", kind.as_str())?;
                write_if(f, condition)
            }
            Directive::Range {
                from,
                to,
                condition,
            } => {
                write!(f, "range {from} {to}")?;
                write_if(f, condition)
            }
            Directive::DependsOn { dependency } => write!(f, "depends on {dependency}"),
            Directive::Option { parameters } => write!(f, "option {parameters}"),
            Directive::DefaultValue { value, condition } => {
                write!(f, "default {value}")?;
                write_if(f, condition)
            }
            Directive::Select { symbol, condition } => {
                write!(f, "select {symbol}")?;
                write_if(f, condition)
            }
            Directive::Imply { symbol, condition } => {
                write!(f, "imply {symbol}")?;
                write_if(f, condition)
            }
            Directive::VisibleIf { condition } => write!(f, "visible if {condition}"),
            Directive::Conditional { condition } => write!(f, "if {condition}"),
        }
    }
}
