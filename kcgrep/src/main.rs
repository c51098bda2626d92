//! Search Linux kernel Kconfig files.
//!
//! `kcgrep` scans a kernel source tree's Kconfig files into a menu tree,
//! optionally regroups dependent options into submenus, filters the tree by
//! a regular expression, and prints the matching options with their menu
//! context.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use kcscan::{Scanner, SearchSpec, rebuild_submenus, search};
use regex::RegexBuilder;

mod dotconfig;
mod render;

use dotconfig::ConfigStates;
use render::DumpSpec;

/// Search Linux kernel Kconfig files.
#[derive(Parser, Debug)]
#[command(name = "kcgrep", version, about)]
struct Args {
    /// Regular expression matched against symbol names and display text.
    /// When omitted, every named option is shown.
    search: Option<String>,

    /// Kernel source tree to scan.
    #[arg(short = 'd', long, default_value = ".")]
    kernel_path: PathBuf,

    /// File the scan starts at, relative to the kernel path.
    #[arg(long, default_value = "Kconfig")]
    startfile: String,

    /// Architecture substituted for $SRCARCH in sourced filenames.
    #[arg(short, long, default_value = "x86")]
    arch: String,

    /// Kernel .config used to colorize symbols by their state.
    #[arg(short, long)]
    kernel_config: Option<PathBuf>,

    /// Also show options that have no display text.
    #[arg(long)]
    include_unnamed: bool,

    /// Match the pattern case-sensitively.
    #[arg(long)]
    no_ignore_case: bool,

    /// Append the {file:line} origin of every shown option.
    #[arg(long)]
    show_origin: bool,

    /// Print captured help text under every shown option.
    #[arg(long)]
    show_help: bool,

    /// Append the accumulated dependency conditions of every shown option.
    #[arg(long)]
    show_conditions: bool,

    /// Prefix shown entries with a [k] navigation key.
    #[arg(long)]
    show_keys: bool,

    /// Keep the flat file order instead of reconstructing submenus.
    #[arg(long)]
    no_submenus: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut tree = Scanner::new(&args.kernel_path, args.startfile.as_str())
        .with_replacement("$SRCARCH", args.arch.as_str())
        .scan()?;
    if !args.no_submenus {
        rebuild_submenus(&mut tree);
    }

    let regex = args
        .search
        .as_deref()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(!args.no_ignore_case)
                .build()
        })
        .transpose()
        .context("invalid search pattern")?;
    let matches = search(
        &mut tree,
        &SearchSpec {
            regex,
            include_unnamed: args.include_unnamed,
        },
    );
    if matches == 0 {
        println!("Sorry, no search results that matched your criteria.");
        return Ok(());
    }

    let states = args
        .kernel_config
        .as_deref()
        .map(ConfigStates::load)
        .transpose()?;
    let spec = DumpSpec {
        show_origin: args.show_origin,
        show_help: args.show_help,
        show_conditions: args.show_conditions,
        show_keys: args.show_keys,
        states,
    };
    print!("{}", render::render(&tree, &spec));
    Ok(())
}
