//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. Global
//! flags describe where translations come from and how the translator
//! behaves; each subcommand exercises one part of the library.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use serde_json::Number;

use crate::loader::LoadPath;

mod parsing;

use parsing::{parse_arg, parse_count, parse_load_path, parse_locale};

/// Look up hierarchical translations from JSON and YAML files.
#[derive(Debug, Parser)]
#[command(name = "keyglot", author, version, about, long_about = None)]
pub struct Cli {
    /// Translation directory to load; `NS=DIR` mounts it under namespace NS.
    #[arg(short, long = "dir", value_name = "[NS=]DIR", value_parser = parse_load_path)]
    pub dirs: Vec<LoadPath>,

    /// JSON or YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Locale appended to every fallback chain.
    #[arg(long, value_name = "LOCALE", value_parser = parse_locale)]
    pub default_locale: Option<String>,

    /// Render missing keys as the key itself instead of failing.
    #[arg(long)]
    pub production: bool,

    /// Fail when any translation file cannot be loaded.
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments accepted by the `translate` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct TranslateArgs {
    /// Dotted key to translate.
    pub key: String,

    /// Locale preference for this lookup; repeat for a list.
    #[arg(short, long = "locale", value_name = "LOCALE", value_parser = parse_locale)]
    pub locales: Vec<String>,

    /// View scope as a `/`-separated path, for example `users/show`.
    #[arg(long, value_name = "PATH")]
    pub view_path: Option<String>,

    /// Count used to select a plural form.
    #[arg(short = 'n', long, value_name = "N", value_parser = parse_count)]
    pub count: Option<Number>,

    /// Interpolation argument; dotted names build nested values.
    #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_arg)]
    pub args: Vec<(String, String)>,
}

/// Arguments accepted by the `acceptable` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct AcceptableArgs {
    /// Locale preference to check; defaults to the session locale.
    #[arg(short, long = "locale", value_name = "LOCALE", value_parser = parse_locale)]
    pub locales: Vec<String>,
}

/// Arguments accepted by the `render` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct RenderArgs {
    /// Template name relative to the views directory.
    pub template: String,

    /// Directory templates are loaded from.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub views: Utf8PathBuf,

    /// Application name prefixed to every template's view scope.
    #[arg(long, value_name = "NAME")]
    pub app: Option<String>,

    /// Locale exposed to the template as `locale`; repeat for a list.
    #[arg(short, long = "locale", value_name = "LOCALE", value_parser = parse_locale)]
    pub locales: Vec<String>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Translate a key and print the result.
    Translate(TranslateArgs),

    /// Print the first locale of the chain that has translations.
    Acceptable(AcceptableArgs),

    /// Render a `MiniJinja` template with the `t` helper installed.
    Render(RenderArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_translate_with_every_option() {
        let cli = Cli::try_parse_from([
            "keyglot",
            "--dir",
            "locales",
            "--dir",
            "admin=admin/locales",
            "--production",
            "translate",
            "greeting",
            "-l",
            "pt_BR",
            "-l",
            "en",
            "--view-path",
            "users/show",
            "-n",
            "2",
            "--arg",
            "name.first=Ada",
        ])
        .expect("parse");
        assert_eq!(cli.dirs.len(), 2);
        assert!(cli.production);
        let Commands::Translate(args) = cli.command else {
            panic!("expected translate");
        };
        assert_eq!(args.locales, ["pt-BR", "en"]);
        assert_eq!(args.view_path.as_deref(), Some("users/show"));
        assert_eq!(args.count, Some(Number::from(2)));
        assert_eq!(args.args, [("name.first".to_owned(), "Ada".to_owned())]);
    }

    #[rstest]
    #[case(&["keyglot"])]
    #[case(&["keyglot", "translate"])]
    #[case(&["keyglot", "translate", "k", "--arg", "novalue"])]
    #[case(&["keyglot", "translate", "k", "--count", "many"])]
    #[case(&["keyglot", "acceptable", "--locale", ""])]
    fn rejects_invalid_invocations(#[case] argv: &[&str]) {
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[rstest]
    fn render_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["keyglot", "render", "index.html"]).expect("parse");
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.views, Utf8PathBuf::from("."));
        assert_eq!(args.template, "index.html");
    }
}
