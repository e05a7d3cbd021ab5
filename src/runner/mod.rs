//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! builds a [`Translator`] from the configuration and the command line, then
//! runs the requested subcommand against it.

mod error;

pub use error::RunnerError;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use minijinja::{Environment, context, path_loader};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::cli::{AcceptableArgs, Cli, Commands, RenderArgs, TranslateArgs};
use crate::config::{I18nConfig, OperatingMode};
use crate::locale::LocaleRequest;
use crate::locale_resolution::{
    EnvProvider, SysLocale, SystemEnv, SystemLocale, resolve_session_locale,
};
use crate::template;
use crate::translator::{TranslateOptions, Translator};

/// Execute the parsed [`Cli`] command, writing results to `out`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, loading fails in
/// strict mode, or the subcommand fails.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    run_with(cli, out, &SystemEnv, &SysLocale)
}

/// Variant of [`run`] with injectable locale sources.
///
/// # Errors
///
/// See [`run`].
pub fn run_with(
    cli: &Cli,
    out: &mut impl Write,
    env: &impl EnvProvider,
    system: &impl SystemLocale,
) -> Result<()> {
    let config = resolve_config(cli, env, system)?;
    debug!(?config, "resolved configuration");
    let (translator, report) = Translator::from_config(&config);
    if cli.strict && !report.is_clean() {
        return Err(RunnerError::LoadFailed {
            count: report.failures.len(),
            failures: report.failures,
        }
        .into());
    }
    info!(
        locales = ?translator.store().locales().collect::<Vec<_>>(),
        mode = ?translator.mode(),
        "translator ready"
    );

    match &cli.command {
        Commands::Translate(args) => translate(&translator, args, out),
        Commands::Acceptable(args) => acceptable(&translator, args, out),
        Commands::Render(args) => render(translator, args, out),
    }
}

/// Merge the configuration file with command-line overrides.
///
/// Load directories given on the command line are appended to the
/// configured ones. Without a configured session locale the host locale is
/// used.
fn resolve_config(
    cli: &Cli,
    env: &impl EnvProvider,
    system: &impl SystemLocale,
) -> Result<I18nConfig> {
    let mut config = match &cli.config {
        Some(path) => I18nConfig::from_file(path)?,
        None => I18nConfig::default(),
    };
    config.load_paths.extend(cli.dirs.iter().cloned());
    if let Some(default_locale) = &cli.default_locale {
        config.default_locale = Some(default_locale.clone());
    }
    if cli.production {
        config.mode = Some(OperatingMode::Production);
    }
    if config.locale.is_none() {
        config.locale = resolve_session_locale(env, system).map(LocaleRequest::One);
    }
    Ok(config)
}

fn translate(translator: &Translator, args: &TranslateArgs, out: &mut impl Write) -> Result<()> {
    let options = translate_options(args)?;
    let text = translator
        .translate(&args.key, &options)
        .with_context(|| format!("translate '{}'", args.key))?;
    writeln!(out, "{text}").context("write translation")?;
    Ok(())
}

fn translate_options(args: &TranslateArgs) -> Result<TranslateOptions, RunnerError> {
    let mut options = TranslateOptions::new();
    if !args.locales.is_empty() {
        options = options.with_locale(args.locales.clone());
    }
    if let Some(view_path) = &args.view_path {
        options = options.with_view_path(view_path.split('/'));
    }
    options.count.clone_from(&args.count);
    for (name, value) in &args.args {
        insert_arg(&mut options.args, name, value)?;
    }
    Ok(options)
}

/// Insert `value` at the dotted `name`, creating intermediate objects.
fn insert_arg(args: &mut Map<String, Value>, name: &str, value: &str) -> Result<(), RunnerError> {
    let conflict = || RunnerError::ArgumentConflict {
        name: name.to_owned(),
    };
    let (parents, leaf) = match name.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, name),
    };
    let mut node = args;
    for segment in parents.into_iter().flat_map(|path| path.split('.')) {
        let entry = node
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        node = match entry {
            Value::Object(map) => map,
            _ => return Err(conflict()),
        };
    }
    if node.get(leaf).is_some_and(Value::is_object) {
        return Err(conflict());
    }
    node.insert(leaf.to_owned(), Value::String(value.to_owned()));
    Ok(())
}

fn acceptable(translator: &Translator, args: &AcceptableArgs, out: &mut impl Write) -> Result<()> {
    let mut options = TranslateOptions::new();
    if !args.locales.is_empty() {
        options = options.with_locale(args.locales.clone());
    }
    let locale = translator.acceptable_for(&options).ok_or_else(|| RunnerError::NoAcceptableLocale {
        chain: translator.effective_locale(&options).to_string(),
    })?;
    writeln!(out, "{locale}").context("write locale")?;
    Ok(())
}

fn render(translator: Translator, args: &RenderArgs, out: &mut impl Write) -> Result<()> {
    let mut env = Environment::new();
    env.set_loader(path_loader(args.views.as_std_path()));
    template::register(&mut env, Arc::new(translator), args.app.clone());

    let tmpl = env
        .get_template(&args.template)
        .with_context(|| format!("load template '{}' from {}", args.template, args.views))?;
    let ctx = if args.locales.is_empty() {
        context! {}
    } else {
        context! { locale => &args.locales }
    };
    let rendered = tmpl
        .render(ctx)
        .with_context(|| format!("render template '{}'", args.template))?;
    writeln!(out, "{rendered}").context("write rendered template")?;
    Ok(())
}
