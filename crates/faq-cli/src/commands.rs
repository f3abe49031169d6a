//! Subcommand implementations

use crate::render;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use faq_engine::{AdminSession, Assistant, DeskConfig, Document, EngineError, HttpAnswerProvider, ResolutionEngine};
use faq_sources::{export_snapshot, FeedSource};
use faq_tree::SelectionPath;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

pub(crate) async fn run(config: &DeskConfig, matches: &ArgMatches, json: bool) -> Result<ExitCode> {
    let engine = ResolutionEngine::from_config(config).context("failed to set up the resolution engine")?;

    let Some((name, args)) = matches.subcommand() else {
        bail!("no command given");
    };
    let json = json || args.get_flag("json");

    match name {
        "browse" => browse(&engine, args, json).await,
        "select" => select(&engine, args, json).await,
        "categories" => {
            let records = engine.categories();
            render::emit(json, &records, || render::categories(&records))?;
            Ok(ExitCode::SUCCESS)
        }
        "export-feed" => export_feed(config, args, json).await,
        "export" => {
            let out = required_path(args, "out")?;
            let admin = AdminSession::load(&engine).await;
            let digest = admin
                .export_snapshot(&out)
                .await
                .with_context(|| format!("failed to export to {}", out.display()))?;
            let source = admin.loaded_from();
            render::emit(
                json,
                &json!({"path": out, "source": source, "digest": digest}),
                || format!("exported {source} working copy to {} ({})", out.display(), digest.short()),
            )?;
            Ok(ExitCode::SUCCESS)
        }
        "reset" => {
            let mut admin = AdminSession::load(&engine).await;
            admin.reset_to_defaults().context("failed to clear the local store")?;
            render::emit(json, &json!({"reset": true}), || "local forest cleared".to_string())?;
            Ok(ExitCode::SUCCESS)
        }
        "ask" => ask(config, &engine, args, json).await,
        other => bail!("unknown command '{other}'"),
    }
}

fn required_path(args: &ArgMatches, id: &str) -> Result<PathBuf> {
    args.get_one::<PathBuf>(id)
        .cloned()
        .with_context(|| format!("--{id} is required"))
}

fn category_arg(args: &ArgMatches) -> Result<&str> {
    args.get_one::<String>("category")
        .map(String::as_str)
        .context("--category is required")
}

fn path_arg(args: &ArgMatches) -> Result<SelectionPath> {
    match args.get_one::<String>("path") {
        Some(raw) => raw.parse().with_context(|| format!("invalid path '{raw}'")),
        None => Ok(SelectionPath::root()),
    }
}

async fn browse(engine: &ResolutionEngine, args: &ArgMatches, json: bool) -> Result<ExitCode> {
    let category = category_arg(args)?;
    let path = path_arg(args)?;

    let resolution = engine.resolve(category, &path).await;
    let breadcrumb = engine.breadcrumb(category, &path).await;
    render::emit(
        json,
        &json!({"category": category, "path": path, "breadcrumb": breadcrumb, "resolution": resolution}),
        || render::resolution(&path, &breadcrumb, &resolution),
    )?;
    Ok(ExitCode::SUCCESS)
}

async fn select(engine: &ResolutionEngine, args: &ArgMatches, json: bool) -> Result<ExitCode> {
    let category = category_arg(args)?;
    let path = path_arg(args)?;
    let option = args.get_one::<String>("option").context("--option is required")?;

    let outcome = engine.select(category, &path, option).await;
    render::emit(json, &outcome, || render::select_outcome(&outcome))?;
    Ok(ExitCode::SUCCESS)
}

async fn export_feed(config: &DeskConfig, args: &ArgMatches, json: bool) -> Result<ExitCode> {
    let out = required_path(args, "out")?;
    let location = config
        .feed
        .location()
        .ok_or(EngineError::SourceNotConfigured("feed"))?;
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("failed to build http client")?;

    let feed = FeedSource::new(location, client);
    let Some(forest) = faq_sources::ForestSource::fetch(&feed).await.context("failed to read the feed")? else {
        warn!(url = %feed.location().url(), "feed yielded no data, nothing exported");
        return Ok(ExitCode::FAILURE);
    };

    export_snapshot(&forest, &out)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
    let digest = forest.digest();
    info!(path = %out.display(), categories = forest.len(), "feed exported");
    render::emit(
        json,
        &json!({"path": out, "categories": forest.len(), "nodes": forest.node_count(), "digest": digest}),
        || {
            format!(
                "exported {} categories ({} nodes) to {} ({})",
                forest.len(),
                forest.node_count(),
                out.display(),
                digest.short()
            )
        },
    )?;
    Ok(ExitCode::SUCCESS)
}

async fn ask(config: &DeskConfig, engine: &ResolutionEngine, args: &ArgMatches, json: bool) -> Result<ExitCode> {
    let question = args.get_one::<String>("question").context("--question is required")?;
    let endpoint = config
        .assist_url
        .clone()
        .ok_or(EngineError::SourceNotConfigured("answer service"))?;

    let category = match args.get_one::<String>("category") {
        Some(id) => Some(
            engine
                .categories()
                .into_iter()
                .find(|record| &record.id == id)
                .with_context(|| format!("unknown category '{id}'"))?,
        ),
        None => None,
    };

    let mut documents = Vec::new();
    for path in args.get_many::<PathBuf>("context-file").into_iter().flatten() {
        let document = Document::from_file(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        documents.push(document);
    }

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .context("failed to build http client")?;
    let assistant = Assistant::new(HttpAnswerProvider::new(endpoint, client), documents);
    let outcome = assistant
        .ask(question, category.as_ref())
        .await
        .context("failed to get an answer")?;
    render::emit(json, &outcome, || render::assist(&outcome))?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches {
        crate::cli().try_get_matches_from(args).unwrap()
    }

    #[tokio::test]
    async fn export_writes_default_working_copy() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("snapshot.json");
        let config = DeskConfig::new().with_store_dir(dir.path().join("store"));

        let code = run(&config, &matches(&["faq-desk", "export", "--out", out.to_str().unwrap()]), true)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(out.exists());
    }

    #[tokio::test]
    async fn export_feed_requires_a_feed() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeskConfig::new().with_store_dir(dir.path());
        let out = dir.path().join("feed.json");

        let err = run(&config, &matches(&["faq-desk", "export-feed", "--out", out.to_str().unwrap()]), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("feed"));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn ask_requires_answer_service() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeskConfig::new().with_store_dir(dir.path());

        let result = run(
            &config,
            &matches(&["faq-desk", "ask", "-q", "기간은?", "--context-file", "faq.md"]),
            false,
        )
        .await;
        assert!(result.is_err());
    }
}
