//! `faq-desk`: browse, publish and query the support desk's preset answers

mod commands;
mod render;

use clap::{value_parser, Arg, ArgAction, Command};
use faq_engine::DeskConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

fn cli() -> Command {
    let category = Arg::new("category")
        .long("category")
        .short('c')
        .required(true)
        .help("Category id, e.g. support");
    let path = Arg::new("path")
        .long("path")
        .short('p')
        .help("Selection path, '/'-separated node ids (default: top level)");

    Command::new("faq-desk")
        .version(faq_engine::VERSION)
        .about("Preset-answer desk for the support chat")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .subcommand(
            Command::new("browse")
                .about("Show what the chat displays at a path")
                .arg(category.clone())
                .arg(path.clone()),
        )
        .subcommand(
            Command::new("select")
                .about("Select an option at a path")
                .arg(category.clone())
                .arg(path)
                .arg(
                    Arg::new("option")
                        .long("option")
                        .short('o')
                        .required(true)
                        .help("Id of the displayed option"),
                ),
        )
        .subcommand(Command::new("categories").about("List categories"))
        .subcommand(
            Command::new("export-feed")
                .about("Fetch the spreadsheet feed and write it as a snapshot")
                .arg(out_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Write the current working copy as a snapshot")
                .arg(out_arg()),
        )
        .subcommand(Command::new("reset").about("Drop the local forest and fall back to other sources"))
        .subcommand(
            Command::new("ask")
                .about("Ask a free-text question against reference documents")
                .arg(
                    Arg::new("question")
                        .long("question")
                        .short('q')
                        .required(true)
                        .help("Question text"),
                )
                .arg(category.required(false))
                .arg(
                    Arg::new("context-file")
                        .long("context-file")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf))
                        .help("Reference document; repeat for several"),
                ),
        )
}

fn out_arg() -> Arg {
    Arg::new("out")
        .long("out")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Snapshot file to write")
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();

    let matches = cli().get_matches();
    let json = matches.get_flag("json");
    let config = match DeskConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&config, &matches, json).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
