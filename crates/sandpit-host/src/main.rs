use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sandpit_compose::{compose, CompositionMode, SourceKind, TemplateStore};
use sandpit_host::{
    Clipboard, DownloadArtifact, FileSink, FsFileSink, PlaygroundConfig, SourceBuffers,
    StdoutClipboard,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn source_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("html")
            .long("html")
            .value_parser(value_parser!(PathBuf))
            .help("Markup file (defaults to the stock template)"),
    )
    .arg(
        Arg::new("css")
            .long("css")
            .value_parser(value_parser!(PathBuf))
            .help("Style file (defaults to the stock template)"),
    )
    .arg(
        Arg::new("js")
            .long("js")
            .value_parser(value_parser!(PathBuf))
            .help("Script file (defaults to the stock template)"),
    )
}

fn cli() -> Command {
    Command::new("sandpit")
        .version(sandpit_host::VERSION)
        .about("HTML/CSS/JS playground toolkit")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Playground config (TOML)"),
        )
        .subcommand(
            Command::new("defaults")
                .about("Print the stock template snippets")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(value_parser!(SourceKind))
                        .help("Only this buffer (html, css or js)"),
                ),
        )
        .subcommand(
            source_args(Command::new("compose").about("Compose a single HTML document"))
                .arg(
                    Arg::new("download")
                        .long("download")
                        .action(ArgAction::SetTrue)
                        .help("Plain document without the console bridge"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write to a file instead of stdout"),
                ),
        )
        .subcommand(source_args(
            Command::new("copy").about("Print the labeled clipboard text"),
        ))
        .subcommand(
            source_args(Command::new("download").about("Save the plain document"))
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to save into"),
                ),
        )
}

async fn load_buffers(args: &ArgMatches) -> anyhow::Result<SourceBuffers> {
    let mut buffers = SourceBuffers::from_templates(&TemplateStore::default());
    for kind in SourceKind::ALL {
        if let Some(path) = args.get_one::<PathBuf>(kind.tab_id()) {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {} source {}", kind.label(), path.display()))?;
            buffers.set_text(kind, text);
        }
    }
    Ok(buffers)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => PlaygroundConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlaygroundConfig::default(),
    };

    match matches.subcommand() {
        Some(("defaults", args)) => {
            let templates = TemplateStore::default();
            match args.get_one::<SourceKind>("kind") {
                Some(kind) => println!("{}", templates.get_default(*kind)),
                None => {
                    for kind in SourceKind::ALL {
                        println!("--- {} ---", kind.label());
                        println!("{}", templates.get_default(kind));
                    }
                }
            }
        }
        Some(("compose", args)) => {
            let buffers = load_buffers(args).await?;
            let mode = if args.get_flag("download") {
                CompositionMode::Download
            } else {
                CompositionMode::Preview
            };
            let document = compose(&buffers.sources(), mode);
            match args.get_one::<PathBuf>("out") {
                Some(out) => {
                    tokio::fs::write(out, document.as_bytes())
                        .await
                        .with_context(|| format!("writing {}", out.display()))?;
                    tracing::info!(path = %out.display(), ?mode, "document written");
                }
                None => println!("{document}"),
            }
        }
        Some(("copy", args)) => {
            let buffers = load_buffers(args).await?;
            StdoutClipboard.write_text(&buffers.clipboard_text()).await?;
        }
        Some(("download", args)) => {
            let buffers = load_buffers(args).await?;
            let dir = args
                .get_one::<PathBuf>("dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            let document = compose(&buffers.sources(), CompositionMode::Download);
            let artifact = DownloadArtifact::from_document(&config.download_filename, document);
            FsFileSink::new(dir).save(&artifact).await?;
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}
