use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use playpen_render_html::{render_frame, FrameOptions};
use playpen_session::{EditingSession, HttpBackend, LoadOutcome, EXPORT_FILE_NAME};
use playpen_snippet::{Layout, SnippetId, SourceKind, TEMPLATES};
use reqwest::Url;
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "playpen", about = "Save, load and preview playground snippets")]
struct Args {
    /// Snippet store server
    #[arg(long, global = true, env = "PLAYPEN_SERVER", default_value = "http://localhost:3001")]
    server: String,

    /// Playground URL that share links point at
    #[arg(long, global = true, env = "PLAYPEN_ORIGIN", default_value = "http://localhost:3000")]
    origin: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save sources to the store and print the share link
    Save {
        /// Start from this template instead of the default
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        css: Option<PathBuf>,
        #[arg(long)]
        js: Option<PathBuf>,
    },
    /// Load a snippet (id or share URL) and write its sources to a directory
    Load {
        reference: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Write the preview page for a snippet (id or share URL)
    Preview {
        reference: String,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// `side` shows the sources next to the preview, `full` the preview alone
        #[arg(long, default_value = "full")]
        layout: Layout,
        /// Write the bare composed document instead of a sandboxed host page
        #[arg(long)]
        raw: bool,
    },
    /// Download a snippet (id or share URL) as pretty JSON
    Export {
        reference: String,
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// List the built-in templates
    Templates,
}

type Session = EditingSession<HttpBackend>;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("playpen=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let origin = Url::parse(&args.origin).with_context(|| format!("invalid --origin '{}'", args.origin))?;
    let backend = HttpBackend::new(&args.server).with_context(|| format!("invalid --server '{}'", args.server))?;
    let mut session = EditingSession::new(backend, origin);

    match args.command {
        Command::Save { template, html, css, js } => {
            if let Some(name) = template {
                session.apply_template(&name)?;
            }
            for (kind, path) in [(SourceKind::Html, html), (SourceKind::Css, css), (SourceKind::Js, js)] {
                if let Some(path) = path {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("read failed: {}", path.display()))?;
                    session.set_source(kind, text);
                }
            }
            let link = session.save().await?;
            println!("{}", link.url);
        }
        Command::Load { reference, out_dir } => {
            let id = open_reference(&mut session, &reference).await?;
            write_sources(&session, &out_dir)?;
            eprintln!("loaded {} into {}", id, out_dir.display());
        }
        Command::Preview { reference, out, layout, raw } => {
            open_reference(&mut session, &reference).await?;
            session.set_layout(layout);
            let page = preview_page(&mut session, raw);
            match out {
                Some(path) => fs::write(&path, page).with_context(|| format!("write failed: {}", path.display()))?,
                None => println!("{}", page),
            }
        }
        Command::Export { reference, out } => {
            open_reference(&mut session, &reference).await?;
            let json = session.export_json()?;
            fs::write(&out, json).with_context(|| format!("write failed: {}", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        Command::Templates => {
            for t in TEMPLATES {
                println!("{:<8} {}", t.name, t.label);
            }
        }
    }

    Ok(())
}

/// Load an id or share URL into the session.
async fn open_reference(session: &mut Session, reference: &str) -> Result<SnippetId> {
    tracing::debug!(reference, "loading snippet");
    let outcome = if is_url(reference) {
        session.load_from_url(reference).await
    } else {
        session.load_from_reference(reference).await
    };
    match outcome {
        LoadOutcome::Loaded(id) => Ok(id),
        LoadOutcome::Skipped => bail!("no snippet id in '{}'", reference),
        LoadOutcome::Fallback => Err(anyhow!("Snippet not found: {}", reference)),
    }
}

fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

fn preview_page(session: &mut Session, raw: bool) -> String {
    let document = session.flush_preview().document;
    if raw {
        return document;
    }
    let opts = FrameOptions {
        share_url: session.share_url(),
        sources: session
            .layout()
            .shows_editors()
            .then(|| session.working().clone()),
        ..FrameOptions::default()
    };
    render_frame(&document, &opts)
}

fn source_file(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Html => "index.html",
        SourceKind::Css => "style.css",
        SourceKind::Js => "script.js",
    }
}

fn write_sources(session: &Session, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create failed: {}", out_dir.display()))?;
    for kind in SourceKind::ALL {
        let path = out_dir.join(source_file(kind));
        fs::write(&path, session.source(kind)).with_context(|| format!("write failed: {}", path.display()))?;
    }
    Ok(())
}
