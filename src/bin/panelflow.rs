use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use panelflow::{
    Chapter, ChapterLayout, EventLog, LayerKind, MemoryBackend, NavCommand, Navigator, ReaderOpts,
    Size, SoundKey, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "panelflow", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved panel geometry and audio preload list as JSON.
    Inspect(InspectArgs),
    /// Run a headless reading session and print notifications and audio operations as JSON lines.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input chapter JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Use this size (`WxH`) for every page instead of reading the page images.
    #[arg(long)]
    page_size: Option<String>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input chapter JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Comma-separated commands: first, next, prev, last, refocus.
    #[arg(long)]
    script: String,

    /// Use this size (`WxH`) for every page instead of reading the page images.
    #[arg(long)]
    page_size: Option<String>,

    /// Viewport size (`WxH`).
    #[arg(long, default_value = "1280x720")]
    viewport: String,

    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Time to keep ticking after each command settles, in milliseconds.
    #[arg(long, default_value_t = 600.0)]
    hold_ms: f64,

    /// Reader options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sound keys (for example `sfx-hit.wav`) the backend fails to play.
    #[arg(long)]
    missing: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn parse_dims(s: &str) -> anyhow::Result<(f64, f64)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().with_context(|| format!("bad width in '{s}'"))?;
    let h: f64 = h.trim().parse().with_context(|| format!("bad height in '{s}'"))?;
    Ok((w, h))
}

fn load(in_path: &Path, page_size: Option<&str>) -> anyhow::Result<(Chapter, Vec<Size>)> {
    let chapter = Chapter::from_path(in_path)?;
    let extents = match page_size {
        Some(s) => {
            let (w, h) = parse_dims(s)?;
            vec![Size::new(w, h); chapter.pages.len()]
        }
        None => {
            let root = in_path.parent().unwrap_or_else(|| Path::new("."));
            panelflow::probe_page_extents(&chapter, root)?
        }
    };
    Ok((chapter, extents))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (chapter, extents) = load(&args.in_path, args.page_size.as_deref())?;
    let layout = ChapterLayout::build(&chapter, &extents)?;

    let panels: Vec<_> = layout
        .panels()
        .iter()
        .map(|p| {
            let b = p.geometry.bounds;
            serde_json::json!({
                "index": p.index,
                "page": p.page,
                "panelInPage": p.panel_in_page,
                "bounds": [b.x0, b.y0, b.x1, b.y1],
                "center": [p.geometry.center.x, p.geometry.center.y],
            })
        })
        .collect();
    let report = serde_json::json!({
        "panelCount": layout.len(),
        "pages": layout.pages(),
        "panels": panels,
        "preload": panelflow::preload_manifest(&chapter),
    });

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let (chapter, extents) = load(&args.in_path, args.page_size.as_deref())?;
    let (vw, vh) = parse_dims(&args.viewport)?;
    let viewport = Viewport::new(vw, vh)?;
    let opts = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            ReaderOpts::from_json(&json)?
        }
        None => ReaderOpts::default(),
    };
    anyhow::ensure!(
        args.frame_ms.is_finite() && args.frame_ms > 0.0,
        "--frame-ms must be positive"
    );
    let commands = args
        .script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<NavCommand>)
        .collect::<Result<Vec<_>, _>>()?;
    let missing = args
        .missing
        .iter()
        .map(|s| s.parse::<SoundKey>())
        .collect::<Result<Vec<_>, _>>()?;

    let backend = MemoryBackend::with_missing(missing);
    let mut nav = Navigator::new(&chapter, &extents, viewport, backend.clone(), opts)?;
    let log = EventLog::new();
    nav.subscribe(log.clone());

    let mut out = std::io::stdout().lock();
    nav.start();
    flush(&mut out, &log, &backend)?;

    for command in commands {
        let accepted = nav.handle(command);
        let line = serde_json::json!({ "command": command, "accepted": accepted });
        writeln!(out, "{line}")?;
        let mut held = 0.0;
        while nav.is_focusing() || held < args.hold_ms {
            nav.tick(args.frame_ms);
            if !nav.is_focusing() {
                held += args.frame_ms;
            }
        }
        flush(&mut out, &log, &backend)?;
    }

    let active: serde_json::Map<String, serde_json::Value> = LayerKind::ALL
        .iter()
        .map(|&l| (l.to_string(), serde_json::json!(nav.mixer().active_keys(l))))
        .collect();
    let camera = nav.camera();
    let summary = serde_json::json!({
        "current": nav.current_index(),
        "active": active,
        "camera": { "center": [camera.center().x, camera.center().y], "zoom": camera.zoom() },
    });
    writeln!(out, "{summary}")?;
    nav.dispose();
    Ok(())
}

fn flush(out: &mut impl std::io::Write, log: &EventLog, backend: &MemoryBackend) -> anyhow::Result<()> {
    for event in log.take() {
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
    }
    for op in backend.take_log() {
        writeln!(out, "{}", serde_json::to_string(&op)?)?;
    }
    Ok(())
}
