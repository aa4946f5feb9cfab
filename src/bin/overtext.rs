use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "overtext", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one text overlay onto a background and write a PNG.
    Render(RenderArgs),
    /// Replay a JSON event script; every `export` event writes into the output directory.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlay text.
    #[arg(long)]
    text: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    x: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    y: Option<f64>,

    /// Font size in px, as typed into the size field.
    #[arg(long)]
    font_size: Option<String>,

    /// Font family name.
    #[arg(long)]
    font: Option<overtext::FontFamily>,

    /// Font file for the selected family, overriding the config.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Fill color (`#rrggbb`).
    #[arg(long)]
    fill: Option<overtext::HexColor>,

    /// Stroke color (`#rrggbb`).
    #[arg(long)]
    stroke: Option<overtext::HexColor>,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Event script: a JSON array of editor events.
    #[arg(long)]
    script: PathBuf,

    /// Directory exports are written into.
    #[arg(long)]
    out_dir: PathBuf,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Background image, overriding the config.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("OVERTEXT_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<overtext::EditorConfig> {
    let cfg = match path {
        Some(p) => overtext::EditorConfig::from_json_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => overtext::EditorConfig::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

fn make_backend(
    choice: BackendChoice,
    session: &overtext::EditorSession,
) -> anyhow::Result<Box<dyn overtext::RenderBackend>> {
    let kind = match choice {
        BackendChoice::Cpu => overtext::BackendKind::Cpu,
    };
    let settings = session.config().render_settings();
    Ok(overtext::create_backend(
        kind,
        &settings,
        session.fonts().clone(),
    )?)
}

fn wait_for_background(session: &mut overtext::EditorSession) -> anyhow::Result<()> {
    if let overtext::BackgroundState::Failed(msg) = session.wait_background() {
        anyhow::bail!("background failed to load: {msg}");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let mut fonts = config.load_fonts();
    let family = args.font.unwrap_or(config.defaults.font_family);
    if let Some(path) = &args.font_file {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        fonts.insert(family, bytes);
    }

    let mut session = overtext::EditorSession::with_fonts(config, fonts);
    session.load_background_from(&args.background);
    wait_for_background(&mut session)?;

    let mut backend = make_backend(args.backend, &session)?;
    let mut sink = overtext::InMemorySink::new();
    let mut io = overtext::SessionIo {
        backend: backend.as_mut(),
        sink: &mut sink,
    };

    let mut events = Vec::new();
    if let Some(text) = args.text {
        events.push(overtext::EditorEvent::Click);
        events.push(overtext::EditorEvent::Input { text });
        events.push(overtext::EditorEvent::Blur);
    }
    if args.x.is_some() || args.y.is_some() {
        let at = session.overlay().position();
        events.push(overtext::EditorEvent::Drag {
            x: args.x.unwrap_or(at.x),
            y: args.y.unwrap_or(at.y),
        });
    }
    if let Some(raw) = args.font_size {
        events.push(overtext::EditorEvent::FontSizeInput { raw });
    }
    events.push(overtext::EditorEvent::SetFontFamily { family });
    if let Some(color) = args.fill {
        events.push(overtext::EditorEvent::SetFillColor { color });
    }
    if let Some(color) = args.stroke {
        events.push(overtext::EditorEvent::SetStrokeColor { color });
    }
    events.push(overtext::EditorEvent::Export);

    for event in events {
        session
            .dispatch(event, &mut io)
            .context("apply render options")?;
    }

    let (_, bytes) = sink.last().context("render produced no export")?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let json = std::fs::read_to_string(&args.script)
        .with_context(|| format!("read script '{}'", args.script.display()))?;
    let events = overtext::parse_script(&json)?;

    let mut session = overtext::EditorSession::new(config)?;
    match &args.background {
        Some(path) => session.load_background_from(path),
        None => session.load_background(),
    }
    wait_for_background(&mut session)?;

    let mut backend = make_backend(args.backend, &session)?;
    let mut sink = overtext::DirSink::new(&args.out_dir);
    let mut io = overtext::SessionIo {
        backend: backend.as_mut(),
        sink: &mut sink,
    };

    let mut exports = 0usize;
    for (i, event) in events.into_iter().enumerate() {
        let is_export = matches!(event, overtext::EditorEvent::Export);
        match session.dispatch(event, &mut io) {
            Ok(()) => exports += usize::from(is_export),
            Err(overtext::OvertextError::Validation(msg)) => {
                tracing::warn!(event = i, %msg, "event rejected");
            }
            Err(e) => return Err(e).with_context(|| format!("event #{i}")),
        }
        session.poll_background();
    }

    eprintln!(
        "replayed script; {exports} export(s) in {}",
        args.out_dir.display()
    );
    Ok(())
}
