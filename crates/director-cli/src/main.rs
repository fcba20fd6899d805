use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use director_schema::{EditOp, EditRequest, EmbedConfig, EmbedMode, TreeControl, VisibilityEntry};
use lottie_data::Document;
use lottie_edit::{
    check_output, count_layers, count_shapes, load_request, render_output, DocumentStore,
    NameMatcher, SliderBounds, DEFAULT_NEEDLE,
};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum EmbedModeArg {
    Initial,
    Update,
    Page,
}

impl From<EmbedModeArg> for EmbedMode {
    fn from(mode: EmbedModeArg) -> Self {
        match mode {
            EmbedModeArg::Initial => EmbedMode::Initial,
            EmbedModeArg::Update => EmbedMode::Update,
            EmbedModeArg::Page => EmbedMode::Page,
        }
    }
}

/// Animation to read and which layers count as trees.
#[derive(Args, Debug, Clone)]
struct Source {
    /// Lottie JSON file
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Case-insensitive substring that marks a layer as a tree
    #[arg(long, default_value = DEFAULT_NEEDLE)]
    matcher: String,
}

#[derive(Args, Debug, Clone)]
struct Io {
    #[command(flatten)]
    source: Source,

    /// Where to write the result (stdout when omitted)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Allow writing over the input file. Without --out, writes back to --in.
    #[arg(long)]
    in_place: bool,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print how many layers match, or how many top-level shapes have a matching name
    Count {
        #[command(flatten)]
        source: Source,

        /// Count shapes, in any layer, whose name matches
        #[arg(long)]
        shapes: bool,
    },
    /// Move every tree by (dx, dy)
    Offset {
        #[command(flatten)]
        io: Io,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
    },
    /// Set or multiply the scale of every tree
    Scale {
        #[command(flatten)]
        io: Io,
        /// Absolute scale in percent
        #[arg(long, conflicts_with = "factor", required_unless_present = "factor")]
        value: Option<f64>,
        /// Multiplier applied to the current scale
        #[arg(long)]
        factor: Option<f64>,
    },
    /// Apply per-tree slider values given as X:Y:SCALE (empty fields are left alone)
    Controls {
        #[command(flatten)]
        io: Io,
        #[arg(long = "tree", value_name = "X:Y:SCALE", value_parser = parse_control)]
        trees: Vec<TreeControl>,
    },
    /// Copy a tree, shift the copy and append it
    Duplicate {
        #[command(flatten)]
        io: Io,
        /// Tree ordinal to copy
        #[arg(long, default_value_t = 0)]
        template: usize,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
        /// Name for the copy
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove the last tree
    RemoveLast {
        #[command(flatten)]
        io: Io,
    },
    /// Remove trees from the end until TARGET remain
    Trim {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        target: usize,
    },
    /// Grow or shrink to exactly TARGET trees
    SetCount {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        target: usize,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
    },
    /// Keep only the listed shape numbers on every tree
    FilterShapes {
        #[command(flatten)]
        io: Io,
        /// Comma-separated shape numbers (built-in list when omitted)
        #[arg(long, value_delimiter = ',')]
        allow: Option<Vec<usize>>,
    },
    /// Lay trees out on a row-major grid
    Grid {
        #[command(flatten)]
        io: Io,
        #[arg(long, default_value_t = 6)]
        count: usize,
        #[arg(long, default_value_t = 3)]
        columns: usize,
        #[arg(long, allow_hyphen_values = true)]
        origin_x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        origin_y: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        spacing_x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        spacing_y: Option<f64>,
    },
    /// Show or hide trees by ordinal, or shapes by shape number with --shapes
    Visibility {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_delimiter = ',')]
        show: Vec<usize>,
        #[arg(long, value_delimiter = ',')]
        hide: Vec<usize>,
        /// Indices are shape numbers inside every tree
        #[arg(long)]
        shapes: bool,
    },
    /// Filter and place "rows of trees" layers
    Prepare {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_delimiter = ',')]
        allow: Option<Vec<usize>>,
        #[arg(long, allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y: Option<f64>,
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Wrap the animation in an HTML player
    Embed {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_enum, default_value_t = EmbedModeArg::Initial)]
        mode: EmbedModeArg,
        #[arg(long)]
        container_id: Option<String>,
        /// CSS height of the player
        #[arg(long)]
        height: Option<String>,
        #[arg(long)]
        renderer: Option<String>,
        #[arg(long)]
        no_loop: bool,
        #[arg(long)]
        no_autoplay: bool,
        #[arg(long)]
        player_url: Option<String>,
    },
    /// Run a JSON edit request
    Apply {
        /// Request file
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
        /// Overrides the request's input
        #[arg(long = "in", value_name = "FILE")]
        input: Option<PathBuf>,
        /// Overrides the request's output
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        #[arg(long)]
        in_place: bool,
    },
}

fn parse_control(s: &str) -> Result<TreeControl, String> {
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() > 3 {
        return Err(format!("expected X:Y:SCALE, got {s:?}"));
    }
    let field = |i: usize| -> Result<Option<f64>, String> {
        match fields.get(i).map(|f| f.trim()) {
            None | Some("") => Ok(None),
            Some(f) => f
                .parse()
                .map(Some)
                .map_err(|e| format!("bad number {f:?}: {e}")),
        }
    };
    Ok(TreeControl {
        x: field(0)?,
        y: field(1)?,
        scale: field(2)?,
    })
}

fn visibility_entries(show: &[usize], hide: &[usize]) -> Vec<VisibilityEntry> {
    let shown = show.iter().map(|&index| VisibilityEntry { index, visible: true });
    let hidden = hide.iter().map(|&index| VisibilityEntry { index, visible: false });
    shown.chain(hidden).collect()
}

impl Io {
    fn into_request(self, ops: Vec<EditOp>, embed: Option<EmbedConfig>) -> (EditRequest, bool) {
        let output = self
            .out
            .or_else(|| self.in_place.then(|| self.source.input.clone()));
        let request = EditRequest {
            input: Some(self.source.input),
            output,
            matcher: self.source.matcher,
            pretty: !self.compact,
            ops,
            embed,
        };
        (request, self.in_place)
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(cli.log_level).into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    let (request, in_place) = match command {
        Command::Count { source, shapes } => {
            let doc = Document::load(&source.input)
                .with_context(|| format!("Failed to read {}", source.input.display()))?;
            let matcher = NameMatcher::new(&source.matcher);
            let n = if shapes {
                count_shapes(&doc, &matcher)
            } else {
                count_layers(&doc, &matcher)
            };
            println!("{n}");
            return Ok(());
        }
        Command::Apply {
            request,
            input,
            out,
            in_place,
        } => {
            let text = fs::read_to_string(&request)
                .with_context(|| format!("Failed to read request {}", request.display()))?;
            let mut parsed: EditRequest = serde_json::from_str(&text)
                .with_context(|| format!("Invalid request {}", request.display()))?;
            if input.is_some() {
                parsed.input = input;
            }
            if out.is_some() {
                parsed.output = out;
            }
            (parsed, in_place)
        }
        Command::Offset { io, dx, dy } => io.into_request(vec![EditOp::Offset { dx, dy }], None),
        Command::Scale { io, value, factor } => {
            let op = match (value, factor) {
                (Some(value), _) => EditOp::SetScale { value },
                (None, Some(factor)) => EditOp::ScaleBy { factor },
                (None, None) => bail!("either --value or --factor is required"),
            };
            io.into_request(vec![op], None)
        }
        Command::Controls { io, trees } => io.into_request(vec![EditOp::Controls { trees }], None),
        Command::Duplicate {
            io,
            template,
            dx,
            dy,
            name,
        } => io.into_request(
            vec![EditOp::Duplicate {
                template,
                dx,
                dy,
                name,
            }],
            None,
        ),
        Command::RemoveLast { io } => io.into_request(vec![EditOp::RemoveLast], None),
        Command::Trim { io, target } => io.into_request(vec![EditOp::Trim { target }], None),
        Command::SetCount { io, target, dx, dy } => {
            io.into_request(vec![EditOp::SetCount { target, dx, dy }], None)
        }
        Command::FilterShapes { io, allow } => {
            io.into_request(vec![EditOp::FilterShapes { allow }], None)
        }
        Command::Grid {
            io,
            count,
            columns,
            origin_x,
            origin_y,
            spacing_x,
            spacing_y,
        } => io.into_request(
            vec![EditOp::Grid {
                count,
                columns,
                origin_x,
                origin_y,
                spacing_x,
                spacing_y,
            }],
            None,
        ),
        Command::Visibility {
            io,
            show,
            hide,
            shapes,
        } => {
            let entries = visibility_entries(&show, &hide);
            let op = if shapes {
                EditOp::ShapeVisibility { entries }
            } else {
                EditOp::LayerVisibility { entries }
            };
            io.into_request(vec![op], None)
        }
        Command::Prepare {
            io,
            allow,
            x,
            y,
            scale,
        } => io.into_request(
            vec![EditOp::PrepareRowsOfTrees { allow, x, y, scale }],
            None,
        ),
        Command::Embed {
            io,
            mode,
            container_id,
            height,
            renderer,
            no_loop,
            no_autoplay,
            player_url,
        } => {
            let defaults = EmbedConfig::default();
            let config = EmbedConfig {
                mode: mode.into(),
                container_id: container_id.unwrap_or(defaults.container_id),
                height: height.unwrap_or(defaults.height),
                renderer: renderer.unwrap_or(defaults.renderer),
                loop_animation: !no_loop,
                autoplay: !no_autoplay,
                player_url,
            };
            io.into_request(Vec::new(), Some(config))
        }
    };
    execute(&request, in_place)
}

fn execute(request: &EditRequest, in_place: bool) -> Result<()> {
    let Some(input) = request.input.as_deref() else {
        bail!("no input animation given (use --in or set \"input\" in the request)");
    };
    if let Some(output) = request.output.as_deref() {
        check_output(Some(input), output, in_place)?;
    }

    info!("Input: {:?}", input);
    let store = DocumentStore::new();
    let edited = load_request(request, &store, &SliderBounds::default())
        .with_context(|| format!("Failed to edit {}", input.display()))?;
    for op in &edited.report.ops {
        info!(op = op.op, affected = op.affected, "operation applied");
    }

    let text = render_output(&edited.document, request)?;
    match request.output.as_deref() {
        Some(output) => {
            fs::write(output, text)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Output: {:?}", output);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    info!(
        trees_before = edited.report.trees_before,
        trees_after = edited.report.trees_after,
        "done"
    );
    Ok(())
}
