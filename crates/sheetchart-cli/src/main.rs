use serde::{Deserialize, Serialize};
use serde_json::Value;
use sheetchart::chart_type;
use sheetchart::render::{
    ChartService, HeadlessError, JsonRenderEngine, RenderAdapter, RenderLog, RenderSettings,
};
use sheetchart::{
    ChartDataConfig, ChartDataSource, ChartModelManager, ChartTypeBits, ModelOptions,
    SheetDataSource, build_context, get_output,
};
use std::io::Read;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const CHART_ID: &str = "cli";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Model(sheetchart::Error),
    Render(sheetchart_render::Error),
    UnknownChartType(String),
    NoChartType,
    NothingRendered,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::UnknownChartType(name) => write!(f, "Unknown chart type: {name}"),
            CliError::NoChartType => write!(f, "No chart type given (set \"chartType\" or --type)"),
            CliError::NothingRendered => write!(f, "Chart produced no render spec"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<sheetchart::Error> for CliError {
    fn from(value: sheetchart::Error) -> Self {
        Self::Model(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Model(err) => Self::Model(err),
            HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

impl From<sheetchart_render::Error> for CliError {
    fn from(value: sheetchart_render::Error) -> Self {
        Self::Render(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Context,
    Data,
    #[default]
    Spec,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    settings: Option<String>,
    chart_type: Option<String>,
}

/// A chart as the host would persist it, plus the range values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ChartDocument {
    data_source: ChartDataSource,
    data_config: ChartDataConfig,
    /// Chart type name (`"column-stacked"`) or raw bits.
    chart_type: Option<Value>,
    style: Option<Value>,
}

fn usage() -> &'static str {
    "sheetchart-cli\n\
\n\
USAGE:\n\
  sheetchart-cli context [--pretty] [<path>|-]\n\
  sheetchart-cli data [--pretty] [<path>|-]\n\
  sheetchart-cli [spec] [--pretty] [--type <chart-type>] [--settings <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON chart document: {\"dataSource\", \"dataConfig\", \"chartType\", \"style\"}.\n\
  - context prints the resolved pipeline context; data prints the chart data.\n\
  - spec prints the finished render spec; --type overrides the document's chart type.\n\
  - --settings deep-merges a JSON file over the default render settings.\n\
  - Logging goes to stderr; filter with SHEETCHART_LOG or RUST_LOG.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "context" => args.command = Command::Context,
            "data" => args.command = Command::Data,
            "spec" => args.command = Command::Spec,
            "--pretty" => args.pretty = true,
            "--settings" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.settings = Some(path.clone());
            }
            "--type" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.chart_type = Some(name.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn parse_chart_type(value: &Value) -> Result<ChartTypeBits, CliError> {
    match value {
        Value::String(name) => match name.trim().parse::<u32>() {
            Ok(bits) => Ok(ChartTypeBits::from_bits_retain(bits)),
            Err(_) => chart_type::from_name(name)
                .ok_or_else(|| CliError::UnknownChartType(name.clone())),
        },
        Value::Number(bits) => bits
            .as_u64()
            .and_then(|bits| u32::try_from(bits).ok())
            .map(ChartTypeBits::from_bits_retain)
            .ok_or_else(|| CliError::UnknownChartType(bits.to_string())),
        other => Err(CliError::UnknownChartType(other.to_string())),
    }
}

fn load_settings(path: Option<&str>) -> Result<RenderSettings, CliError> {
    match path {
        None => Ok(RenderSettings::default()),
        Some(path) => {
            let overrides: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            Ok(RenderSettings::from_overrides(&overrides)?)
        }
    }
}

fn render(doc: ChartDocument, chart_type: ChartTypeBits, settings: RenderSettings) -> Result<Value, CliError> {
    let log = RenderLog::new();
    let mut adapter = RenderAdapter::default().with_settings(settings);
    adapter.register_render_engine(JsonRenderEngine::NAME, JsonRenderEngine::constructor(log.clone()));
    let manager = ChartModelManager::default().with_options(ModelOptions::synchronous());
    let service = ChartService::new(manager, adapter);

    let provider = Rc::new(SheetDataSource::from_grid(doc.data_source));
    let model = service.create_with_id(CHART_ID, provider)?;
    model.set_data_config(doc.data_config);
    if let Some(style) = &doc.style {
        model.set_style_value(style)?;
    }
    model.set_chart(chart_type);

    let spec = service.spec(CHART_ID).ok_or(CliError::NothingRendered)?;
    tracing::debug!(events = log.len(), "render finished");
    service.clear();
    Ok(spec.into_value())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let doc: ChartDocument = serde_json::from_str(&text)?;

    match args.command {
        Command::Context => {
            let context = build_context(doc.data_source, doc.data_config);
            write_json(&context, args.pretty)
        }
        Command::Data => {
            let context = build_context(doc.data_source, doc.data_config);
            write_json(&get_output(&context), args.pretty)
        }
        Command::Spec => {
            let chart_type = match (&args.chart_type, &doc.chart_type) {
                (Some(name), _) => parse_chart_type(&Value::String(name.clone()))?,
                (None, Some(value)) => parse_chart_type(value)?,
                (None, None) => return Err(CliError::NoChartType),
            };
            let settings = load_settings(args.settings.as_deref())?;
            let spec = render(doc, chart_type, settings)?;
            write_json(&spec, args.pretty)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SHEETCHART_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
