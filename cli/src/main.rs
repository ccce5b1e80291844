use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;
use widgets::{WidgetError, WidgetKind, registry};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Widget(#[from] WidgetError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("{path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("nothing to update; pass at least one of --name, --html, --css, --js")]
    EmptyUpdate,
}

#[derive(Parser, Debug)]
#[command(name = "widgethub-cli", about = "WidgetHub compiler and snippet library CLI")]
struct Cli {
    #[arg(long, env = "WIDGETHUB_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// Compile widgets locally; no server needed.
    Widgets(WidgetsCommand),
    /// Manage the snippet library on a running server.
    Snippets(SnippetsCommand),
}

#[derive(Args, Debug)]
struct WidgetsCommand {
    #[command(subcommand)]
    command: WidgetsSubcommand,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Part {
    Embed,
    Html,
    Css,
    Js,
    Json,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(value_parser = parse_kind)]
    kind: WidgetKind,

    #[arg(long, short, help = "JSON or YAML settings file, or - for stdin; defaults when omitted")]
    settings: Option<String>,

    #[arg(long, short, help = "Write to this file instead of stdout")]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum WidgetsSubcommand {
    List,
    Defaults {
        #[arg(value_parser = parse_kind)]
        kind: WidgetKind,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    Compile {
        #[command(flatten)]
        args: SettingsArgs,
        #[arg(long, value_enum, default_value_t = Part::Embed)]
        part: Part,
    },
    Preview {
        #[command(flatten)]
        args: SettingsArgs,
        #[arg(long, value_parser = parse_timestamp, help = "Render time-dependent state at this RFC 3339 instant")]
        at: Option<OffsetDateTime>,
    },
    /// Append a default item to the widget's list and print the settings.
    AddItem {
        #[command(flatten)]
        args: SettingsArgs,
        #[arg(long = "type", help = "Block type for popup-builder items")]
        item_type: Option<String>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Remove one item from the widget's list and print the settings.
    RemoveItem {
        #[command(flatten)]
        args: SettingsArgs,
        index: usize,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Move one item within the widget's list and print the settings.
    MoveItem {
        #[command(flatten)]
        args: SettingsArgs,
        from: usize,
        to: usize,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Args, Debug)]
struct SnippetsCommand {
    #[command(subcommand)]
    command: SnippetsSubcommand,
}

#[derive(Args, Debug, Default)]
struct SnippetFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long, help = "Read markup from this file")]
    html: Option<String>,
    #[arg(long, help = "Read styles from this file")]
    css: Option<String>,
    #[arg(long, help = "Read script from this file")]
    js: Option<String>,
}

#[derive(Subcommand, Debug)]
enum SnippetsSubcommand {
    List,
    Create {
        #[command(flatten)]
        fields: SnippetFields,
        #[arg(long, value_parser = parse_kind, help = "Compile this widget and save its parts")]
        widget: Option<WidgetKind>,
        #[arg(long, requires = "widget")]
        settings: Option<String>,
    },
    Show {
        id: Uuid,
    },
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: SnippetFields,
        #[arg(long, default_value_t = false, help = "Queue as a debounced draft instead of saving now")]
        draft: bool,
    },
    Delete {
        id: Uuid,
    },
    Export {
        id: Uuid,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Ping => run_ping(&cli).await,
        Command::Widgets(widgets) => run_widgets(&widgets.command),
        Command::Snippets(snippets) => run_snippets(&cli, &snippets.command).await,
    }
}

fn parse_kind(raw: &str) -> Result<WidgetKind, String> {
    WidgetKind::parse(raw).ok_or_else(|| {
        let known: Vec<_> = WidgetKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("unknown widget type {raw:?}; expected one of: {}", known.join(", "))
    })
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(raw, &Rfc3339).map_err(|e| format!("expected RFC 3339 timestamp: {e}"))
}

// =============================================================================
// WIDGETS (OFFLINE)
// =============================================================================

fn run_widgets(command: &WidgetsSubcommand) -> Result<(), CliError> {
    match command {
        WidgetsSubcommand::List => {
            for entry in registry::entries() {
                println!("{:<16} {:<18} {}", entry.kind.as_str(), entry.label, entry.description);
            }
            Ok(())
        }
        WidgetsSubcommand::Defaults { kind, format } => {
            let defaults = registry::defaults(*kind)?;
            println!("{}", render_settings(&defaults, *format)?.trim_end());
            Ok(())
        }
        WidgetsSubcommand::Compile { args, part } => {
            let settings = load_settings(args.settings.as_deref())?;
            let snippet = registry::compile(args.kind, &settings)?;
            let text = match part {
                Part::Embed => snippet.embed(),
                Part::Html => snippet.html,
                Part::Css => snippet.css,
                Part::Js => snippet.js,
                Part::Json => serde_json::to_string_pretty(&snippet)?,
            };
            write_output(args.out.as_deref(), &text)
        }
        WidgetsSubcommand::Preview { args, at } => {
            let settings = load_settings(args.settings.as_deref())?;
            let now = at.unwrap_or_else(OffsetDateTime::now_utc);
            let document = registry::preview(args.kind, &settings, now)?;
            write_output(args.out.as_deref(), &document)
        }
        WidgetsSubcommand::AddItem { args, item_type, format } => {
            let settings = load_settings(args.settings.as_deref())?;
            let edited = registry::add_item(args.kind, &settings, item_type.as_deref())?;
            write_output(args.out.as_deref(), &render_settings(&edited, *format)?)
        }
        WidgetsSubcommand::RemoveItem { args, index, format } => {
            let settings = load_settings(args.settings.as_deref())?;
            let edited = registry::remove_item(args.kind, &settings, *index)?;
            write_output(args.out.as_deref(), &render_settings(&edited, *format)?)
        }
        WidgetsSubcommand::MoveItem { args, from, to, format } => {
            let settings = load_settings(args.settings.as_deref())?;
            let edited = registry::move_item(args.kind, &settings, *from, *to)?;
            write_output(args.out.as_deref(), &render_settings(&edited, *format)?)
        }
    }
}

fn render_settings(settings: &Value, format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(settings)?,
        Format::Yaml => serde_yaml::to_string(settings)?,
    })
}

fn read_input(path: &str) -> Result<String, CliError> {
    let io_err = |source| CliError::Io { path: path.to_owned(), source };
    if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(io_err)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(io_err)
}

fn is_yaml_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Parse a settings document. JSON is tried first unless `yaml` is set;
/// blank input means "use defaults".
fn parse_settings(text: &str, yaml: bool) -> Result<Value, CliError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    if yaml {
        return Ok(serde_yaml::from_str(text)?);
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(json_err) => serde_yaml::from_str(text).map_err(|_| CliError::InvalidJson(json_err)),
    }
}

fn load_settings(path: Option<&str>) -> Result<Value, CliError> {
    match path {
        None => Ok(Value::Null),
        Some(path) => parse_settings(&read_input(path)?, is_yaml_path(path)),
    }
}

fn write_output(out: Option<&Path>, text: &str) -> Result<(), CliError> {
    match out {
        Some(path) => {
            std::fs::write(path, text).map_err(|source| CliError::Io { path: path.display().to_string(), source })?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{}", text.trim_end()),
    }
    Ok(())
}

// =============================================================================
// SNIPPETS (SERVER)
// =============================================================================

async fn run_ping(cli: &Cli) -> Result<(), CliError> {
    api_send(cli, reqwest::Method::GET, "/healthz", None).await?;
    println!("ok");
    Ok(())
}

fn snippet_body(fields: &SnippetFields) -> Result<Map<String, Value>, CliError> {
    let mut body = Map::new();
    if let Some(name) = &fields.name {
        body.insert("name".to_owned(), Value::String(name.clone()));
    }
    for (key, path) in [("html", &fields.html), ("css", &fields.css), ("js", &fields.js)] {
        if let Some(path) = path {
            body.insert(key.to_owned(), Value::String(read_input(path)?));
        }
    }
    Ok(body)
}

async fn run_snippets(cli: &Cli, command: &SnippetsSubcommand) -> Result<(), CliError> {
    match command {
        SnippetsSubcommand::List => {
            let json = api_request(cli, reqwest::Method::GET, "/api/snippets", None).await?;
            for row in json.as_array().map(Vec::as_slice).unwrap_or_default() {
                let field = |key: &str| row.get(key).and_then(Value::as_str).unwrap_or_default().to_owned();
                println!("{}  {:<32} {}", field("id"), field("name"), field("modified_label"));
            }
            Ok(())
        }
        SnippetsSubcommand::Create { fields, widget, settings } => {
            let mut body = snippet_body(fields)?;
            if let Some(kind) = widget {
                let snippet = registry::compile(*kind, &load_settings(settings.as_deref())?)?;
                body.entry("name").or_insert_with(|| Value::String(registry::entry(*kind).label.to_owned()));
                body.insert("html".to_owned(), Value::String(snippet.html));
                body.insert("css".to_owned(), Value::String(snippet.css));
                body.insert("js".to_owned(), Value::String(snippet.js));
            }
            let json = api_request(cli, reqwest::Method::POST, "/api/snippets", Some(Value::Object(body))).await?;
            print_json(&json)
        }
        SnippetsSubcommand::Show { id } => {
            let json = api_request(cli, reqwest::Method::GET, &format!("/api/snippets/{id}"), None).await?;
            print_json(&json)
        }
        SnippetsSubcommand::Update { id, fields, draft } => {
            let body = snippet_body(fields)?;
            if body.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            let (method, path) = if *draft {
                (reqwest::Method::PUT, format!("/api/snippets/{id}/draft"))
            } else {
                (reqwest::Method::PATCH, format!("/api/snippets/{id}"))
            };
            let json = api_request(cli, method, &path, Some(Value::Object(body))).await?;
            print_json(&json)
        }
        SnippetsSubcommand::Delete { id } => {
            api_send(cli, reqwest::Method::DELETE, &format!("/api/snippets/{id}"), None).await?;
            println!("deleted {id}");
            Ok(())
        }
        SnippetsSubcommand::Export { id, out } => {
            let response = api_send(cli, reqwest::Method::GET, &format!("/api/snippets/{id}/export"), None).await?;
            let text = response.text().await?;
            write_output(out.as_deref(), &text)
        }
    }
}

/// Pull the `message` (and `code`) out of an API error body.
fn server_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_owned();
    };
    match (value.get("code").and_then(Value::as_str), value.get("message").and_then(Value::as_str)) {
        (Some(code), Some(message)) => format!("{message} ({code})"),
        (None, Some(message)) => message.to_owned(),
        _ => value.to_string(),
    }
}

async fn api_send(
    cli: &Cli,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<reqwest::Response, CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);

    let request = client.request(method, &url);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(CliError::Server { status: status.as_u16(), message: server_message(&text) });
    }
    Ok(response)
}

async fn api_request(
    cli: &Cli,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let response = api_send(cli, method, path, body).await?;
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
