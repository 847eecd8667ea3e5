use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use navtree_engine::{RemoteItemSource, Sidebar, SidebarEffect, ViewRow};
use navtree_types::{SidebarConfig, SidebarEvent};
use navtree_util::{JsonStateStore, default_app_file};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the TUI log file.
const LOG_PATH_ENV: &str = "NAVTREE_LOG_PATH";
const LOG_FILE_NAME: &str = "navtree.log";

#[derive(Debug, Parser)]
#[command(name = "navtree", version, about = "Navigation sidebar with a nested, searchable item tree")]
struct Cli {
    #[command(flatten)]
    attributes: AttributeArgs,

    /// State file used when --remember-state is set (overrides NAVTREE_STATE_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    state_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Sidebar attributes. Every flag maps onto the attribute of the same name.
#[derive(Debug, Args)]
struct AttributeArgs {
    /// Instance identity, used for the persistence key.
    #[arg(long, global = true)]
    id: Option<String>,
    /// Palette: light or dark.
    #[arg(long, global = true)]
    theme: Option<String>,
    /// Docking side: left or right.
    #[arg(long, global = true)]
    position: Option<String>,
    /// Expanded width, `<n>px` or `<n>`.
    #[arg(long, global = true)]
    width: Option<String>,
    /// Width while collapsed.
    #[arg(long, global = true)]
    collapsed_width: Option<String>,
    #[arg(long, global = true)]
    title: Option<String>,
    /// Inline item JSON or an http(s) URL.
    #[arg(long, global = true, conflicts_with = "items_file")]
    data_source: Option<String>,
    /// Read the inline item JSON from a file.
    #[arg(long, global = true, value_name = "PATH")]
    items_file: Option<PathBuf>,
    /// Endpoint polled every --refresh-interval.
    #[arg(long, global = true)]
    api_endpoint: Option<String>,
    /// Polling period in milliseconds.
    #[arg(long, global = true)]
    refresh_interval: Option<String>,

    #[arg(long, global = true)]
    collapsible: bool,
    #[arg(long, global = true)]
    show_header: bool,
    #[arg(long, global = true)]
    show_footer: bool,
    #[arg(long, global = true)]
    searchable: bool,
    #[arg(long, global = true)]
    animations: bool,
    #[arg(long, global = true)]
    responsive: bool,
    #[arg(long, global = true)]
    remember_state: bool,
    /// Leave adjacent regions alone instead of pushing them aside.
    #[arg(long, global = true)]
    no_auto_layout: bool,

    /// Arbitrary attribute, `name=value` or a bare `name` for presence flags.
    #[arg(long = "attr", global = true, value_name = "NAME[=VALUE]", value_parser = parse_attribute)]
    attrs: Vec<(String, Option<String>)>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the visible item tree.
    Tree {
        /// Print rows as JSON.
        #[arg(long)]
        json: bool,
        /// Filter rows with a search query.
        #[arg(long)]
        search: Option<String>,
        /// Expand every item with children first.
        #[arg(long)]
        expand_all: bool,
        /// Click these items, in order, before printing.
        #[arg(long = "click", value_name = "ID")]
        clicks: Vec<String>,
    },
    /// Print the layout applied to adjacent regions.
    Layout {
        /// Viewport width in pixels.
        #[arg(long)]
        viewport: Option<u16>,
        /// Compute the layout of the collapsed sidebar.
        #[arg(long)]
        collapsed: bool,
    },
}

fn parse_attribute(raw: &str) -> Result<(String, Option<String>), String> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.to_string())),
        None => (raw.trim(), Some(String::new())),
    };
    if name.is_empty() {
        return Err(format!("attribute name missing in '{raw}'"));
    }
    Ok((name.to_string(), value))
}

impl AttributeArgs {
    /// Attribute pairs in application order; `--attr` entries come last and win.
    fn to_attributes(&self) -> Result<Vec<(String, Option<String>)>> {
        let mut attributes = Vec::new();
        let mut push = |name: &str, value: &Option<String>| {
            if let Some(value) = value {
                attributes.push((name.to_string(), Some(value.clone())));
            }
        };
        push("id", &self.id);
        push("theme", &self.theme);
        push("position", &self.position);
        push("width", &self.width);
        push("collapsed-width", &self.collapsed_width);
        push("title", &self.title);
        push("data-source", &self.data_source);
        push("api-endpoint", &self.api_endpoint);
        push("refresh-interval", &self.refresh_interval);

        if let Some(path) = &self.items_file {
            let json = fs::read_to_string(path).with_context(|| format!("read items file {}", path.display()))?;
            attributes.push(("data-source".to_string(), Some(json)));
        }

        let flags = [
            ("collapsible", self.collapsible),
            ("show-header", self.show_header),
            ("show-footer", self.show_footer),
            ("searchable", self.searchable),
            ("animations", self.animations),
            ("responsive", self.responsive),
            ("remember-state", self.remember_state),
        ];
        for (name, present) in flags {
            if present {
                attributes.push((name.to_string(), Some(String::new())));
            }
        }
        if self.no_auto_layout {
            attributes.push(("auto-layout".to_string(), Some("false".to_string())));
        }
        attributes.extend(self.attrs.iter().cloned());
        Ok(attributes)
    }

    fn to_config(&self) -> Result<SidebarConfig> {
        let attributes = self.to_attributes()?;
        Ok(SidebarConfig::from_attributes(
            attributes.iter().map(|(name, value)| (name.as_str(), value.as_deref())),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    let mut sidebar = build_sidebar(&cli)?;
    match cli.command {
        None => navtree_tui::run(sidebar).await,
        Some(Commands::Tree {
            json,
            search,
            expand_all,
            clicks,
        }) => {
            report(&attach_and_load(&mut sidebar).await);
            if expand_all {
                sidebar.expand_all();
            }
            for id in &clicks {
                sidebar.click(id);
            }
            if let Some(query) = search {
                sidebar.search(&query);
            }
            let rows = sidebar.rows();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", format_rows(&rows));
            }
            sidebar.detach();
            Ok(())
        }
        Some(Commands::Layout { viewport, collapsed }) => {
            sidebar.attach();
            if let Some(width) = viewport {
                sidebar.set_viewport(width);
            }
            if collapsed != sidebar.is_collapsed() {
                sidebar.toggle_collapse();
            }
            println!("{}", serde_json::to_string_pretty(&sidebar.layout_info())?);
            sidebar.detach();
            Ok(())
        }
    }
}

/// Install the global subscriber. The TUI logs to a file so log lines never
/// land on the terminal frame; subcommands log to stderr.
fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    }
    match open_log_file() {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(error) => eprintln!("navtree: logging disabled: {error:#}"),
    }
}

fn open_log_file() -> Result<fs::File> {
    let path = std::env::var_os(LOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| default_app_file(LOG_FILE_NAME));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))
}

fn build_sidebar(cli: &Cli) -> Result<Sidebar> {
    let config = cli.attributes.to_config()?;
    let remember_state = config.remember_state;
    let sidebar = Sidebar::new(config);
    if !remember_state {
        return Ok(sidebar);
    }
    let store = JsonStateStore::new(cli.state_path.clone()).context("open sidebar state file")?;
    debug!(path = %store.path().display(), "using sidebar state file");
    Ok(sidebar.with_store(Arc::new(store)))
}

/// Attach and, for a remote `data-source`, wait for the first fetch.
async fn attach_and_load(sidebar: &mut Sidebar) -> Vec<SidebarEvent> {
    let mut events = sidebar.attach();
    for effect in sidebar.take_effects() {
        let SidebarEffect::FetchItems(url) = effect else {
            continue;
        };
        let result = match RemoteItemSource::new(url) {
            Ok(source) => source.fetch().await,
            Err(error) => Err(error),
        };
        events.extend(sidebar.apply_refresh(result));
    }
    events
}

fn report(events: &[SidebarEvent]) {
    for event in events {
        if let SidebarEvent::DataError { message } = event {
            eprintln!("navtree: {message}");
        }
        debug!(event = event.name(), "sidebar event");
    }
}

fn format_rows(rows: &[ViewRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = match (row.is_expandable, row.expanded) {
            (true, true) => "▾",
            (true, false) => "▸",
            (false, _) => "•",
        };
        out.push_str(&"  ".repeat(row.depth));
        out.push_str(marker);
        out.push(' ');
        out.push_str(&row.text);
        if row.active {
            out.push_str(" [active]");
        }
        if row.disabled {
            out.push_str(" [disabled]");
        }
        out.push_str(&format!("  ({})\n", row.id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use navtree_types::{Position, ThemeName};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("navtree").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_map_onto_attributes() {
        let cli = parse(&["--collapsible", "--width", "300px", "--position", "right", "--theme", "dark"]);
        let config = cli.attributes.to_config().unwrap();
        assert!(config.collapsible);
        assert!(!config.searchable);
        assert_eq!(config.width, 300);
        assert_eq!(config.position, Position::Right);
        assert_eq!(config.theme, ThemeName::Dark);
        assert!(cli.command.is_none());
    }

    #[test]
    fn generic_attributes_apply_last() {
        let cli = parse(&["--width", "300", "--attr", "width=320px", "--attr", "searchable", "layout"]);
        let config = cli.attributes.to_config().unwrap();
        assert_eq!(config.width, 320);
        assert!(config.searchable);
        assert!(matches!(cli.command, Some(Commands::Layout { .. })));
    }

    #[test]
    fn no_auto_layout_disables_region_management() {
        let config = parse(&["--no-auto-layout"]).attributes.to_config().unwrap();
        assert!(!config.auto_layout);
    }

    #[test]
    fn attribute_parser_rejects_missing_names() {
        assert_eq!(parse_attribute("title=Menu"), Ok(("title".into(), Some("Menu".into()))));
        assert_eq!(parse_attribute("animations"), Ok(("animations".into(), Some(String::new()))));
        assert!(parse_attribute("=x").is_err());
    }

    #[tokio::test]
    async fn unreachable_source_reports_a_data_error() {
        let config = SidebarConfig::from_attributes([("data-source", Some("http://127.0.0.1:9/items.json"))]);
        let mut sidebar = Sidebar::new(config);
        let events = attach_and_load(&mut sidebar).await;
        assert!(events.iter().any(|event| matches!(event, SidebarEvent::DataError { .. })));
        assert!(!sidebar.is_loading());
    }

    #[test]
    fn text_rows_show_depth_and_state() {
        let mut sidebar = Sidebar::new(SidebarConfig::default());
        sidebar.attach();
        sidebar.click("users");
        sidebar.click("user-list");
        let text = format_rows(&sidebar.rows());
        assert!(text.contains("▾ Users  (users)"));
        assert!(text.contains("  • User List [active]  (user-list)"));
    }
}
