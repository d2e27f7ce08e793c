mod app;

use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use relviz::LayoutKind;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON relation records, or a terms facet whose terms join source and
    /// target with `--separator`.
    #[arg(long)]
    relations: PathBuf,

    /// Panel configuration JSON; its `type` picks the layout.
    #[arg(long)]
    config: Option<PathBuf>,

    /// chord, hive or network; overrides the configuration type.
    #[arg(long)]
    layout: Option<String>,

    /// Separator between source and target inside a relation key.
    #[arg(long, default_value = "-")]
    separator: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let layout = args.layout.as_deref().and_then(|value| {
        let kind = LayoutKind::parse(value);
        if kind.is_none() {
            warn!(layout = value, "unknown layout, falling back to the configured one");
        }
        kind
    });
    let source = app::Source {
        relations: args.relations,
        config: args.config,
        layout,
        separator: args.separator,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "relviz",
        options,
        Box::new(move |cc| Ok(Box::new(app::RelvizApp::new(cc, source)))),
    )
}
