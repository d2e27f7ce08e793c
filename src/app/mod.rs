use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, Vec2};
use tracing::{error, info};

use relviz::config::{LayoutKind, PanelConfig};
use relviz::interaction::{ClickDispatcher, Focus};
use relviz::relation::{LabelSplitter, Relation, load_relations};
use relviz::{Diagram, RenderSession, render_pass};

mod canvas;
mod render_utils;
mod ui;

/// Where the viewer reads its input from.
#[derive(Clone, Debug)]
pub struct Source {
    pub relations: PathBuf,
    pub config: Option<PathBuf>,
    pub layout: Option<LayoutKind>,
    pub separator: String,
}

struct Loaded {
    relations: Vec<Relation>,
    config: PanelConfig,
}

type LoadResult = Result<Loaded, String>;

pub struct RelvizApp {
    source: Source,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    relations: Vec<Relation>,
    config: PanelConfig,
    session: RenderSession,
    diagram: Diagram,
    dispatcher: ClickDispatcher,
    click_log: Rc<RefCell<Vec<String>>>,
    hover: Option<Focus>,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    pan: Vec2,
    zoom: f32,
    live_simulation: bool,
    diagram_dirty: bool,
}

struct SearchMatchCache {
    query: String,
    generation: u64,
    matches: Arc<HashSet<usize>>,
}

fn load(source: &Source) -> anyhow::Result<Loaded> {
    let splitter = LabelSplitter::new(source.separator.clone());
    let relations = load_relations(&source.relations, &splitter)?;

    let mut config = match &source.config {
        Some(path) => PanelConfig::load(path)
            .with_context(|| format!("failed to load panel config {}", path.display()))?,
        None => PanelConfig::default_for(source.layout.unwrap_or(LayoutKind::Chord)),
    };
    if let Some(kind) = source.layout
        && config.kind() != kind
    {
        config = PanelConfig::default_for(kind);
    }

    info!(
        relations = relations.len(),
        layout = config.kind().label(),
        "loaded relation data"
    );
    Ok(Loaded { relations, config })
}

impl RelvizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: Source) -> Self {
        let state = Self::start_load(source.clone());
        Self {
            source,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(source: Source) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load(&source).map_err(|error| format!("{error:#}"));
            if let Err(message) = &result {
                error!(%message, "loading relation data failed");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(source: Source) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(source),
        }
    }

    fn ready(loaded: Loaded) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(loaded.relations, loaded.config)))
    }
}

impl eframe::App for RelvizApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(loaded) => Self::ready(loaded),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relations...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relation data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.source.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.source.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(loaded) => Self::ready(loaded),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(relations: Vec<Relation>, config: PanelConfig) -> Self {
        let session = RenderSession::new();
        let diagram = render_pass(&relations, &config, &session);
        let click_log = Rc::new(RefCell::new(Vec::new()));

        let node_log = Rc::clone(&click_log);
        let link_log = Rc::clone(&click_log);
        let dispatcher = ClickDispatcher::new()
            .on_click_node(move |node| node_log.borrow_mut().push(format!("filter node {node}")))
            .on_click_link(move |link| link_log.borrow_mut().push(format!("filter link {link}")));

        Self {
            relations,
            config,
            session,
            diagram,
            dispatcher,
            click_log,
            hover: None,
            search: String::new(),
            search_match_cache: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_simulation: true,
            diagram_dirty: false,
        }
    }

    /// Starts a new render pass; the previous diagram and its pending
    /// simulation ticks are discarded.
    fn rebuild_diagram(&mut self) {
        self.diagram = render_pass(&self.relations, &self.config, &self.session);
        self.hover = None;
        self.search_match_cache = None;
        self.diagram_dirty = false;
    }
}
