// src/main.rs
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::Parser;
use iced::alignment::Horizontal;
use iced::widget::{button, checkbox, column, container, row, scrollable, text, Column, Row, Space};
use iced::{
    executor, window, Alignment, Application, Command, Element, Length, Settings, Subscription,
    Theme,
};
use tracing::{error, info};

mod cloud_handler;
mod config;
mod csv_handler;
mod dashboard;
mod data_types;
mod error;
mod loader;
mod ui;

use config::Args;
use dashboard::{
    apply_filter, compute_metrics, enumerate_vendors, reconcile_selection, render,
    DashboardView, DegenerateInputWarning, FilterSelection,
};
use data_types::Dataset;
use error::DataSourceError;
use loader::DataLoader;
use ui::{filled, footer_button, Styles, DARK_THEME, LIGHT_THEME};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let loader = DataLoader::new(args.table_source()?)
        .with_ttl(args.cache_ttl())
        .with_fetch_timeout(args.fetch_timeout());
    info!(version = VERSION, "starting provision dashboard");

    ProvisionDashboard::run(Settings {
        window: window::Settings {
            size: (1280, 800),
            resizable: true,
            ..Default::default()
        },
        ..Settings::with_flags(Arc::new(loader))
    })?;

    Ok(())
}

enum LoadState {
    Loading,
    Ready(Arc<Dataset>),
    Failed(String),
}

struct ProvisionDashboard {
    loader: Arc<DataLoader>,
    is_dark_mode: bool,
    state: LoadState,
    in_flight: bool,
    vendors: Vec<String>,
    // None until the first dataset arrives
    selection: Option<FilterSelection>,
    view: Option<DashboardView>,
    last_update: DateTime<Local>,
}

#[derive(Debug, Clone)]
enum Message {
    Loaded(Result<Arc<Dataset>, Arc<DataSourceError>>),
    VendorToggled(String, bool),
    SelectAll,
    ClearSelection,
    Tick,
    ToggleTheme,
}

impl Application for ProvisionDashboard {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Arc<DataLoader>;

    fn new(loader: Arc<DataLoader>) -> (Self, Command<Message>) {
        let mut app = ProvisionDashboard {
            loader,
            is_dark_mode: true,
            state: LoadState::Loading,
            in_flight: false,
            vendors: Vec::new(),
            selection: None,
            view: None,
            last_update: Local::now(),
        };
        let command = app.reload();
        (app, command)
    }

    fn title(&self) -> String {
        format!("Provision Dashboard v{}", VERSION)
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Loaded(result) => {
                self.in_flight = false;
                match result {
                    Ok(dataset) => {
                        let vendors = enumerate_vendors(&dataset);
                        self.selection = Some(reconcile_selection(
                            self.selection.as_ref(),
                            &self.vendors,
                            &vendors,
                        ));
                        self.vendors = vendors;
                        self.state = LoadState::Ready(dataset);
                    }
                    Err(e) => {
                        error!(error = %e, "failed to load provisioning data");
                        self.state = LoadState::Failed(e.to_string());
                    }
                }
                self.rerender();
                Command::none()
            }

            Message::VendorToggled(vendor, selected) => {
                self.selection
                    .get_or_insert_with(FilterSelection::default)
                    .set(&vendor, selected);
                self.rerender();
                self.reload()
            }

            Message::SelectAll => {
                self.selection = Some(FilterSelection::all(&self.vendors));
                self.rerender();
                self.reload()
            }

            Message::ClearSelection => {
                self.selection = Some(FilterSelection::default());
                self.rerender();
                self.reload()
            }

            Message::Tick => self.reload(),

            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                Command::none()
            }
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(REFRESH_INTERVAL).map(|_| Message::Tick)
    }

    fn theme(&self) -> Theme {
        if self.is_dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn view(&self) -> Element<Message> {
        let theme = self.styles();

        let content: Element<Message> = match (&self.state, &self.view) {
            (LoadState::Failed(message), _) => self.failure_view(message, theme),
            (LoadState::Ready(_), Some(view)) => self.dashboard_view(view, theme),
            _ => centered(text("Loading provisioning data...").size(24).style(theme.fg)),
        };

        let footer = container(
            row![
                text("Developed by Provision Team")
                    .size(14)
                    .style(theme.footer_fg),
                Space::with_width(Length::Fill),
                button(text("Theme").horizontal_alignment(Horizontal::Center).size(16))
                    .on_press(Message::ToggleTheme)
                    .style(footer_button(theme)),
            ]
            .spacing(5)
            .align_items(Alignment::Center),
        )
        .padding(10)
        .width(Length::Fill)
        .style(filled(theme.footer_bg));

        container(column![content, footer])
            .width(Length::Fill)
            .height(Length::Fill)
            .style(filled(theme.bg))
            .into()
    }
}

impl ProvisionDashboard {
    fn styles(&self) -> &'static Styles {
        if self.is_dark_mode {
            &*DARK_THEME
        } else {
            &*LIGHT_THEME
        }
    }

    /// Asks the loader for the current dataset; it answers from cache while fresh.
    fn reload(&mut self) -> Command<Message> {
        if self.in_flight {
            return Command::none();
        }
        self.in_flight = true;

        let loader = Arc::clone(&self.loader);
        Command::perform(
            async move { loader.load().await.map_err(Arc::new) },
            Message::Loaded,
        )
    }

    fn rerender(&mut self) {
        self.last_update = Local::now();
        self.view = match &self.state {
            LoadState::Ready(dataset) => {
                let selection = self.selection.clone().unwrap_or_default();
                let filtered = apply_filter(dataset, &selection);
                let metrics = compute_metrics(&filtered);
                Some(render(&filtered, &metrics))
            }
            _ => None,
        };
    }

    fn failure_view(&self, message: &str, theme: &Styles) -> Element<Message> {
        centered(
            column![
                text(format!("Connection failed: {}", message))
                    .size(22)
                    .style(theme.error_fg),
                text("Retrying on the next refresh.").size(16).style(theme.muted_fg),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
        )
    }

    fn dashboard_view<'a>(&'a self, view: &'a DashboardView, theme: &Styles) -> Element<'a, Message> {
        let header = column![
            text("Provision Dashboard").size(32).style(theme.fg),
            text(format!("Last Update: {}", self.last_update.format("%Y-%m-%d %H:%M")))
                .size(14)
                .style(theme.muted_fg),
            text("Connected to data source").size(14).style(theme.success_fg),
        ]
        .spacing(4);

        let metrics = Row::with_children(
            view.metrics
                .iter()
                .map(|metric| {
                    container(
                        column![
                            text(metric.label).size(14).style(theme.muted_fg),
                            text(&metric.value).size(28).style(theme.fg),
                        ]
                        .spacing(4),
                    )
                    .padding(12)
                    .width(Length::FillPortion(1))
                    .style(filled(theme.card_bg))
                    .into()
                })
                .collect(),
        )
        .spacing(12);

        let mut main = column![header, metrics].spacing(16);
        for warning in &view.warnings {
            let note = match warning {
                DegenerateInputWarning::NoRecords => "No vessels match the current filter.",
                DegenerateInputWarning::NoEta => "No ETA values available.",
            };
            main = main.push(text(note).size(14).style(theme.muted_fg));
        }
        main = main
            .push(text("Vessel List").size(22).style(theme.fg))
            .push(render_table(view, theme));

        row![
            self.sidebar(theme),
            container(main).padding(20).width(Length::Fill).height(Length::Fill),
        ]
        .height(Length::Fill)
        .into()
    }

    fn sidebar(&self, theme: &Styles) -> Element<Message> {
        let selection = self.selection.clone().unwrap_or_default();

        let vendors = Column::with_children(
            self.vendors
                .iter()
                .map(|vendor| {
                    let name = vendor.clone();
                    checkbox(vendor.clone(), selection.contains(vendor), move |checked| {
                        Message::VendorToggled(name.clone(), checked)
                    })
                    .into()
                })
                .collect(),
        )
        .spacing(6);

        let controls = row![
            button(text("Select all").size(14)).on_press(Message::SelectAll),
            button(text("Clear").size(14)).on_press(Message::ClearSelection),
        ]
        .spacing(8);

        container(
            column![
                text("Filter Options").size(20).style(theme.fg),
                text(format!("Select Vendor ({} of {})", selection.len(), self.vendors.len()))
                    .size(14)
                    .style(theme.muted_fg),
                controls,
                scrollable(vendors).height(Length::Fill),
            ]
            .spacing(10),
        )
        .padding(16)
        .width(Length::Fixed(240.0))
        .height(Length::Fill)
        .style(filled(theme.sidebar_bg))
        .into()
    }
}

fn render_table<'a>(view: &'a DashboardView, theme: &Styles) -> Element<'a, Message> {
    let cell_width = |i: usize| {
        if i == 0 {
            Length::Fixed(180.0)
        } else {
            Length::Fixed(150.0)
        }
    };

    let headers = Row::with_children(
        view.table
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                container(text(header).size(16).style(theme.header_fg))
                    .width(cell_width(i))
                    .padding(5)
                    .style(filled(theme.header_bg))
                    .into()
            })
            .collect(),
    )
    .spacing(1);

    let rows = view.table.rows.iter().map(|table_row| {
        let (bg, fg) = if table_row.style.highlighted {
            (theme.highlight_bg, theme.highlight_fg)
        } else {
            (theme.bg, theme.fg)
        };

        Row::with_children(
            table_row
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    container(text(cell).size(16).style(fg))
                        .width(cell_width(i))
                        .padding(5)
                        .style(filled(bg))
                        .into()
                })
                .collect(),
        )
        .spacing(1)
        .into()
    });

    let content = column![headers]
        .push(Column::with_children(rows.collect()).spacing(1))
        .spacing(1);

    scrollable(content).height(Length::Fill).into()
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}
