//! GTK4 desktop surface for the dashboard.
//!
//! The window owns a [`DashboardSession`] behind `Rc<RefCell<_>>`. Every
//! control mutates the session and then refreshes the widgets from a fresh
//! evaluation; the drawing area rebuilds the scene at its current size and
//! paints it through the Cairo backend.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use tracing::{debug, warn};

use crate::api::{ChartKind, DashboardConfig, DashboardSession, build_scene};
use crate::core::{DataPreview, Viewport};
use crate::error::ChartResult;
use crate::render::{CairoContextRenderer, CairoRenderer};

/// Widgets of one dashboard window plus the session they present.
#[derive(Clone)]
pub struct GtkDashboard {
    session: Rc<RefCell<DashboardSession>>,
    renderer: Rc<RefCell<CairoRenderer>>,
    // Set while widgets are repopulated so selection callbacks stay quiet.
    refreshing: Rc<Cell<bool>>,
    root: gtk::Box,
    preview_grid: gtk::Grid,
    chart_dropdown: gtk::DropDown,
    category_row: gtk::Box,
    category_dropdown: gtk::DropDown,
    value_row: gtk::Box,
    value_dropdown: gtk::DropDown,
    status_label: gtk::Label,
    drawing_area: gtk::DrawingArea,
}

impl GtkDashboard {
    pub fn new(config: DashboardConfig) -> ChartResult<Self> {
        config.validate()?;
        let (content_width, content_height) = config.viewport.pixel_size()?;
        let renderer = CairoRenderer::new(1, 1)?;

        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        root.set_margin_top(12);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);

        let title = gtk::Label::new(Some(crate::api::DASHBOARD_TITLE));
        title.set_xalign(0.0);
        title.add_css_class("title-1");
        root.append(&title);

        let upload_button = gtk::Button::with_label("Upload CSV");
        upload_button.set_halign(gtk::Align::Start);
        root.append(&upload_button);

        let preview_grid = gtk::Grid::new();
        preview_grid.set_column_spacing(16);
        preview_grid.set_row_spacing(2);
        root.append(&preview_grid);

        let controls = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        let chart_labels: Vec<&str> = ChartKind::ALL.iter().map(|kind| kind.label()).collect();
        let chart_dropdown = gtk::DropDown::from_strings(&chart_labels);
        controls.append(&labeled_row("Select Chart Type", &chart_dropdown));

        let category_dropdown = gtk::DropDown::from_strings(&[]);
        let category_row = labeled_row("Select Categorical Column", &category_dropdown);
        controls.append(&category_row);

        let value_dropdown = gtk::DropDown::from_strings(&[]);
        let value_row = labeled_row("Select Numerical Column", &value_dropdown);
        controls.append(&value_row);
        root.append(&controls);

        let status_label = gtk::Label::new(None);
        status_label.set_xalign(0.0);
        status_label.set_wrap(true);
        root.append(&status_label);

        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_content_width(content_width);
        drawing_area.set_content_height(content_height);
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);
        root.append(&drawing_area);

        let dashboard = Self {
            session: Rc::new(RefCell::new(DashboardSession::new(config))),
            renderer: Rc::new(RefCell::new(renderer)),
            refreshing: Rc::new(Cell::new(false)),
            root,
            preview_grid,
            chart_dropdown,
            category_row,
            category_dropdown,
            value_row,
            value_dropdown,
            status_label,
            drawing_area,
        };
        dashboard.install_draw_func();
        dashboard.connect_controls(&upload_button);
        dashboard.refresh();
        Ok(dashboard)
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    #[must_use]
    pub fn drawing_area(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    #[must_use]
    pub fn session(&self) -> Rc<RefCell<DashboardSession>> {
        Rc::clone(&self.session)
    }

    fn install_draw_func(&self) {
        let session = Rc::clone(&self.session);
        let renderer = Rc::clone(&self.renderer);
        self.drawing_area.set_draw_func(move |_, context, width, height| {
            let Ok(session) = session.try_borrow() else {
                return;
            };
            let Ok(mut renderer) = renderer.try_borrow_mut() else {
                return;
            };
            if let Err(err) = draw_session(&session, &mut renderer, context, width, height) {
                warn!(error = %err, "failed to draw dashboard chart");
            }
        });
    }

    fn connect_controls(&self, upload_button: &gtk::Button) {
        {
            let dashboard = self.clone();
            upload_button.connect_clicked(move |button| {
                let csv_filter = csv_file_filter();
                let filters = gio::ListStore::new::<gtk::FileFilter>();
                filters.append(&csv_filter);
                let dialog = gtk::FileDialog::builder()
                    .title("Upload CSV")
                    .modal(true)
                    .filters(&filters)
                    .default_filter(&csv_filter)
                    .build();
                let parent = button
                    .root()
                    .and_then(|root| root.downcast::<gtk::Window>().ok());
                let dashboard = dashboard.clone();
                dialog.open(parent.as_ref(), gio::Cancellable::NONE, move |result| {
                    dashboard.handle_upload(result);
                });
            });
        }

        {
            let dashboard = self.clone();
            self.chart_dropdown.connect_selected_notify(move |dropdown| {
                if dashboard.refreshing.get() {
                    return;
                }
                let Some(kind) = ChartKind::ALL.get(dropdown.selected() as usize).copied() else {
                    return;
                };
                if let Ok(mut session) = dashboard.session.try_borrow_mut() {
                    session.select_chart(kind);
                }
                dashboard.refresh();
            });
        }

        {
            let dashboard = self.clone();
            self.category_dropdown.connect_selected_notify(move |dropdown| {
                if dashboard.refreshing.get() {
                    return;
                }
                let Some(name) = selected_string(dropdown) else {
                    return;
                };
                if let Ok(mut session) = dashboard.session.try_borrow_mut() {
                    if let Err(err) = session.select_category(&name) {
                        warn!(error = %err, "rejected category selection");
                    }
                }
                dashboard.refresh();
            });
        }

        {
            let dashboard = self.clone();
            self.value_dropdown.connect_selected_notify(move |dropdown| {
                if dashboard.refreshing.get() {
                    return;
                }
                let Some(name) = selected_string(dropdown) else {
                    return;
                };
                if let Ok(mut session) = dashboard.session.try_borrow_mut() {
                    if let Err(err) = session.select_value(&name) {
                        warn!(error = %err, "rejected value selection");
                    }
                }
                dashboard.refresh();
            });
        }
    }

    fn handle_upload(&self, result: Result<gio::File, glib::Error>) {
        let file = match result {
            Ok(file) => file,
            Err(err) => {
                debug!(error = %err, "file dialog dismissed");
                return;
            }
        };
        let Some(path) = file.path() else {
            self.status_label.set_text("Only local files can be uploaded.");
            return;
        };
        if !is_csv_path(&path) {
            self.status_label.set_text("Only .csv files can be uploaded.");
            return;
        }
        let outcome = match self.session.try_borrow_mut() {
            Ok(mut session) => session.load_csv_path(&path),
            Err(_) => return,
        };
        if let Err(err) = outcome {
            self.status_label.set_text(&format!("Upload failed: {err}"));
            return;
        }
        self.refresh();
    }

    /// Repopulates every widget from a fresh evaluation of the session.
    pub fn refresh(&self) {
        let Ok(session) = self.session.try_borrow() else {
            return;
        };
        self.refreshing.set(true);

        let request = session.request().clone();
        self.chart_dropdown.set_selected(request.kind.position() as u32);

        let show_selectors = session.dataset().is_some() && session.needs_column_selectors();
        self.category_row.set_visible(show_selectors);
        self.value_row.set_visible(show_selectors);
        set_options(
            &self.category_dropdown,
            &session.category_options(),
            request.category.as_deref(),
        );
        set_options(
            &self.value_dropdown,
            &session.value_options(),
            request.value.as_deref(),
        );

        match session.evaluate() {
            Ok(view) => {
                fill_preview(&self.preview_grid, view.preview.as_ref());
                let status: Vec<&str> = view
                    .warning
                    .into_iter()
                    .chain(view.error.as_deref())
                    .collect();
                self.status_label.set_text(&status.join("\n"));
            }
            Err(err) => {
                fill_preview(&self.preview_grid, session.preview().as_ref());
                self.status_label.set_text(&format!("Error: {err}"));
            }
        }

        self.refreshing.set(false);
        self.drawing_area.queue_draw();
    }
}

fn draw_session(
    session: &DashboardSession,
    renderer: &mut CairoRenderer,
    context: &cairo::Context,
    width: i32,
    height: i32,
) -> ChartResult<()> {
    let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Ok(());
    };
    if width == 0 || height == 0 {
        return Ok(());
    }
    let view = session.evaluate()?;
    let Some(figure) = view.figure else {
        return Ok(());
    };
    let config = DashboardConfig {
        viewport: Viewport::new(width, height),
        ..*session.config()
    };
    let frame = build_scene(&figure, &config)?;
    renderer.render_on_cairo_context(context, &frame)
}

const CSV_PATTERN: &str = "*.csv";

fn csv_file_filter() -> gtk::FileFilter {
    let filter = gtk::FileFilter::new();
    filter.set_name(Some("CSV files"));
    filter.add_pattern(CSV_PATTERN);
    filter.add_suffix("csv");
    filter.add_mime_type("text/csv");
    filter
}

/// Upload accepts `.csv` files only, in any letter case.
fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn labeled_row(label: &str, control: &impl IsA<gtk::Widget>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Vertical, 4);
    let caption = gtk::Label::new(Some(label));
    caption.set_xalign(0.0);
    row.append(&caption);
    row.append(control);
    row
}

fn set_options(dropdown: &gtk::DropDown, options: &[String], selected: Option<&str>) {
    let items: Vec<&str> = options.iter().map(String::as_str).collect();
    dropdown.set_model(Some(&gtk::StringList::new(&items)));
    let position = selected
        .and_then(|name| options.iter().position(|option| option == name))
        .map_or(gtk::INVALID_LIST_POSITION, |index| index as u32);
    dropdown.set_selected(position);
}

fn selected_string(dropdown: &gtk::DropDown) -> Option<String> {
    dropdown
        .selected_item()
        .and_downcast::<gtk::StringObject>()
        .map(|item| item.string().to_string())
}

fn fill_preview(grid: &gtk::Grid, preview: Option<&DataPreview>) {
    while let Some(child) = grid.first_child() {
        grid.remove(&child);
    }
    let Some(preview) = preview else {
        return;
    };
    for (column, name) in preview.columns.iter().enumerate() {
        let header = gtk::Label::new(Some(name));
        header.add_css_class("heading");
        grid.attach(&header, column as i32 + 1, 0, 1, 1);
    }
    for (row_index, row) in preview.rows.iter().enumerate() {
        let index = gtk::Label::new(Some(&row_index.to_string()));
        index.add_css_class("dim-label");
        grid.attach(&index, 0, row_index as i32 + 1, 1, 1);
        for (column, cell) in row.iter().enumerate() {
            let label = gtk::Label::new(Some(cell));
            label.set_xalign(1.0);
            grid.attach(&label, column as i32 + 1, row_index as i32 + 1, 1, 1);
        }
    }
}

/// Builds the dashboard window for `app` and presents it.
pub fn present_dashboard_window(
    app: &gtk::Application,
    config: DashboardConfig,
) -> ChartResult<GtkDashboard> {
    let (width, height) = config.viewport.pixel_size()?;
    let dashboard = GtkDashboard::new(config)?;
    let window = gtk::ApplicationWindow::builder()
        .application(app)
        .title(crate::api::DASHBOARD_TITLE)
        .default_width(width.saturating_add(40))
        .default_height(height.saturating_add(260))
        .build();
    let scroller = gtk::ScrolledWindow::new();
    scroller.set_child(Some(dashboard.widget()));
    window.set_child(Some(&scroller));
    window.present();
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::is_csv_path;

    #[test]
    fn upload_accepts_csv_extension_in_any_case() {
        assert!(is_csv_path(Path::new("/tmp/sales.csv")));
        assert!(is_csv_path(Path::new("REPORT.CSV")));
        assert!(!is_csv_path(Path::new("notes.txt")));
        assert!(!is_csv_path(Path::new("csv")));
    }
}
