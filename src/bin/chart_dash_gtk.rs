//! chart-dash-gtk - desktop dashboard window.

use std::path::PathBuf;

use chart_dash::DashboardConfig;
use chart_dash::platform_gtk::present_dashboard_window;
use chart_dash::telemetry::init_default_tracing;
use gtk4 as gtk;
use gtk4::prelude::*;

fn main() {
    let _ = init_default_tracing();

    // An optional first argument names a config JSON file; GTK gets no arguments.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => match DashboardConfig::from_json_path(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("failed to load config {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };

    let app = gtk::Application::builder()
        .application_id("rs.chart.dash")
        .build();
    app.connect_activate(move |app| {
        if let Err(err) = present_dashboard_window(app, config) {
            eprintln!("failed to build dashboard window: {err}");
        }
    });
    let _ = app.run_with_args(&[] as &[&str]);
}
