use super::{ResultsTable, CHART_SIZE, CHART_TITLE};
use druid::{AppLauncher, PlatformError, Widget, WindowDesc};
use log::error;
use plotters_druid::Plot;

/// Open a window with the comparison chart and block until it is closed.
pub fn show(table: ResultsTable) -> Result<(), PlatformError> {
    let window = WindowDesc::new(move || chart_widget(table))
        .title(CHART_TITLE)
        .window_size((CHART_SIZE.0 as f64, CHART_SIZE.1 as f64))
        .resizable(true);
    AppLauncher::with_window(window).launch(())
}

// redrawn on every resize, with the same routine used for the png
fn chart_widget(table: ResultsTable) -> impl Widget<()> {
    Plot::new(move |_size, _data, root| {
        if let Err(e) = table.draw_chart(root) {
            error!("could not draw the chart window: {:?}", e);
        }
    })
}
