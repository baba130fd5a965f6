use crate::utils::*;
use log::{debug, info, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
pub mod access;
pub mod align_bench;
pub mod align_plot;
pub mod utils;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use crate::utils::ResultsError;

// constants
pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");
pub const DEFAULT_CSV: &str = "results.csv";
pub const DEFAULT_PNG: &str = "execution_time_comparison.png";
pub const REQUIRED_COLUMNS: [&str; 3] = ["Run", "AlignedTime", "UnalignedTime"];
pub const CHART_TITLE: &str = "Execution Time Comparison: Aligned vs Unaligned Access";
pub const CHART_SIZE: (u32, u32) = (1000, 600);
pub const ALIGNED_LABEL: &str = "Aligned Time";
pub const UNALIGNED_LABEL: &str = "Unaligned Time";

/// Install env_logger at info level, or debug when verbose.
/// RUST_LOG still takes precedence.
pub fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::try_init_from_env(env);
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TimingRow {
    run: f64,
    aligned_time: f64,
    unaligned_time: f64,
}

/// I/O failures while reading mean the input is unreadable,
/// anything else the csv reader reports is a malformed input.
fn read_error(path: &Path, e: csv::Error) -> ResultsError {
    if !e.is_io_error() {
        return ResultsError::InputMalformed(format!("{}: {}", path.display(), e));
    }
    match e.into_kind() {
        csv::ErrorKind::Io(source) => ResultsError::InputNotFound {
            path: path.to_path_buf(),
            source,
        },
        kind => ResultsError::InputMalformed(format!("{}: {:?}", path.display(), kind)),
    }
}

/// The benchmark timings, one row per run.
/// The three columns always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    pub run: Vec<f64>,
    pub aligned_time: Vec<f64>,
    pub unaligned_time: Vec<f64>,
}

impl ResultsTable {
    /// Initiate an empty ResultsTable
    /// using the given capacity for the three columns
    pub fn new(capacity: usize) -> ResultsTable {
        ResultsTable {
            run: Vec::with_capacity(capacity),
            aligned_time: Vec::with_capacity(capacity),
            unaligned_time: Vec::with_capacity(capacity),
        }
    }

    /// Build a table from its columns, rejecting columns of different length.
    pub fn from_columns(
        run: Vec<f64>,
        aligned_time: Vec<f64>,
        unaligned_time: Vec<f64>,
    ) -> Result<ResultsTable, ResultsError> {
        if run.len() != aligned_time.len() || run.len() != unaligned_time.len() {
            return Err(ResultsError::InputMalformed(format!(
                "columns of different length: Run {}, AlignedTime {}, UnalignedTime {}",
                run.len(),
                aligned_time.len(),
                unaligned_time.len()
            )));
        }
        Ok(ResultsTable {
            run,
            aligned_time,
            unaligned_time,
        })
    }

    /// Read the Run, AlignedTime and UnalignedTime columns from csv, in file order.
    /// Other columns are ignored.
    /// A header without data rows gives an empty table;
    /// a missing column or a non numeric value fails the whole read.
    pub fn from_csv<P>(fin: P) -> Result<ResultsTable, ResultsError>
    where
        P: AsRef<Path>,
    {
        let path = fin.as_ref();
        let file = File::open(path).map_err(|source| ResultsError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));
        let headers = rdr
            .headers()
            .map_err(|e| read_error(path, e))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ResultsError::InputMalformed(format!(
                    "{}: missing column {}",
                    path.display(),
                    column
                )));
            }
        }
        let mut table = ResultsTable::new(0);
        for row in rdr.deserialize::<TimingRow>() {
            let row = row.map_err(|e| read_error(path, e))?;
            table.run.push(row.run);
            table.aligned_time.push(row.aligned_time);
            table.unaligned_time.push(row.unaligned_time);
        }
        debug!("read {} runs from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.run.len()
    }

    pub fn is_empty(&self) -> bool {
        self.run.is_empty()
    }

    /// Draw the comparison chart on any plotters drawing area:
    /// both timing series against Run, with title, axis labels, grid and legend.
    pub fn draw_chart<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
    where
        DB: DrawingBackend,
    {
        let xrange = padded_range(self.run.iter(), 0.);
        let yrange = padded_range(
            self.aligned_time.iter().chain(self.unaligned_time.iter()),
            0.1,
        );
        let xprec = suitable_precision(xrange.end - xrange.start);
        let yprec = suitable_precision(yrange.end - yrange.start);
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(root)
            .caption(CHART_TITLE, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(xrange, yrange)?;
        chart
            .configure_mesh()
            .bold_line_style(RGBColor(100, 100, 100).mix(0.3))
            .light_line_style(RGBColor(200, 200, 200).mix(0.2))
            .label_style(("sans-serif", 16))
            .x_desc("Run")
            .y_desc("Time (seconds)")
            .x_label_formatter(&|x| format!("{:.*}", xprec, x))
            .y_label_formatter(&|y| format!("{:.*}", yprec, y))
            .draw()?;
        let series = [
            (&self.aligned_time, ALIGNED_LABEL, BLUE),
            (&self.unaligned_time, UNALIGNED_LABEL, RED),
        ];
        for (times, label, color) in series {
            let style = color.stroke_width(2);
            chart
                .draw_series(LineSeries::new(
                    self.run.iter().zip(times.iter()).map(|(x, y)| (*x, *y)),
                    style,
                ))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", 16))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    /// Plot the timing comparison to png, overwriting the file.
    pub fn plot_png<P>(&self, fout: P) -> Result<(), ResultsError>
    where
        P: AsRef<Path>,
    {
        let root = BitMapBackend::new(fout.as_ref(), CHART_SIZE).into_drawing_area();
        self.draw_chart(&root)?;
        root.present()?;
        info!("chart saved to {}", fout.as_ref().display());
        Ok(())
    }

    /// Show the chart in a window and block until it is closed.
    /// Without a display, or without the viewer feature, only log and return.
    pub fn show(&self) {
        if !display_available() {
            info!("no display available, skip the interactive chart");
            return;
        }
        #[cfg(feature = "viewer")]
        {
            if let Err(e) = viewer::show(self.clone()) {
                warn!("could not open the chart window: {}", e);
            }
        }
        #[cfg(not(feature = "viewer"))]
        warn!("built without the viewer feature, skip the interactive chart");
    }
}

impl fmt::Display for ResultsTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", REQUIRED_COLUMNS.join(","))?;
        for ((r, a), u) in self
            .run
            .iter()
            .zip(self.aligned_time.iter())
            .zip(self.unaligned_time.iter())
        {
            writeln!(f, "{},{},{}", r, a, u)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // fixtures live in ./test, outputs go to a temporary directory

    fn scenario() -> ResultsTable {
        ResultsTable::from_csv("./test/results.csv").unwrap()
    }

    #[test]
    fn read_scenario_in_file_order() {
        let tl = scenario();
        println!("{}", tl);
        assert_eq!(tl.len(), 3);
        assert_eq!(tl.run, vec![1., 2., 3.]);
        assert_eq!(tl.aligned_time, vec![0.5, 0.52, 0.49]);
        assert_eq!(tl.unaligned_time, vec![0.8, 0.79, 0.81]);
    }

    #[test]
    fn read_benchmark_output_with_extra_columns() {
        let tl = ResultsTable::from_csv("./test/bench_results.csv").unwrap();
        assert_eq!(tl.len(), 4);
        assert_eq!(tl.run, vec![1., 2., 3., 4.]);
        assert_eq!(tl.aligned_time.len(), tl.unaligned_time.len());
        assert_eq!(tl.unaligned_time[3], 0.000612);
    }

    #[test]
    fn header_only_gives_empty_table() {
        let tl = ResultsTable::from_csv("./test/header_only.csv").unwrap();
        assert!(tl.is_empty());
        assert_eq!(tl.aligned_time.len(), 0);
        assert_eq!(tl.unaligned_time.len(), 0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = ResultsTable::from_csv("./test/does_not_exist.csv").unwrap_err();
        assert!(matches!(err, ResultsError::InputNotFound { .. }), "{}", err);
    }

    #[test]
    fn unreadable_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResultsTable::from_csv(dir.path()).unwrap_err();
        assert!(matches!(err, ResultsError::InputNotFound { .. }), "{}", err);
    }

    #[test]
    fn missing_column_is_malformed() {
        let err = ResultsTable::from_csv("./test/missing_column.csv").unwrap_err();
        assert!(matches!(err, ResultsError::InputMalformed(_)));
        assert!(err.to_string().contains("UnalignedTime"), "{}", err);
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let err = ResultsTable::from_csv("./test/non_numeric.csv").unwrap_err();
        assert!(matches!(err, ResultsError::InputMalformed(_)), "{}", err);
    }

    #[test]
    fn short_row_is_malformed() {
        let err = ResultsTable::from_csv("./test/short_row.csv").unwrap_err();
        assert!(matches!(err, ResultsError::InputMalformed(_)), "{}", err);
    }

    #[test]
    fn empty_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let fin = dir.path().join("empty.csv");
        std::fs::write(&fin, "").unwrap();
        let err = ResultsTable::from_csv(&fin).unwrap_err();
        assert!(matches!(err, ResultsError::InputMalformed(_)), "{}", err);
    }

    #[test]
    fn columns_of_different_length_are_rejected() {
        let err = ResultsTable::from_columns(vec![1., 2.], vec![0.5], vec![0.8, 0.79]).unwrap_err();
        assert!(matches!(err, ResultsError::InputMalformed(_)));
        let tl = ResultsTable::from_columns(vec![1.], vec![0.5], vec![0.8]).unwrap();
        assert_eq!(tl.len(), 1);
    }

    #[test]
    fn plot_scenario_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join(DEFAULT_PNG);
        scenario().plot_png(&fout).unwrap();
        let meta = std::fs::metadata(&fout).unwrap();
        assert!(meta.len() > 0);
        let bytes = std::fs::read(&fout).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn chart_has_title_axis_labels_and_legend() {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
            scenario().draw_chart(&root).unwrap();
            root.present().unwrap();
        }
        for text in [
            CHART_TITLE,
            "Run",
            "Time (seconds)",
            "Aligned Time",
            "Unaligned Time",
        ] {
            assert!(svg.contains(&format!(">{}<", text)), "missing text {}", text);
        }
        // line series and legend swatches
        assert!(svg.contains(r##"stroke="#0000FF""##), "no blue stroke");
        assert!(svg.contains(r##"stroke="#FF0000""##), "no red stroke");
    }

    #[test]
    fn plot_twice_gives_the_same_image() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join(DEFAULT_PNG);
        let tl = scenario();
        tl.plot_png(&fout).unwrap();
        let first = std::fs::read(&fout).unwrap();
        tl.plot_png(&fout).unwrap();
        let second = std::fs::read(&fout).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn plot_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("empty.png");
        ResultsTable::new(0).plot_png(&fout).unwrap();
        assert!(std::fs::metadata(&fout).unwrap().len() > 0);
    }
}
