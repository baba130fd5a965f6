use plotters::drawing::DrawingAreaErrorKind;
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;

/// Errors of the load, render and benchmark steps.
/// Loading fails only with InputNotFound or InputMalformed,
/// both fatal for the binaries.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("could not open or read input file {path:?}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    InputMalformed(String),

    #[error("could not render chart: {0}")]
    Render(String),

    #[error("could not write results: {0}")]
    Output(#[from] csv::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for ResultsError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ResultsError::Render(e.to_string())
    }
}

/// Minimum and maximum of the iterated values, None when there are none.
pub fn min_and_max<'a, I, T>(mut s: I) -> Option<(T, T)>
where
    I: Iterator<Item = &'a T>,
    T: 'a + std::cmp::PartialOrd + Clone,
{
    let (mut min, mut max) = match s.next() {
        Some(v) => (v, v),
        None => return None,
    };
    for es in s {
        if es > max {
            max = es
        } else if es < min {
            min = es
        }
    }
    Some((min.clone(), max.clone()))
}

/// Axis range for the finite values, padded by `pad` times the span on each side.
/// An empty input gives 0..1, a single value or a flat series gets a unit span around it.
pub fn padded_range<'a, I>(values: I, pad: f64) -> Range<f64>
where
    I: Iterator<Item = &'a f64>,
{
    let (vmin, vmax) = match min_and_max(values.filter(|v| v.is_finite())) {
        Some(mm) => mm,
        None => return 0f64..1f64,
    };
    let span = vmax - vmin;
    if span == 0. {
        let half = if vmin == 0. { 0.5 } else { vmin.abs() / 2. };
        return (vmin - half)..(vmax + half);
    }
    (vmin - span * pad)..(vmax + span * pad)
}

/// Number of decimals that keeps neighbouring tick labels distinct,
/// assuming about ten ticks over the span.
pub fn suitable_precision(span: f64) -> usize {
    if !span.is_finite() || span <= 0. {
        return 2;
    }
    let step = span / 10.;
    let digits = -step.log10().floor();
    digits.clamp(0., 9.) as usize
}

/// Whether an interactive window can be opened.
/// On unix desktops this needs an X11 or Wayland session.
pub fn display_available() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some_and(|d| !d.is_empty())
        || std::env::var_os("WAYLAND_DISPLAY").is_some_and(|d| !d.is_empty())
}
