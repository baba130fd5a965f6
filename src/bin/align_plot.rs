use align_lpp::align_plot::parse_cli;
use align_lpp::{init_logger, ResultsTable};
use log::{debug, error, info};

fn main() {
    let (csvin, pngout, show, verbose) = parse_cli();
    init_logger(verbose);
    info!(
        "read data from {} and plot to {}",
        csvin.display(),
        pngout.display()
    );
    let table = match ResultsTable::from_csv(&csvin) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    debug!("loaded {} runs\n{}", table.len(), table);
    if let Err(e) = table.plot_png(&pngout) {
        error!("{}", e);
        std::process::exit(1);
    }
    if show {
        table.show();
    }
}
