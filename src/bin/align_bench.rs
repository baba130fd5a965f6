use align_lpp::access::{measure_runs, random_data, write_csv};
use align_lpp::align_bench::parse_cli;
use align_lpp::init_logger;
use log::{error, info};

fn main() {
    let (csvout, runs, size, mode, verbose) = parse_cli();
    init_logger(verbose);
    info!("> fill {} random values", size);
    let data = random_data(size);
    info!(
        "> time {} runs of aligned and misaligned sums, {:?} shift",
        runs, mode
    );
    let records = measure_runs(&data, runs, mode);
    if let Err(e) = write_csv(&records, &csvout) {
        error!("{}", e);
        std::process::exit(1);
    }
    info!("results written to {}", csvout.display());
}
