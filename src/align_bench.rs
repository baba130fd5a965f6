use super::access::Misalignment;
use super::{DEFAULT_CSV, VERSION};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn command() -> Command {
    let arg_csvout = Arg::new("output_csvfile")
        .help("name of the output csv file with the timings")
        .short('o')
        .long("csvfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_CSV);
    let arg_runs = Arg::new("runs")
        .help("number of timed runs")
        .short('r')
        .long("runs")
        .num_args(1)
        .value_parser(value_parser!(u32).range(1..))
        .default_value("100");
    let arg_size = Arg::new("size")
        .help("number of f64 values summed in each run")
        .short('s')
        .long("size")
        .num_args(1)
        .value_parser(value_parser!(usize))
        .default_value("1000000");
    let arg_misalign = Arg::new("misalign")
        .help("shift of the misaligned copy")
        .long_help("element: one f64 past a 32-byte boundary; byte: one byte past an f64 boundary")
        .short('m')
        .long("misalign")
        .num_args(1)
        .value_parser(["element", "byte"])
        .default_value("element");
    let arg_verbose = Arg::new("verbose")
        .help("print verbose information")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue);
    Command::new("align_bench")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to time sums over aligned and misaligned f64 data")
        .arg(arg_csvout)
        .arg(arg_runs)
        .arg(arg_size)
        .arg(arg_misalign)
        .arg(arg_verbose)
}

/// Takes the CLI arguments that control the benchmark.
/// Every argument has a default, unwrapping get_one is safe.
pub fn parse_cli() -> (PathBuf, u32, usize, Misalignment, bool) {
    parse_from(std::env::args_os())
}

fn parse_from<I, T>(args: I) -> (PathBuf, u32, usize, Misalignment, bool)
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli_args = command().get_matches_from(args);
    let csvout: PathBuf = cli_args
        .get_one::<PathBuf>("output_csvfile")
        .unwrap()
        .to_owned();
    let runs = *cli_args.get_one::<u32>("runs").unwrap();
    let size = *cli_args.get_one::<usize>("size").unwrap();
    // value_parser restricts misalign to element or byte
    let mode = match cli_args.get_one::<String>("misalign").map(String::as_str) {
        Some("byte") => Misalignment::Byte,
        _ => Misalignment::Element,
    };
    let verbose = cli_args.get_flag("verbose");
    (csvout, runs, size, mode, verbose)
}
