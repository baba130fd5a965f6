use super::{DEFAULT_CSV, DEFAULT_PNG, VERSION};
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn command() -> Command {
    let arg_csvin = Arg::new("input_csvfile")
        .help("name of the csv file with the benchmark timings")
        .short('f')
        .long("csvfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_CSV);
    let arg_pngout = Arg::new("output_pngfile")
        .help("name of the output png file")
        .short('o')
        .long("pngfile")
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_PNG);
    let arg_noshow = Arg::new("noshow")
        .help("only save the png, do not open the chart window")
        .long("noshow")
        .action(ArgAction::SetTrue);
    let arg_verbose = Arg::new("verbose")
        .help("print verbose information")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue);
    Command::new("align_plot")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to plot the aligned vs unaligned access times")
        .arg(arg_csvin)
        .arg(arg_pngout)
        .arg(arg_noshow)
        .arg(arg_verbose)
}

/// Takes the CLI arguments that control the plotting of the benchmark timings.
/// Input and output default to results.csv and execution_time_comparison.png,
/// so it is safe to unwrap their get_one.
pub fn parse_cli() -> (PathBuf, PathBuf, bool, bool) {
    parse_from(std::env::args_os())
}

fn parse_from<I, T>(args: I) -> (PathBuf, PathBuf, bool, bool)
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli_args = command().get_matches_from(args);
    let csvin: PathBuf = cli_args
        .get_one::<PathBuf>("input_csvfile")
        .unwrap()
        .to_owned();
    let pngout: PathBuf = cli_args
        .get_one::<PathBuf>("output_pngfile")
        .unwrap()
        .to_owned();
    let show = !cli_args.get_flag("noshow");
    let verbose = cli_args.get_flag("verbose");
    (csvin, pngout, show, verbose)
}
