use tilegen::cli;

fn main() {
    match cli::cli() {
        cli::CliRes::Ok => {}
        cli::CliRes::NoCli => cli::print_usage(),
        cli::CliRes::Err => std::process::exit(1),
    }
}
