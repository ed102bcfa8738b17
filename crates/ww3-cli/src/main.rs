fn main() {
    std::process::exit(ww3_cli::run_from_env());
}
