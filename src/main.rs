fn main() {
    use depgraph_scanner::{app, cli};
    let cli = cli::parse();
    app::init_tracing(cli.verbose);
    let code = app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
