/// Initializes logging to stderr; `RUST_LOG` takes precedence over `--verbose`.
pub fn init_logger(verbose: bool) {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filters(verbose).to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

fn default_filters(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
