use inquiry::{
    cli::{get_log_level_from_verbose, parse_cli, run},
    constants::exit_codes,
    error::default_error_handler,
};

#[tokio::main]
async fn main() {
    let cli = parse_cli();
    let log_level = get_log_level_from_verbose(cli.verbose);
    env_logger::Builder::new().filter_level(log_level).init();

    match run(cli).await {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => default_error_handler(err),
    }
}
