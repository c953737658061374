use argparser::ArgParser;

fn main() -> argparser::Result<()> {
    env_logger::init();

    let mut app = ArgParser::new("", "my help is here");
    app.set_version(env!("CARGO_PKG_VERSION"));
    app.add_option("l", "log-level", "The log level to use")?
        .default_value("info");
    app.add_flag("v", "verbose", "If to be loud")?;

    app.parse_env_or_exit();

    println!("log level: {}", app.get_string("log-level"));
    println!("verbose: {}", app.get_bool("verbose"));
    Ok(())
}
