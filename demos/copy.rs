use anyhow::bail;
use argparser::{ArgParser, Outcome};

fn build() -> argparser::Result<ArgParser> {
    let mut app = ArgParser::new("copy", "Copies a file, optionally in chunks");
    app.add_positional("source", "File to read", true)?;
    app.add_positional("target", "File to write", true)?;
    app.add_flag("f", "force", "Overwrite the target if it exists")?;
    app.add_option("b", "block-size", "Bytes per chunk")?
        .default_value(4096)
        .validator(|v| v.parse::<u32>().is_ok_and(|n| n > 0));
    app.add_option("", "ratio", "Fraction of the source to copy")?
        .default_value(1.0);
    Ok(app)
}

pub fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = build()?;

    if app.parse_env()? == Outcome::Help {
        app.print_help()?;
        return Ok(());
    }

    let ratio = app.get_double("ratio")?;
    if !(0.0..=1.0).contains(&ratio) {
        bail!("--ratio must be between 0 and 1, got {ratio}");
    }

    let extra = &app.positional_arguments()[2..];
    if !extra.is_empty() {
        bail!("unexpected args: {}", extra.join(","));
    }

    println!(
        "copy {} -> {} (block size {}, ratio {ratio}, force {})",
        app.get_string("source"),
        app.get_string("target"),
        app.get_int("block-size")?,
        app.get_bool("force"),
    );
    Ok(())
}
