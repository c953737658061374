use super::ArgParser;
use crate::argument::{Argument, ArgumentKind};
use itertools::Itertools;
use std::io::{self, Write};

pub fn write_help(mut w: impl Write, parser: &ArgParser) -> io::Result<()> {
    if !parser.description.is_empty() {
        write!(&mut w, "{}\n\n", parser.description)?;
    }
    write!(&mut w, "{}\n\n", usage(parser))?;

    let labels = parser.arguments().map(label).collect::<Vec<_>>();
    let col_width = calculate_col_width(&labels);

    let (positionals, switches): (Vec<_>, Vec<_>) = parser
        .arguments()
        .zip(labels)
        .partition(|(arg, _)| arg.kind() == ArgumentKind::Positional);

    if !positionals.is_empty() {
        writeln!(&mut w, "Positional arguments:")?;
        for (arg, label) in &positionals {
            writeln!(&mut w, "    {label:col_width$}{}", annotated(arg))?;
        }
        writeln!(&mut w)?;
    }

    if !switches.is_empty() {
        writeln!(&mut w, "Options:")?;
        for (arg, label) in &switches {
            writeln!(&mut w, "    {label:col_width$}{}", annotated(arg))?;
        }
        writeln!(&mut w)?;
    }

    if !parser.version.is_empty() {
        writeln!(&mut w, "Version: {}", parser.version)?;
    }
    w.flush()
}

/// Returns the one-line usage summary, e.g. `Usage: cp [OPTIONS] source [target]`
pub fn usage(parser: &ArgParser) -> String {
    let mut line = format!("Usage: {}", parser.program_name);

    if parser.registry.switches().next().is_some() {
        line.push_str(" [OPTIONS]");
    }

    for arg in parser.registry.positionals() {
        if arg.is_required() {
            line.push_str(&format!(" {}", arg.name()));
        } else {
            line.push_str(&format!(" [{}]", arg.name()));
        }
    }

    line
}

fn label(arg: &Argument) -> String {
    match arg.kind() {
        ArgumentKind::Positional => arg.name().to_string(),
        ArgumentKind::Flag | ArgumentKind::Option => {
            let short = arg.short_name().map(|s| format!("-{s}"));
            let long = arg.long_name().map(|l| format!("--{l}"));
            short.into_iter().chain(long).join(", ")
        }
    }
}

fn annotated(arg: &Argument) -> String {
    let mut text = arg.description().to_string();
    if let Some(default) = arg.default() {
        text.push_str(&format!(" (default: {default})"));
    }
    if arg.is_required() {
        text.push_str(" (required)");
    }
    text
}

fn calculate_col_width(list: &[String]) -> usize {
    list.iter().map(|s| s.len()).max().unwrap_or(0) + 5
}
