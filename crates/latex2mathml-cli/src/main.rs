use std::{
    fs,
    io::{IsTerminal, Read},
    path::PathBuf,
    process,
};

use clap::Parser;

use latex2mathml::{LatexError, LatexToMathML, MathDisplay, PrettyPrint, SymbolTable};

mod config_file;

use config_file::load_config_file;

/// Converts LaTeX formulas to MathML
#[derive(Parser, Debug)]
#[command(version, about = "Converts LaTeX formulas to MathML", long_about = None)]
struct Args {
    /// Specifies a single LaTeX formula; read from stdin if not given
    #[arg(short, long)]
    formula: Option<String>,

    /// Sets the display style for the formula to "inline"
    #[arg(short, long, group = "mode")]
    inline: bool,

    /// Sets the display style for the formula to "block"
    #[arg(short, long, group = "mode")]
    block: bool,

    /// Pretty print the output, indenting by the given number of spaces per level
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Adds an `xmlns` attribute with the given namespace to the `<math>` tag
    #[arg(long, value_name = "URI")]
    namespace: Option<String>,

    /// Reads settings from a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Loads symbols from a file in the `unimathsymbols.txt` format
    #[arg(long, value_name = "FILE")]
    symbols: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_file(path).unwrap_or_else(|e| {
            eprintln!("Config error in '{}': {}", path.display(), e);
            process::exit(2);
        }),
        None => config_file::Config::default(),
    };
    if let Some(indent) = args.indent {
        config.latex2mathml.indent = indent;
        config.latex2mathml.pretty_print = if indent == 0 {
            PrettyPrint::Never
        } else {
            PrettyPrint::Always
        };
    }
    if let Some(namespace) = args.namespace.clone() {
        config.latex2mathml.namespace = Some(namespace);
    }

    let symbols = match args.symbols.as_ref().or(config.symbols.as_ref()) {
        Some(path) => {
            let content = fs::read_to_string(path).unwrap_or_else(|e| exit_io_error(e));
            Some(SymbolTable::from_unimath(&content))
        }
        None => None,
    };
    let converter = match &symbols {
        Some(symbols) => LatexToMathML::with_symbols(config.latex2mathml, symbols),
        None => LatexToMathML::new(config.latex2mathml),
    };

    let latex = match args.formula {
        Some(ref formula) => formula.clone(),
        None => read_stdin(),
    };
    let display = if args.block {
        MathDisplay::Block
    } else {
        MathDisplay::Inline
    };
    match converter.convert(&latex, display) {
        Ok(mathml) => println!("{}", mathml),
        Err(e) => exit_latex_error(&e, &latex),
    }
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        exit_io_error(e);
    }
    buffer
}

fn exit_latex_error(e: &LatexError, latex: &str) -> ! {
    let with_color = std::io::stderr().is_terminal();
    let report = e.to_report("<input>", with_color);
    if report
        .eprint(("<input>", ariadne::Source::from(latex)))
        .is_err()
    {
        eprintln!("Conversion error: {}", e);
    }
    process::exit(1);
}

fn exit_io_error(e: std::io::Error) -> ! {
    eprintln!("IO Error: {}", e);
    process::exit(2);
}
