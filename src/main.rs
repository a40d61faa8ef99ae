//! tinsel - CSS selector parser

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;

use tinsel::ToCss;

#[derive(Parser)]
#[command(name = "tinsel")]
#[command(version, about = "CSS selector parser", long_about = None)]
#[command(after_help = "EXAMPLES:
    tinsel styles.css           Parse and re-print each rule block
    tinsel --json styles.css    Emit the parsed structure as JSON
    tinsel -                    Read the stylesheet from stdin")]
struct Cli {
    /// Input stylesheet, or '-' for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Emit parsed selectors as JSON instead of CSS text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let css = read_input(&cli.input)?;
    let selectors = tinsel::parse(&css).map_err(|e| e.to_string())?;

    if cli.json {
        let json = serde_json::to_string_pretty(&selectors).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        for selector in &selectors {
            let weights: Vec<String> = selector.weights.iter().map(u32::to_string).collect();
            println!(
                "{}  /* weight {} */",
                selector.to_css_string(),
                weights.join(", ")
            );
        }
    }

    Ok(())
}

fn read_input(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut css = String::new();
        std::io::stdin()
            .read_to_string(&mut css)
            .map_err(|e| e.to_string())?;
        Ok(css)
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))
    }
}
