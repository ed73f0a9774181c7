mod cli;
mod lines_cmd;
mod list_cmd;
mod page_range;
mod process_cmd;
mod shared;
mod words_cmd;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    shared::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Process {
            ref inputs,
            ref output_dir,
            mode,
            no_recursive,
            ref report,
            words,
        } => process_cmd::run(
            inputs,
            output_dir.as_deref(),
            mode.into(),
            shared::word_options(words),
            !no_recursive,
            report.as_deref(),
        ),
        Commands::Lines {
            ref file,
            ref pages,
            format,
            words,
        } => lines_cmd::run(file, pages.as_deref(), format, &shared::word_options(words)),
        Commands::Words {
            ref file,
            ref pages,
            format,
            words,
        } => words_cmd::run(file, pages.as_deref(), format, &shared::word_options(words)),
        Commands::List { ref dir, format } => list_cmd::run(dir, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
