use std::error::Error;
use std::io::{self, BufRead, Write};

use clap::Parser;
use log::debug;
use pi_offload::{
    CliConfig, CliController, JsonPresenter, MonteCarloLoader, OutputFormat, TextPresenter,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = CliConfig::parse();
    debug!("configuration: {:?}", config);

    let stdin = io::stdin();
    let stdout = io::stdout();

    run(&config, &mut stdin.lock(), &mut stdout.lock())
}

fn run(config: &CliConfig, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let loader = MonteCarloLoader::new();
    let options = config.dispatch_options();
    let command = config.command_or_default();

    match config.format() {
        OutputFormat::Text => {
            CliController::new(TextPresenter::new(), loader, options).run(&command, input, out)
        }
        OutputFormat::Json => {
            CliController::new(JsonPresenter::new(), loader, options).run(&command, input, out)
        }
    }
}
