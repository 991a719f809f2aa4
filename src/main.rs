use log::error;
use okey_advisor::json;
use std::io::Read;
use std::process::ExitCode;

const USAGE: &str = "usage: okey-advisor <analyze|suggest|simulate|predict> < request.json";

fn main() -> ExitCode {
    env_logger::init();

    let Some(command) = std::env::args().nth(1) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let handler: fn(&str) -> String = match command.as_str() {
        "analyze" => json::analyze_hand,
        "suggest" => json::suggest_tile,
        "simulate" => json::simulate,
        "predict" => json::predict_opponents,
        other => {
            eprintln!("unknown command: {}\n{}", other, USAGE);
            return ExitCode::FAILURE;
        }
    };

    let mut body = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut body) {
        error!("failed to read request from stdin: {}", e);
        return ExitCode::FAILURE;
    }

    println!("{}", handler(&body));
    ExitCode::SUCCESS
}
