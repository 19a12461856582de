use std::path::Path;
use std::{env, process};

use ftplint::config::ValidatorConfig;
use ftplint::error::Span;
use ftplint::logging::init_cli_logger;
use ftplint::service::ServiceCheckResult;
use ftplint::check_fixture_file;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        print_usage();
        process::exit(2);
    }

    if args[1] != "check" {
        print_usage();
        process::exit(2);
    }

    let options = match parse_check_options(&args[3..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(2);
        }
    };
    init_cli_logger(options.verbose);

    let config = match options.config_path.as_deref() {
        Some(path) => match ValidatorConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("error: {error}");
                process::exit(2);
            }
        },
        None => ValidatorConfig::default(),
    };

    let fixture_path = Path::new(&args[2]);
    let (fixture, results) = match check_fixture_file(fixture_path, &config) {
        Ok(checked) => checked,
        Err(error) => {
            eprintln!("error: {error}");
            process::exit(2);
        }
    };

    let has_diagnostics = results.iter().any(|result| !result.diagnostics.is_empty());
    if options.json {
        print_results_json(&results);
    } else if !has_diagnostics {
        println!("ok: ftp service checks passed");
    } else {
        print_diagnostics(&results, fixture.source.as_deref());
    }

    if has_diagnostics {
        process::exit(1);
    }
}

fn print_diagnostics(results: &[ServiceCheckResult], source: Option<&str>) {
    for result in results {
        for diagnostic in &result.diagnostics {
            eprintln!(
                "{}[{}][{} {}]: {}",
                diagnostic.severity.label(),
                diagnostic.code.code(),
                result.display_name(),
                format_location(diagnostic.span, source),
                diagnostic.message
            );
        }
    }
}

fn print_results_json(results: &[ServiceCheckResult]) {
    let report = serde_json::json!({
        "ok": results.iter().all(|result| result.diagnostics.is_empty()),
        "services": results,
    });
    println!("{report}");
}

fn format_location(span: Span, source: Option<&str>) -> String {
    match source {
        Some(source) => {
            let (line, col) = byte_to_line_col(source, span.start);
            format!("{line}:{col}")
        }
        None => format!("@{}..{}", span.start, span.end),
    }
}

fn byte_to_line_col(source: &str, byte_index: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (index, ch) in source.char_indices() {
        if index >= byte_index {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn print_usage() {
    eprintln!("usage: ftplint check <fixture.json> [--json] [--config <file.toml>] [--verbose]");
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CheckOptions {
    json: bool,
    verbose: bool,
    config_path: Option<String>,
}

fn parse_check_options(args: &[String]) -> Result<CheckOptions, String> {
    let mut options = CheckOptions::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--json" => options.json = true,
            "--verbose" | "-v" => options.verbose = true,
            "--config" => {
                if options.config_path.is_some() {
                    return Err("multiple --config paths".to_string());
                }
                index += 1;
                let Some(path) = args.get(index) else {
                    return Err("missing value for --config".to_string());
                };
                options.config_path = Some(path.clone());
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown check option '{flag}'"));
            }
            other => {
                return Err(format!("unexpected check argument '{other}'"));
            }
        }
        index += 1;
    }
    Ok(options)
}
