use std::path::PathBuf;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    input_path: Option<PathBuf>,
    output_file: Option<PathBuf>,
    timezone: Option<String>,
    year: Option<i32>,
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let Some(input_path) = args.input_path else {
        anyhow::bail!("--input-path is required");
    };
    let Some(output_file) = args.output_file else {
        anyhow::bail!("--output-file is required");
    };

    let mut config = rewrapped::config::load_config(args.config.as_deref())?;
    if let Some(timezone) = args.timezone {
        config.timezone = timezone;
    }
    if let Some(year) = args.year {
        config.filter_year = year;
    }

    println!("------------------------------------------");
    println!("Input path: {}", input_path.display());
    println!("Output file: {}", output_file.display());
    println!("Timezone: {}", config.timezone);
    println!("Year: {}", config.filter_year);
    println!("------------------------------------------");

    let batches = rewrapped::sources::load_history_dir(&input_path)?;
    let history = rewrapped::ListeningHistory::from_batches(batches, config)?;
    let report = rewrapped::WrappedReport::build(&history)?;
    rewrapped::report::save_report(&output_file, &report)?;

    println!(
        "Report generated: {} ({} of {} achievements)",
        output_file.display(),
        report.achieved_count(),
        report.achievements.len()
    );
    Ok(())
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        let flag = args[index].as_str();
        match flag {
            "--input-path" | "--output-file" | "--timezone" | "--year" | "--config" => {
                index += 1;
                let Some(value) = args.get(index).map(|value| value.trim()) else {
                    anyhow::bail!("{flag} requires a value");
                };
                if value.is_empty() {
                    anyhow::bail!("{flag} cannot be empty");
                }
                match flag {
                    "--input-path" => out.input_path = Some(PathBuf::from(value)),
                    "--output-file" => out.output_file = Some(PathBuf::from(value)),
                    "--timezone" => out.timezone = Some(value.to_string()),
                    "--year" => {
                        let year = value
                            .parse()
                            .map_err(|_| anyhow::anyhow!("--year expects a year, got {value}"))?;
                        out.year = Some(year);
                    }
                    _ => out.config = Some(PathBuf::from(value)),
                }
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("Rewrapped");
    println!("  --input-path DIR     Folder with StreamingHistoryN.json files");
    println!("  --output-file FILE   Where the JSON report is written");
    println!("  --timezone TZ        TZ database name, default UTC");
    println!("  --year YYYY          Year to report on, default 2021");
    println!("  --config FILE        JSON config file (or REWRAPPED_CONFIG)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let parsed = parse_args(args(&[
            "--input-path",
            "data",
            "--output-file",
            "out.json",
            "--timezone",
            "Europe/Madrid",
            "--year",
            "2022",
        ]))
        .expect("args");

        assert_eq!(parsed.input_path, Some(PathBuf::from("data")));
        assert_eq!(parsed.output_file, Some(PathBuf::from("out.json")));
        assert_eq!(parsed.timezone.as_deref(), Some("Europe/Madrid"));
        assert_eq!(parsed.year, Some(2022));
        assert_eq!(parsed.config, None);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(args(&["--timezone"])).is_err());
        assert!(parse_args(args(&["--year", "soon"])).is_err());
        assert!(parse_args(args(&["--input-path", " "])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
