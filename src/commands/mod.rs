use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Run the collector once.
    Collect,
    /// Classify one raw dataset file.
    Classify { input: PathBuf },
    /// Aggregate all labeled files and emit the report artifacts.
    Report,
    /// collect -> classify -> report, once.
    Run,
    /// Fixed-time polling loop around `Run`.
    Schedule,
    /// Show which credentials are configured.
    CheckEnv,
    Help,
    Unknown(String),
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Help);
        }

        match parts[0] {
            "collect" => Ok(AppCommand::Collect),
            "classify" => {
                if let Some(path) = parts.get(1) {
                    Ok(AppCommand::Classify {
                        input: PathBuf::from(path),
                    })
                } else {
                    Ok(AppCommand::Unknown("usage: classify <raw-csv-path>".to_string()))
                }
            }
            "report" => Ok(AppCommand::Report),
            "run" => Ok(AppCommand::Run),
            "schedule" => Ok(AppCommand::Schedule),
            "check-env" => Ok(AppCommand::CheckEnv),
            "help" | "h" | "--help" => Ok(AppCommand::Help),
            other => Ok(AppCommand::Unknown(format!("unknown command: {other}"))),
        }
    }
}

pub const USAGE: &str = "usage: tweetpulse <command>

commands:
  collect              search recent posts and write a timestamped raw CSV
  classify <path>      label one raw CSV (writes <path>_labeled.csv)
  report               aggregate labeled CSVs into charts + weekly report
  run                  collect -> classify -> report, once
  schedule             run the pipeline at the configured wall-clock times
  check-env            show which credentials are configured
  help                 this text";
