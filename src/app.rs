use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::alerts::{AlertPolicy, DEFAULT_THRESHOLD_DAYS};
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::filter::{self, FilterCriteria};
use crate::orchestrator::MemoryDashboard;
use crate::output::{self, OutputFormat};
use crate::render::HealthReportHandler;
use crate::store::TowerStore;

fn print_banner() {
    const BANNER: &str = r#"
  _                                        _       _
 | |_ _____      _____ _ ____      ____ _| |_ ___| |__
 | __/ _ \ \ /\ / / _ \ '__\ \ /\ / / _` | __/ __| '_ \
 | || (_) \ V  V /  __/ |   \ V  V / (_| | || (__| | | |
  \__\___/ \_/\_/ \___|_|    \_/\_/ \__,_|\__\___|_| |_|
       v0.1.0 - radio tower inventory dashboard
    "#;
    eprint!("{}", BANNER);
    eprintln!();
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value);
}

const HELP_SECTIONS: [&str; 6] = ["Input", "Filters", "Alerts", "Output", "Config", "Options"];

fn flag_label(arg: &clap::Arg) -> String {
    let mut parts: Vec<String> = arg.get_short().map(|s| format!("-{s}")).into_iter().collect();
    parts.extend(arg.get_long().map(|l| format!("--{l}")));
    parts.extend(
        arg.get_visible_aliases()
            .unwrap_or_default()
            .into_iter()
            .map(|a| format!("--{a}")),
    );
    let mut label = parts.join(", ");
    if arg.get_action().takes_values() {
        if let Some(name) = arg.get_value_names().and_then(|names| names.first()) {
            label.push_str(&format!(" <{name}>"));
        }
    }
    label
}

/// One line per flag, grouped by help heading in pipeline order.
fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = format!(
        "{} {}\n\n",
        cmd.get_name(),
        cmd.get_version().unwrap_or_default()
    );
    if let Some(about) = cmd.get_long_about().or(cmd.get_about()) {
        out.push_str(&format!("{about}\n\n"));
    }
    out.push_str(&format!("Usage: {} [OPTIONS]\n", cmd.get_name()));

    let args: Vec<&clap::Arg> = cmd.get_arguments().filter(|a| !a.is_hide_set()).collect();
    let width = args.iter().map(|a| flag_label(a).len()).max().unwrap_or(0);
    for heading in HELP_SECTIONS {
        let section: Vec<&clap::Arg> = args
            .iter()
            .copied()
            .filter(|a| a.get_help_heading().unwrap_or("Options") == heading)
            .collect();
        if section.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{heading}:\n"));
        for arg in section {
            let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            out.push_str(&format!("  {:<width$}  {}\n", flag_label(arg), help.trim()));
        }
    }
    out
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    data_file: Option<PathBuf>,
    criteria: FilterCriteria,
    policy: AlertPolicy,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    interactive: bool,
}

fn build_run_config(
    args: CliArgs,
    cfg: ConfigFile,
    today: NaiveDate,
) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let region_raw = args
        .region
        .or(cfg.region)
        .unwrap_or_else(|| filter::ALL.to_string());
    let type_raw = args
        .tower_type
        .or(cfg.tower_type)
        .unwrap_or_else(|| filter::ALL.to_string());
    let status_raw = args
        .status
        .or(cfg.status)
        .unwrap_or_else(|| filter::ALL.to_string());
    let criteria = FilterCriteria {
        region: filter::parse_region(&region_raw),
        tower_type: filter::parse_tower_type(&type_raw).map_err(|e| e.to_string())?,
        status: filter::parse_status(&status_raw).map_err(|e| e.to_string())?,
    };

    let reference_date = match args.reference_date.or(cfg.reference_date) {
        Some(raw) => validation::parse_reference_date(&raw)?,
        None => today,
    };
    let threshold_days = args
        .threshold_days
        .or(cfg.threshold_days)
        .unwrap_or(DEFAULT_THRESHOLD_DAYS);
    let policy = AlertPolicy::new(reference_date).with_threshold(threshold_days);

    let output_path = args.output.or(cfg.output);
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output_path
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let data_file = args
        .data_file
        .or(cfg.data_file)
        .map(|p| config::expand_tilde(&p));

    Ok(RunConfig {
        data_file,
        criteria,
        policy,
        output: output_path,
        output_format,
        no_color,
        interactive: args.interactive,
    })
}

/// Prints a short health summary for the tower a popup report was requested for.
struct ConsoleReport<'a, W: Write> {
    store: &'a TowerStore,
    reference_date: NaiveDate,
    out: &'a mut W,
}

impl<W: Write> HealthReportHandler for ConsoleReport<'_, W> {
    fn request_report(&mut self, tower_id: &str) {
        let Some(t) = self.store.get(tower_id) else {
            let _ = writeln!(self.out, "no tower with id {tower_id}");
            return;
        };
        let age = match t.last_maint.date() {
            Some(d) => format!("{} days ago", (self.reference_date - d).num_days()),
            None => "unknown age".to_string(),
        };
        let _ = writeln!(
            self.out,
            "Report for {}: {} tower in {}, {} antennas, {}, last maintenance {} ({})",
            t.id.bold().cyan(),
            t.tower_type,
            t.city,
            t.antennas,
            t.status,
            t.last_maint,
            age
        );
    }
}

const SESSION_HELP: &str = "commands: region <city|all>, type <type|all>, status <status|all>, reset, report <id>, show, help, quit";

/// Line-driven control loop: every filter command is one change event and triggers one
/// full render cycle before the next line is read.
fn run_session<R: BufRead, W: Write>(
    dash: &mut MemoryDashboard<'_>,
    store: &TowerStore,
    input: R,
    out: &mut W,
) -> Result<(), String> {
    let io_err = |e: std::io::Error| format!("failed to write output: {e}");
    writeln!(out, "{SESSION_HELP}").map_err(io_err)?;
    out.write_all(&output::render_text(&dash.snapshot()))
        .map_err(io_err)?;

    for line in input.lines() {
        let line = line.map_err(|e| format!("failed to read input: {e}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        let changed = match cmd {
            "quit" | "exit" | "q" => break,
            "help" => {
                writeln!(out, "{SESSION_HELP}").map_err(io_err)?;
                None
            }
            "show" => Some(Ok(())),
            "reset" => {
                dash.reset();
                Some(Ok(()))
            }
            "region" if !arg.is_empty() => {
                dash.set_region(arg);
                Some(Ok(()))
            }
            "type" if !arg.is_empty() => Some(dash.set_tower_type(arg).map(|_| ())),
            "status" if !arg.is_empty() => Some(dash.set_status(arg).map(|_| ())),
            "report" if !arg.is_empty() => {
                let reference_date = dash.policy().reference_date;
                let mut handler = ConsoleReport {
                    store,
                    reference_date,
                    out: &mut *out,
                };
                if !dash.request_report(arg, &mut handler) {
                    writeln!(out, "{} is not on the map", arg).map_err(io_err)?;
                }
                None
            }
            _ => {
                writeln!(out, "unrecognised command '{line}'; {SESSION_HELP}").map_err(io_err)?;
                None
            }
        };

        match changed {
            Some(Ok(())) => {
                out.write_all(&output::render_text(&dash.snapshot()))
                    .map_err(io_err)?;
            }
            Some(Err(e)) => {
                writeln!(out, "{}", e.to_string().red()).map_err(io_err)?;
            }
            None => {}
        }
    }
    Ok(())
}

fn run(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let store = match run.data_file.as_ref() {
        Some(path) => TowerStore::load(path).map_err(|e| e.to_string())?,
        None => TowerStore::sample(),
    };

    format_kv_line(
        "Dataset",
        &run
            .data_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "bundled sample".to_string()),
    );
    format_kv_line("Towers", &store.len().to_string());
    format_kv_line("Filters", &run.criteria.to_string());
    eprintln!();

    let mut dash = MemoryDashboard::in_memory(&store, run.policy);
    dash.set_criteria(run.criteria.clone());

    if run.interactive {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        return run_session(&mut dash, &store, stdin.lock(), &mut out);
    }

    let rendered = output::render(&dash.snapshot(), run.output_format);
    match run.output.as_ref() {
        Some(path) => {
            std::fs::write(path, &rendered)
                .map_err(|e| format!("failed to write output file '{path}': {e}"))?;
            tracing::info!(path = %path, format = ?run.output_format, "dashboard written");
            format_kv_line("Output", path);
        }
        None => {
            std::io::stdout()
                .write_all(&rendered)
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));

    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a config path".to_string())?;
        if config::ensure_default_config_file(&path)? {
            println!("wrote default config to {}", path.display());
        } else {
            println!("config already exists at {}", path.display());
        }
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run_cfg = build_run_config(args, cfg, chrono::Local::now().date_naive())?;
    if !run_cfg.interactive {
        print_banner();
    }
    run(run_cfg)
}

#[cfg(test)]
mod cli_tests {
    use super::*;
    use crate::filter::Selector;
    use crate::store::{TowerStatus, TowerType};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    #[test]
    fn defaults_to_all_selectors_and_today() {
        let args = CliArgs::parse_from(["towerwatch"]);
        let run = build_run_config(args, ConfigFile::default(), today()).unwrap();
        assert_eq!(run.criteria, FilterCriteria::all());
        assert_eq!(run.policy.reference_date, today());
        assert_eq!(run.policy.threshold_days, 90);
        assert_eq!(run.output_format, OutputFormat::Text);
    }

    #[test]
    fn cli_flags_override_config() {
        let cfg = ConfigFile {
            region: Some("Mumbai".to_string()),
            tower_type: Some("TPL".to_string()),
            threshold_days: Some(30),
            output: Some("dash.html".to_string()),
            ..ConfigFile::default()
        };
        let args = CliArgs::parse_from(["towerwatch", "--region", "Delhi", "--threshold", "45"]);
        let run = build_run_config(args, cfg, today()).unwrap();
        assert_eq!(run.criteria.region, Selector::Only("Delhi".to_string()));
        assert_eq!(run.criteria.tower_type, Selector::Only(TowerType::Tpl));
        assert_eq!(run.criteria.status, Selector::<TowerStatus>::All);
        assert_eq!(run.policy.threshold_days, 45);
        assert_eq!(run.output_format, OutputFormat::Html);
    }

    #[test]
    fn invalid_config_status_is_an_error() {
        let cfg = ConfigFile {
            status: Some("Offline".to_string()),
            ..ConfigFile::default()
        };
        let args = CliArgs::parse_from(["towerwatch"]);
        assert!(build_run_config(args, cfg, today()).is_err());
    }

    #[test]
    fn session_applies_each_command_as_a_cycle() {
        colored::control::set_override(false);
        let store = TowerStore::sample();
        let mut dash = MemoryDashboard::in_memory(&store, AlertPolicy::new(today()));
        dash.render();
        let input = "region Delhi\nreport TWR-002\nstatus Broken\nreset\nquit\nregion Mumbai\n";
        let mut out: Vec<u8> = Vec::new();
        run_session(&mut dash, &store, input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Report for TWR-002"));
        assert!(text.contains("unknown status 'Broken'"));
        assert_eq!(dash.criteria(), &FilterCriteria::all());
        assert_eq!(dash.cycles(), 3);
    }

    #[test]
    fn help_lists_filter_heading() {
        let help = render_custom_help();
        assert!(help.contains("Filters:"));
        assert!(help.contains("-r, --rg, --region <CITY>"));
        let input = help.find("Input:").unwrap();
        let filters = help.find("Filters:").unwrap();
        let config = help.find("Config:").unwrap();
        assert!(input < filters && filters < config);
        // --interactive sits under Input even though it is declared last.
        let interactive = input + help[input..].find("--interactive").unwrap();
        assert!(interactive < filters);
    }
}
