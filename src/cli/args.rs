use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "towerwatch",
    version,
    about = "radio tower inventory dashboard",
    long_about = "Towerwatch filters a radio tower inventory and renders it as a table, charts, a map and a list of maintenance alerts.\n\nExamples:\n  towerwatch\n  towerwatch --status Active --threshold 60\n  towerwatch --data-file ./towers.json --region Delhi -o dashboard.html\n  towerwatch --interactive\n\nTip: Use --config to persist filters and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the dashboard to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format: text, json or html (inferred from --output when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'd',
        long = "df",
        visible_alias = "data-file",
        value_name = "FILE",
        help_heading = "Input",
        help = "Load towers from a .json, .yml or .yaml file instead of the bundled sample."
    )]
    pub data_file: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.towerwatch/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write a default config file (at --config or the default location) and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'r',
        long = "rg",
        visible_alias = "region",
        value_name = "CITY",
        help_heading = "Filters",
        help = "Only show towers in this city (exact match, \"all\" for every city)."
    )]
    pub region: Option<String>,

    #[arg(
        short = 't',
        long = "ty",
        visible_alias = "type",
        value_name = "TYPE",
        help_heading = "Filters",
        help = "Only show towers of this type (SST, Monopole, TPL, GBT, RTT or all)."
    )]
    pub tower_type: Option<String>,

    #[arg(
        short = 's',
        long = "st",
        visible_alias = "status",
        value_name = "STATUS",
        help_heading = "Filters",
        help = "Only show towers with this status (Active, \"Under Maintenance\", Non-functional or all)."
    )]
    pub status: Option<String>,

    #[arg(
        long = "th",
        visible_alias = "threshold",
        value_name = "DAYS",
        help_heading = "Alerts",
        help = "Days since last maintenance after which an Active tower is overdue (default 90)."
    )]
    pub threshold_days: Option<u32>,

    #[arg(
        long = "rd",
        visible_alias = "reference-date",
        value_name = "YYYY-MM-DD",
        help_heading = "Alerts",
        help = "Date that maintenance ages are measured against (defaults to today)."
    )]
    pub reference_date: Option<String>,

    #[arg(
        short = 'I',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Input",
        help = "Read filter changes from stdin and re-render after each one."
    )]
    pub interactive: bool,
}
