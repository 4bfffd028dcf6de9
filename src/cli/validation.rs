use chrono::NaiveDate;

use crate::cli::args::CliArgs;
use crate::filter;
use crate::output::OutputFormat;

pub fn parse_reference_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid reference date '{raw}', expected YYYY-MM-DD: {e}"))
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.tower_type.as_deref() {
        filter::parse_tower_type(raw).map_err(|e| format!("invalid --type: {e}"))?;
    }
    if let Some(raw) = args.status.as_deref() {
        filter::parse_status(raw).map_err(|e| format!("invalid --status: {e}"))?;
    }
    if let Some(raw) = args.region.as_deref() {
        if raw.trim().is_empty() {
            return Err("invalid --region, expected a city name or \"all\"".to_string());
        }
    }
    if let Some(raw) = args.reference_date.as_deref() {
        parse_reference_date(raw).map_err(|e| format!("invalid --reference-date: {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(days) = args.threshold_days {
        if days > 36_500 {
            return Err("invalid --threshold, expected at most 36500 days".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn lowercase_status_is_rejected() {
        let args = CliArgs::parse_from(["towerwatch", "--status", "active"]);
        let err = validate(&args).unwrap_err();
        assert!(err.contains("Under Maintenance"));
    }

    #[test]
    fn multi_word_status_and_all_are_accepted() {
        let args = CliArgs::parse_from([
            "towerwatch",
            "--status",
            "Under Maintenance",
            "--type",
            "all",
            "--reference-date",
            "2025-08-01",
        ]);
        assert!(validate(&args).is_ok());
    }

    #[test]
    fn bad_reference_date_is_rejected() {
        let args = CliArgs::parse_from(["towerwatch", "--rd", "01/08/2025"]);
        assert!(validate(&args).is_err());
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let args = CliArgs::parse_from(["towerwatch", "-f", "xml"]);
        assert!(validate(&args).is_err());
    }
}
