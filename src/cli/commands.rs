use super::{
    context::{CommandError, CommandResult, ShellContext},
    output,
    registry::{CommandEntry, CommandRegistry},
};
use crate::{
    recurrence::{describe, estimate_duration, generate_iso, Frequency, RecurrenceRule},
    utils::build_info,
};

const RULE_USAGE: &str = "<frequency> <start YYYY-MM-DD> <count> [--interval N] [--custom-days N]";

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "generate",
        "List the occurrence dates of a recurrence rule",
        "generate <frequency> <start YYYY-MM-DD> <count> [--interval N] [--custom-days N]",
        cmd_generate,
    ));
    registry.register(CommandEntry::new(
        "describe",
        "Show the label and estimated span of a recurrence rule",
        "describe <frequency> <start YYYY-MM-DD> <count> [--interval N] [--custom-days N]",
        cmd_describe,
    ));
    registry.register(CommandEntry::new(
        "frequencies",
        "List supported frequencies",
        "frequencies",
        cmd_frequencies,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show or reload the system configuration",
        "config [show|reload]",
        cmd_config,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit));
    registry.register(CommandEntry::new("quit", "Leave the shell", "quit", cmd_exit));
}

fn cmd_generate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let rule = parse_rule(args)?;
    let cap = context.occurrence_cap();
    let rule = if rule.occurrence_count() > cap {
        output::warning(format!(
            "Occurrence count {} exceeds the configured limit; producing {cap}.",
            rule.occurrence_count()
        ));
        RecurrenceRule::new(rule.frequency(), rule.interval(), rule.start_date(), cap)?
            .with_custom_days(rule.custom_days())?
    } else {
        rule
    };

    for date in generate_iso(&rule) {
        output::line(date);
    }
    Ok(())
}

fn cmd_describe(_context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let rule = parse_rule(args)?;
    output::line(format!("Label: {}", describe(&rule)));
    output::line(format!("Estimated duration: {}", estimate_duration(&rule)));
    Ok(())
}

fn cmd_frequencies(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    for frequency in Frequency::ALL {
        output::line(frequency);
    }
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied().unwrap_or("show") {
        "show" => {
            let config = context.system_config()?;
            output::section("System configuration");
            output::line(format!(
                "Source: {}",
                context.config().source().path().display()
            ));
            output::line(format!("Maintenance mode: {}", config.maintenance_mode()));
            output::line(format!("Currency: {}", config.currency()));
            output::line(format!("Trial days: {}", config.trial_days()));
            output::line(format!("Occurrence cap: {}", config.occurrence_cap()));
            if let Some(price) = config.subscription_price {
                output::line(format!("Subscription price: {price:.2}"));
            }
            if let Some(email) = &config.support_email {
                output::line(format!("Support email: {email}"));
            }
            for (name, enabled) in &config.features {
                output::line(format!("Feature {name}: {}", if *enabled { "on" } else { "off" }));
            }
            Ok(())
        }
        "reload" => {
            context.config().invalidate();
            context.system_config()?;
            output::success("Configuration reloaded.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "Unknown config action `{other}`. Usage: config [show|reload]"
        ))),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = build_info::current();
    output::line(format!(
        "recurrence_core {} ({} {}, {} {}, built {})",
        build.version, build.git_hash, build.git_status, build.target, build.profile, build.timestamp
    ));
    output::line(build.rustc);
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context.command(&name.to_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("No help available for `{name}`."))
        })?;
        output::line(format!("{} - {}", entry.name, entry.description));
        output::line(format!("Usage: {}", entry.usage));
        return Ok(());
    }

    output::section("Commands");
    for entry in context.commands() {
        output::line(format!("  {:<12} {}", entry.name, entry.description));
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

/// Parses `<frequency> <start> <count>` followed by optional flags.
pub(crate) fn parse_rule(args: &[&str]) -> Result<RecurrenceRule, CommandError> {
    let mut positional = Vec::new();
    let mut interval = 1u32;
    let mut custom_days = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--interval" | "-i" => interval = parse_number(arg, iter.next())?,
            "--custom-days" | "-d" => custom_days = Some(parse_number(arg, iter.next())?),
            flag if flag.starts_with("--") => {
                return Err(CommandError::InvalidArguments(format!(
                    "Unknown option `{flag}`."
                )))
            }
            value => positional.push(value),
        }
    }

    let &[frequency, start, count] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(format!(
            "Expected {RULE_USAGE}"
        )));
    };

    let frequency: Frequency = frequency.parse()?;
    let start = RecurrenceRule::parse_start_date(start)?;
    let count = count.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("Invalid occurrence count `{count}`."))
    })?;

    Ok(RecurrenceRule::new(frequency, interval, start, count)?.with_custom_days(custom_days)?)
}

fn parse_number(flag: &str, value: Option<&&str>) -> Result<u32, CommandError> {
    let raw = value.ok_or_else(|| {
        CommandError::InvalidArguments(format!("Option `{flag}` requires a value."))
    })?;
    raw.parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!("Option `{flag}` expects a whole number, got `{raw}`."))
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::errors::RecurrenceError;

    #[test]
    fn parses_positional_rule() {
        let rule = parse_rule(&["monthly", "2024-01-31", "3"]).unwrap();
        assert_eq!(rule.frequency(), Frequency::Monthly);
        assert_eq!(rule.start_date(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(rule.occurrence_count(), 3);
        assert_eq!(rule.interval(), 1);
    }

    #[test]
    fn parses_flags_anywhere() {
        let rule = parse_rule(&["--custom-days", "10", "custom", "2024-01-01", "2", "-i", "2"]).unwrap();
        assert_eq!(rule.custom_days(), Some(10));
        assert_eq!(rule.interval(), 2);
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(matches!(
            parse_rule(&["monthly", "2024-01-31"]),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            parse_rule(&["monthly", "2024-01-31", "3", "--interval"]),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn surfaces_recurrence_errors() {
        assert!(matches!(
            parse_rule(&["hourly", "2024-01-31", "3"]),
            Err(CommandError::Recurrence(RecurrenceError::UnknownFrequency { .. }))
        ));
        assert!(matches!(
            parse_rule(&["daily", "2024-01-31", "3", "--interval", "0"]),
            Err(CommandError::Recurrence(RecurrenceError::InvalidInterval(0)))
        ));
    }
}
