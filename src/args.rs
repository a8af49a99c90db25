//! Command-line argument parsing and processing.
//!
//! Handles the standard help, version and debug flags, configuration overrides and the
//! scripted picker steps (clicks, hovers and navigations) in the order they were given.

use crate::calendar::WeekStart;
use crate::common::constants::MAXIMUM_NAVIGATION_REPEAT;
use crate::navigator::NavigationDirection;
use crate::selection::PickMode;

/// One scripted interaction, applied in command-line order.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerStep {
    Click(String),
    Hover(String),
    Navigate(NavigationDirection),
}

/// Settings for a normal run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub config_path: Option<String>,
    pub pick: Option<PickMode>,
    pub number_of_months: Option<usize>,
    pub week_start: Option<WeekStart>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// Fixed "now" as `YYYY-MM-DD HH:MM:SS`, run against a simulated clock
    pub today: Option<String>,
    pub steps: Vec<PickerStep>,
    pub json: bool,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the picker with these settings
    Run(RunOptions),
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Value following the option at `i`, if there is one that is not itself an option.
fn option_value<'a>(args: &'a [String], i: usize, usage: &str) -> Option<&'a String> {
    match args.get(i + 1) {
        Some(value) if !value.starts_with("--") => Some(value),
        _ => {
            log_warning!("Missing value for {}. Usage: {}", args[i], usage);
            None
        }
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first item is the program name and is skipped.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = RunOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut invalid_arg_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => options.debug_enabled = true,
                "--json" => options.json = true,
                "--config" | "-c" => match option_value(&args_vec, i, "--config <path>") {
                    Some(path) => {
                        options.config_path = Some(path.clone());
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--pick" => match option_value(&args_vec, i, "--pick single|range") {
                    Some(value) => {
                        match value.as_str() {
                            "single" => options.pick = Some(PickMode::Single),
                            "range" => options.pick = Some(PickMode::Range),
                            other => {
                                log_warning!("Invalid pick mode: {}", other);
                                invalid_arg_found = true;
                            }
                        }
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--week-start" => match option_value(&args_vec, i, "--week-start sunday|monday") {
                    Some(value) => {
                        match value.as_str() {
                            "sunday" => options.week_start = Some(WeekStart::Sunday),
                            "monday" => options.week_start = Some(WeekStart::Monday),
                            other => {
                                log_warning!("Invalid week start: {}", other);
                                invalid_arg_found = true;
                            }
                        }
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--months" | "-m" => match option_value(&args_vec, i, "--months <count>") {
                    Some(value) => {
                        match value.parse::<usize>() {
                            Ok(months) => options.number_of_months = Some(months),
                            Err(_) => {
                                log_warning!("Invalid month count: {}", value);
                                invalid_arg_found = true;
                            }
                        }
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--from" => match option_value(&args_vec, i, "--from YYYY-MM-DD") {
                    Some(value) => {
                        options.date_from = Some(value.clone());
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--to" => match option_value(&args_vec, i, "--to YYYY-MM-DD") {
                    Some(value) => {
                        options.date_to = Some(value.clone());
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--today" => {
                    match option_value(&args_vec, i, "--today \"YYYY-MM-DD HH:MM:SS\"") {
                        Some(value) => {
                            options.today = Some(value.clone());
                            i += 1;
                        }
                        None => invalid_arg_found = true,
                    }
                }
                "--click" => match option_value(&args_vec, i, "--click YYYY-MM-DD") {
                    Some(value) => {
                        options.steps.push(PickerStep::Click(value.clone()));
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--hover" => match option_value(&args_vec, i, "--hover YYYY-MM-DD") {
                    Some(value) => {
                        options.steps.push(PickerStep::Hover(value.clone()));
                        i += 1;
                    }
                    None => invalid_arg_found = true,
                },
                "--next" | "--prev" => {
                    let direction = if arg_str == "--next" {
                        NavigationDirection::Next
                    } else {
                        NavigationDirection::Prev
                    };
                    // Count is optional and defaults to one month
                    let count = match args_vec.get(i + 1).map(|v| v.parse::<u32>()) {
                        Some(Ok(count)) => {
                            i += 1;
                            count
                        }
                        _ => 1,
                    };
                    let count = if count > MAXIMUM_NAVIGATION_REPEAT {
                        log_warning!(
                            "{arg_str} {count} exceeds {MAXIMUM_NAVIGATION_REPEAT}, capping"
                        );
                        MAXIMUM_NAVIGATION_REPEAT
                    } else {
                        count
                    };
                    for _ in 0..count {
                        options.steps.push(PickerStep::Navigate(direction));
                    }
                }
                _ => {
                    log_warning!("Unknown option: {arg_str}");
                    invalid_arg_found = true;
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if invalid_arg_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else {
            CliAction::Run(options)
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("rangepick [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <path>      Use a specific configuration file");
    log_indented!("    --pick single|range  Pick one date or a start/end range");
    log_indented!("-m, --months <count>     Number of months shown (1-12)");
    log_indented!("    --week-start <day>   First weekday: sunday or monday");
    log_indented!("    --from <date>        Initial start date (YYYY-MM-DD)");
    log_indented!("    --to <date>          Initial end date (YYYY-MM-DD)");
    log_indented!("    --today <datetime>   Run at a fixed time (YYYY-MM-DD HH:MM:SS)");
    log_indented!("    --click <date>       Click a day (repeatable, applied in order)");
    log_indented!("    --hover <date>       Preview a range ending at a day");
    log_indented!("    --next [count]       Navigate forward one or more months");
    log_indented!("    --prev [count]       Navigate back one or more months");
    log_indented!("    --json               Print the modifier map as JSON");
    log_indented!("-d, --debug              Enable detailed debug output");
    log_indented!("-h, --help               Print help information");
    log_indented!("-V, --version            Print version information");
    log_end!();
}
