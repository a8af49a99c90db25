//! `rangepick` entry point.
//!
//! Loads configuration, applies command-line overrides, builds a [`DatePicker`] and
//! replays the scripted steps against it. Every navigation is settled (its debounce
//! allowed to elapse) before the next step runs, so the output reflects committed
//! state. With `--today` the run uses a simulated clock and finishes instantly.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use rangepick::args::{self, CliAction, ParsedArgs, PickerStep, RunOptions};
use rangepick::common::constants::*;
use rangepick::common::logger::Log;
use rangepick::config::{self, Config, validation::validate_config};
use rangepick::render::{render_json, render_picker};
use rangepick::time_source::{self, SimulatedTimeSource, TimeSource, parse_datetime};
use rangepick::{
    CalendarDate, DatePicker, log_block_start, log_decorated, log_end, log_error_exit,
    log_indented, log_version, log_warning,
};

/// Runs the picker for one set of command-line options.
pub struct PickerRunner {
    options: RunOptions,
}

impl PickerRunner {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    pub fn run(self) -> Result<()> {
        Log::set_debug(self.options.debug_enabled);
        // JSON goes to stdout, keep it clean
        if self.options.json {
            Log::set_enabled(false);
        }

        let clock = self.clock()?;
        log_version!();

        let (config, source) = self.load_config()?;
        config.log_config(source.as_ref());

        let (date_from, date_to) = config.initial_dates()?;
        let mut picker = DatePicker::new(
            config.picker_options(),
            config.bounds()?,
            clock.clone(),
            date_from,
            date_to,
        );
        log_decorated!("Today is {}", picker.today());

        for step in &self.options.steps {
            apply_step(&mut picker, clock.as_ref(), step)?;
        }

        if self.options.json {
            println!("{}", render_json(&picker)?);
        } else {
            log_selection(&picker);
            log_block_start!("Calendar:");
            for line in render_picker(&picker).lines() {
                log_indented!("{}", line);
            }
            log_end!();
        }

        picker.teardown();
        Ok(())
    }

    fn clock(&self) -> Result<Arc<dyn TimeSource>> {
        if let Some(today) = &self.options.today {
            let start = parse_datetime(today).context("Invalid --today value")?;
            time_source::init_time_source(Arc::new(SimulatedTimeSource::new(start)));
        }
        Ok(time_source::global())
    }

    /// Configuration file (if any) merged with command-line overrides.
    fn load_config(&self) -> Result<(Config, Option<PathBuf>)> {
        let (mut config, source) = match &self.options.config_path {
            Some(path) => {
                let path = PathBuf::from(path);
                (config::load_from_path(&path)?, Some(path))
            }
            None => {
                let path = config::get_config_path()?;
                let source = path.exists().then_some(path);
                (config::load()?, source)
            }
        };

        let overrides = &self.options;
        if overrides.pick.is_some() {
            config.pick = overrides.pick;
        }
        if overrides.number_of_months.is_some() {
            config.number_of_months = overrides.number_of_months;
        }
        if overrides.week_start.is_some() {
            config.week_start = overrides.week_start;
        }
        if overrides.date_from.is_some() {
            config.date_from = overrides.date_from.clone();
        }
        if overrides.date_to.is_some() {
            config.date_to = overrides.date_to.clone();
        }

        validate_config(&config).context("Invalid command-line override")?;
        Ok((config, source))
    }
}

fn parse_step_date(value: &str) -> Result<CalendarDate> {
    CalendarDate::parse(value).with_context(|| format!("Invalid step date '{value}'"))
}

/// Apply one scripted step and let any timer it started run out.
fn apply_step(picker: &mut DatePicker, clock: &dyn TimeSource, step: &PickerStep) -> Result<()> {
    match step {
        PickerStep::Click(value) => {
            let day = parse_step_date(value)?;
            if picker.is_outside_range(day) {
                log_warning!("Ignoring click on {}: outside selectable range", day);
            } else {
                picker.click_day(day);
                log_decorated!("Clicked {}", day);
            }
        }
        PickerStep::Hover(value) => {
            let day = parse_step_date(value)?;
            picker.hover_day(day);
            // Let a trailing preview through
            clock.sleep(picker.options().hover_throttle);
            picker.poll();
            log_decorated!("Hovered {}", day);
        }
        PickerStep::Navigate(direction) => {
            if picker.request_navigation(*direction) {
                settle_navigation(picker, clock);
            } else {
                log_warning!("Cannot navigate {}: no selectable month", direction.as_str());
            }
        }
    }
    Ok(())
}

/// Sleep through the navigation debounce until the pending move is committed.
fn settle_navigation(picker: &mut DatePicker, clock: &dyn TimeSource) {
    while picker.pending_direction().is_some() {
        let Some(deadline) = picker.next_deadline() else {
            break;
        };
        clock.sleep((deadline - clock.now()).to_std().unwrap_or_default());

        if let Some(direction) = picker.poll().navigated {
            let visible = picker.window().visible();
            log_decorated!(
                "Navigated {}: showing {} .. {}",
                direction.as_str(),
                visible[0],
                visible[visible.len() - 1]
            );
        }
    }
}

fn log_selection(picker: &DatePicker) {
    let selection = picker.selection();
    let describe = |date: Option<CalendarDate>| {
        date.map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    log_block_start!("Selection ({}):", selection.mode().as_str());
    log_indented!("Start: {}", describe(selection.start_date()));
    if selection.mode() == rangepick::PickMode::Range {
        log_indented!("End: {}", describe(selection.end_date()));
    }
}

fn main() {
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run(options) => PickerRunner::new(options).run(),
    };

    if let Err(e) = result {
        Log::set_enabled(true);
        log_error_exit!("{:#}", e);
        std::process::exit(EXIT_FAILURE);
    }
    std::process::exit(EXIT_SUCCESS);
}
