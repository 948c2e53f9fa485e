//! Shell command table and handlers.

use strsim::levenshtein;

use crate::{
    aggregate::{category_totals, monthly_equivalent, total_monthly, MonthScope},
    domain::{
        CalendarDate, FixedCost, InstallmentPlan, Interval, MonthKey, NamedEntity, Obligation,
        SavingsGoal, Subscription,
    },
    errors::BudgetError,
    months::{month_label, month_options, year_month_options, MonthOption},
    payments::StatusFilter,
    utils::build_info,
};

use super::output;
use super::shell_context::ShellContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub(crate) type CommandResult = Result<LoopControl, BudgetError>;

pub(crate) struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    handler: fn(&mut ShellContext, &[&str]) -> CommandResult,
}

pub(crate) const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "help",
        usage: "help",
        description: "List available commands",
        handler: cmd_help,
    },
    CommandEntry {
        name: "summary",
        usage: "summary [YYYY-MM]",
        description: "Monthly, paid and unpaid totals",
        handler: cmd_summary,
    },
    CommandEntry {
        name: "list",
        usage: "list [all|paid|unpaid] [YYYY-MM]",
        description: "List obligations with their payment status",
        handler: cmd_list,
    },
    CommandEntry {
        name: "add-fixed",
        usage: "add-fixed <name> <amount> <monthly|yearly> [category]",
        description: "Add a fixed cost",
        handler: cmd_add_fixed,
    },
    CommandEntry {
        name: "add-subscription",
        usage: "add-subscription <name> <amount> <monthly|yearly> <payment-day> [category]",
        description: "Add a subscription",
        handler: cmd_add_subscription,
    },
    CommandEntry {
        name: "add-plan",
        usage: "add-plan <name> <monthly-amount> <start YYYY-MM-DD> <end YYYY-MM-DD> [payment-day]",
        description: "Add an installment plan",
        handler: cmd_add_plan,
    },
    CommandEntry {
        name: "remove",
        usage: "remove <position|instance-id>",
        description: "Delete an obligation",
        handler: cmd_remove,
    },
    CommandEntry {
        name: "pay",
        usage: "pay <position|instance-id> [YYYY-MM]",
        description: "Mark an obligation paid for a month",
        handler: cmd_pay,
    },
    CommandEntry {
        name: "unpay",
        usage: "unpay <position|instance-id> [YYYY-MM]",
        description: "Mark an obligation unpaid for a month",
        handler: cmd_unpay,
    },
    CommandEntry {
        name: "months",
        usage: "months [before] [after]",
        description: "Show the month picker around the current month",
        handler: cmd_months,
    },
    CommandEntry {
        name: "year",
        usage: "year <YYYY>",
        description: "Show January to December of a year",
        handler: cmd_year,
    },
    CommandEntry {
        name: "categories",
        usage: "categories [YYYY-MM]",
        description: "Monthly totals per category",
        handler: cmd_categories,
    },
    CommandEntry {
        name: "add-goal",
        usage: "add-goal <name> <target> [target-date] [saved]",
        description: "Add a savings goal",
        handler: cmd_add_goal,
    },
    CommandEntry {
        name: "goals",
        usage: "goals [YYYY-MM]",
        description: "Show savings goals and the monthly amount they need",
        handler: cmd_goals,
    },
    CommandEntry {
        name: "version",
        usage: "version",
        description: "Show build information",
        handler: cmd_version,
    },
    CommandEntry {
        name: "exit",
        usage: "exit",
        description: "Leave the shell",
        handler: cmd_exit,
    },
];

pub(crate) fn command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|entry| entry.name).collect()
}

pub(crate) fn dispatch(context: &mut ShellContext, command: &str, args: &[&str]) -> CommandResult {
    let command = if command == "quit" { "exit" } else { command };
    match COMMANDS.iter().find(|entry| entry.name == command) {
        Some(entry) => (entry.handler)(context, args),
        None => {
            output::warning(format!("Unknown command `{command}`. Type `help` for a list."));
            if let Some(best) = suggest(command) {
                output::info(format!("Suggestion: `{best}`?"));
            }
            Ok(LoopControl::Continue)
        }
    }
}

fn suggest(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|entry| (levenshtein(entry.name, input), entry.name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

fn cmd_help(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for entry in COMMANDS {
        output::info(format!("  {:<72} {}", entry.usage, entry.description));
    }
    Ok(LoopControl::Continue)
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first().copied())?;
    let format = context.amount_format();
    let obligations = context.book.obligations();
    let summary = context.tracker.summary(obligations, &month);
    let undated = total_monthly(obligations, MonthScope::Undated);

    output::section(format!("Summary for {}", month_label(&month, &context.config.locale)));
    output::info(format!("Monthly total: {}", format.format(summary.total)));
    output::info(format!(
        "Paid: {} ({} items)",
        format.format(summary.paid_total),
        summary.paid_count
    ));
    output::info(format!(
        "Unpaid: {} ({} items)",
        format.format(summary.unpaid_total),
        summary.unpaid_count
    ));
    output::info(format!(
        "Running total incl. all installment plans: {}",
        format.format(undated)
    ));

    let orphans = context.tracker.orphaned_keys(obligations);
    if !orphans.is_empty() {
        output::warning(format!(
            "{} payment record(s) refer to deleted obligations",
            orphans.len()
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut status = StatusFilter::All;
    let mut month = context.current_month();
    for arg in args {
        match arg.parse::<StatusFilter>() {
            Ok(parsed) => status = parsed,
            Err(_) => month = arg.parse()?,
        }
    }
    let format = context.amount_format();
    let obligations = context.book.obligations();
    let selected = context.tracker.filter_by_status(obligations, &month, status);

    output::section(format!(
        "Obligations for {}",
        month_label(&month, &context.config.locale)
    ));
    if selected.is_empty() {
        output::info("No obligations.");
        return Ok(LoopControl::Continue);
    }
    for item in selected {
        let instance = item.instance_id();
        let position = obligations
            .iter()
            .position(|candidate| candidate.instance_id() == instance)
            .map(|index| index + 1)
            .unwrap_or_default();
        let mark = if context.tracker.is_paid(&instance, &month) {
            "[x]"
        } else {
            "[ ]"
        };
        let inactive = if item.is_active_in(&month) {
            ""
        } else {
            " (inactive)"
        };
        output::info(format!(
            "{position:>3}. {mark} {:<24} {:<12} {:>14}/mo{inactive}  {}",
            item.name(),
            item.interval().label(),
            format.format(monthly_equivalent(item)),
            output::muted(instance)
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_add_fixed(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, amount, interval, rest @ ..] = args else {
        return Err(usage("add-fixed"));
    };
    let mut cost = FixedCost::new(*name, parse_amount(amount)?, interval.parse()?);
    if let Some(category) = rest.first() {
        cost = cost.with_category(*category);
    }
    add_obligation(context, cost.into())
}

fn cmd_add_subscription(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, amount, interval, day, rest @ ..] = args else {
        return Err(usage("add-subscription"));
    };
    let interval: Interval = interval.parse()?;
    let mut sub = Subscription::new(*name, parse_amount(amount)?, interval, parse_day(day)?);
    if let Some(category) = rest.first() {
        sub = sub.with_category(*category);
    }
    add_obligation(context, sub.into())
}

fn cmd_add_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, amount, start, end, rest @ ..] = args else {
        return Err(usage("add-plan"));
    };
    let start = CalendarDate::new(*start);
    let end = CalendarDate::new(*end);
    match (start.parse(), end.parse()) {
        (Some(from), Some(to)) if from <= to => {}
        (Some(_), Some(_)) => {
            return Err(BudgetError::InvalidInput(
                "end date must not be before start date".into(),
            ))
        }
        _ => {
            return Err(BudgetError::InvalidInput(
                "dates must be formatted as YYYY-MM-DD".into(),
            ))
        }
    }
    let mut plan = InstallmentPlan::new(*name, parse_amount(amount)?, start, end);
    if let Some(day) = rest.first() {
        plan.payment_day = Some(parse_day(day)?);
    }
    add_obligation(context, plan.into())
}

fn add_obligation(context: &mut ShellContext, obligation: Obligation) -> CommandResult {
    let name = obligation.name().to_string();
    let instance = context.book.add_obligation(obligation);
    context.save_book()?;
    output::success(format!(
        "Added `{name}` as #{} ({instance})",
        context.book.obligations().len()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(usage("remove"));
    };
    let instance = context.resolve_ref(reference)?;
    let removed = context.book.remove_obligation(&instance)?;
    context.save_book()?;
    output::success(format!("Removed `{}`.", removed.name()));
    Ok(LoopControl::Continue)
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_paid(context, args, true, "pay")
}

fn cmd_unpay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_paid(context, args, false, "unpay")
}

fn set_paid(context: &mut ShellContext, args: &[&str], paid: bool, command: &str) -> CommandResult {
    let (reference, month) = match args {
        [reference] => (*reference, None),
        [reference, month] => (*reference, Some(*month)),
        _ => return Err(usage(command)),
    };
    let instance = context.resolve_ref(reference)?;
    let month = month_arg(context, month)?;
    context.tracker.set_paid(instance, month, paid)?;
    let name = context
        .book
        .obligation(&instance)
        .map(|item| item.name().to_string())
        .unwrap_or_else(|| instance.to_string());
    let state = if paid { "paid" } else { "unpaid" };
    output::success(format!("Marked `{name}` {state} for {month}."));
    Ok(LoopControl::Continue)
}

fn cmd_months(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let before = match args.first() {
        Some(raw) => parse_count(raw)?,
        None => context.config.months_before,
    };
    let after = match args.get(1) {
        Some(raw) => parse_count(raw)?,
        None => context.config.months_after,
    };
    let options = month_options(context.today, before, after, &context.config.locale)?;
    print_month_options(&options);
    Ok(LoopControl::Continue)
}

fn cmd_year(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(usage("year"));
    };
    let year: i32 = raw
        .parse()
        .map_err(|_| BudgetError::InvalidInput(format!("invalid year `{raw}`")))?;
    let options = year_month_options(year, context.today, &context.config.locale);
    if options.is_empty() {
        return Err(BudgetError::InvalidInput(format!("year {year} out of range")));
    }
    print_month_options(&options);
    Ok(LoopControl::Continue)
}

fn print_month_options(options: &[MonthOption]) {
    for option in options {
        let marker = if option.is_current { "*" } else { " " };
        output::info(format!("{marker} {}  {}", option.key, option.label));
    }
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first().copied())?;
    let format = context.amount_format();
    let totals = category_totals(context.book.obligations(), MonthScope::Month(month));
    output::section(format!(
        "Categories for {}",
        month_label(&month, &context.config.locale)
    ));
    if totals.is_empty() {
        output::info("No obligations.");
    }
    for entry in totals {
        output::info(format!(
            "{:<24} {:>14} ({} items)",
            entry.category,
            format.format(entry.total),
            entry.count
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_add_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, target, rest @ ..] = args else {
        return Err(usage("add-goal"));
    };
    let mut goal = SavingsGoal::new(*name, parse_amount(target)?);
    if let Some(date) = rest.first() {
        let date = CalendarDate::new(*date);
        if date.parse().is_none() {
            return Err(BudgetError::InvalidInput(
                "target date must be formatted as YYYY-MM-DD".into(),
            ));
        }
        goal.target_date = Some(date);
    }
    if let Some(saved) = rest.get(1) {
        goal.current_amount = parse_amount(saved)?;
    }
    let name = goal.name.clone();
    context.book.add_savings_goal(goal);
    context.save_book()?;
    output::success(format!("Added savings goal `{name}`."));
    Ok(LoopControl::Continue)
}

fn cmd_goals(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let month = month_arg(context, args.first().copied())?;
    let format = context.amount_format();
    output::section("Savings goals");
    if context.book.savings_goals.is_empty() {
        output::info("No savings goals.");
    }
    for goal in &context.book.savings_goals {
        let needed = match goal.monthly_required(&month) {
            Some(amount) => format!("{}/mo", format.format(amount)),
            None => "no deadline".to_string(),
        };
        output::info(format!(
            "{:<24} {} of {} ({:.0}%)  {}",
            goal.name,
            format.format(goal.current_amount),
            format.format(goal.target_amount),
            goal.progress() * 100.0,
            needed
        ));
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(build_info::current().summary());
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}

fn usage(command: &str) -> BudgetError {
    let usage = COMMANDS
        .iter()
        .find(|entry| entry.name == command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    BudgetError::InvalidInput(format!("usage: {usage}"))
}

fn month_arg(context: &ShellContext, raw: Option<&str>) -> Result<MonthKey, BudgetError> {
    match raw {
        Some(raw) => raw.parse(),
        None => Ok(context.current_month()),
    }
}

/// Parses a non-negative amount; a decimal comma is accepted.
fn parse_amount(raw: &str) -> Result<f64, BudgetError> {
    let value: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| BudgetError::InvalidInput(format!("invalid amount `{raw}`")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(BudgetError::InvalidInput(format!(
            "amount must be zero or positive, got `{raw}`"
        )));
    }
    Ok(value)
}

fn parse_day(raw: &str) -> Result<u8, BudgetError> {
    match raw.parse::<u8>() {
        Ok(day) if (1..=31).contains(&day) => Ok(day),
        _ => Err(BudgetError::InvalidInput(format!(
            "payment day must be between 1 and 31, got `{raw}`"
        ))),
    }
}

fn parse_count(raw: &str) -> Result<u32, BudgetError> {
    raw.parse()
        .map_err(|_| BudgetError::InvalidInput(format!("invalid month count `{raw}`")))
}
