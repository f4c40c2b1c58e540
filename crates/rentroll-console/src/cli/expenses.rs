/*
[INPUT]:  `expenses` subcommand arguments, AppContext
[OUTPUT]: Expense listings, record views, saved or reversed expenses
[POS]:    CLI layer - one-shot expense operations over ExpenseWorkspace
[UPDATE]: When expense fields or form operations change
*/

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use rentroll_console::expense::{ExpenseField, FieldEdit, FormView, GridRow, RentalPick};
use rentroll_console::{ExpenseWorkspace, Intent, Outcome, Step};

use super::{AppContext, current_month, parse_date_arg, range_from_args};

#[derive(Debug, Subcommand)]
pub enum ExpenseCommand {
    /// List expenses in a date range (current month by default)
    List {
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        stop: Option<NaiveDate>,
    },
    /// Show one expense the way the edit form would
    Show { expid: i64 },
    /// Create a new expense
    Add(ExpenseArgs),
    /// Change fields of an existing expense
    Edit {
        expid: i64,
        #[command(flatten)]
        fields: ExpenseArgs,
    },
    /// Reverse an expense
    Reverse {
        expid: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Default, Args)]
pub struct ExpenseArgs {
    /// Account rule id (ARID)
    #[arg(long = "rule", value_name = "ARID")]
    pub arid: Option<i64>,
    /// Amount, e.g. 125.50 or $1,250.00
    #[arg(long)]
    pub amount: Option<String>,
    /// Expense date (M/D/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Rental agreement id
    #[arg(long)]
    pub raid: Option<i64>,
    /// Rentable id; sets RAID and rentable name together
    #[arg(long)]
    pub rid: Option<i64>,
    /// Rentable name
    #[arg(long)]
    pub rentable: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
}

impl ExpenseArgs {
    pub fn edits(&self) -> Result<Vec<FieldEdit>> {
        let mut edits = Vec::new();
        if let Some(arid) = self.arid {
            edits.push(FieldEdit::AccountRule(arid));
        }
        if let Some(raw) = &self.amount {
            edits.push(parse(ExpenseField::Amount, raw)?);
        }
        if let Some(raw) = &self.date {
            edits.push(parse(ExpenseField::Date, raw)?);
        }
        match self.rid {
            Some(rid) => edits.push(FieldEdit::Rental(RentalPick {
                raid: self.raid.unwrap_or_default(),
                rid,
                rname: self.rentable.clone().unwrap_or_default(),
            })),
            None => {
                if let Some(raid) = self.raid {
                    edits.push(FieldEdit::RentalAgreement(raid));
                }
                if let Some(rname) = &self.rentable {
                    edits.push(FieldEdit::Rentable(rname.clone()));
                }
            }
        }
        if let Some(comment) = &self.comment {
            edits.push(FieldEdit::Comment(comment.clone()));
        }
        Ok(edits)
    }
}

fn parse(field: ExpenseField, raw: &str) -> Result<FieldEdit> {
    FieldEdit::parse(field, raw).map_err(|reason| anyhow::anyhow!("{}: {reason}", field.label()))
}

pub async fn run_expenses(ctx: AppContext, command: ExpenseCommand) -> Result<()> {
    match command {
        ExpenseCommand::List { start, stop } => {
            let mut workspace = ctx.workspace(range_from_args(start, stop)?);
            let outcome = workspace.refresh().await;
            finish(&outcome)?;
            print_rows(&workspace);
        }
        ExpenseCommand::Show { expid } => {
            let mut workspace = ctx.workspace(current_month()?);
            finish(&workspace.open_expense(expid).await)?;
            print_form(&workspace);
        }
        ExpenseCommand::Add(fields) => {
            let edits = fields.edits()?;
            let mut workspace = ctx.workspace(current_month()?);
            finish(&workspace.run(Intent::AddNew).await)?;
            for edit in edits {
                workspace.edit(edit)?;
            }
            report(workspace.save().await)?;
        }
        ExpenseCommand::Edit { expid, fields } => {
            let edits = fields.edits()?;
            let mut workspace = ctx.workspace(current_month()?);
            finish(&workspace.open_expense(expid).await)?;
            for edit in edits {
                workspace.edit(edit)?;
            }
            if !workspace.form().is_dirty() {
                println!("{}", style("Nothing to change.").yellow());
                return Ok(());
            }
            report(workspace.save().await)?;
        }
        ExpenseCommand::Reverse { expid, yes } => {
            let mut workspace = ctx.workspace(current_month()?);
            finish(&workspace.open_expense(expid).await)?;
            let intent = match workspace.begin(Intent::Reverse)? {
                Step::Ready(intent) => intent,
                Step::Confirm { prompt, intent } => {
                    if !yes && !confirm(&prompt.message())? {
                        workspace.decline();
                        println!("{}", style("Cancelled.").yellow());
                        return Ok(());
                    }
                    intent
                }
            };
            report(workspace.run(intent).await)?;
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Turn a failed outcome into an error, printing validation details
fn finish(outcome: &Outcome) -> Result<()> {
    match outcome {
        Outcome::Invalid(errors) => {
            for err in errors {
                eprintln!(
                    "  {} {}",
                    style(format!("{}:", err.field.label())).red(),
                    err.message
                );
            }
            bail!("expense not saved");
        }
        outcome if !outcome.is_success() => bail!("{}", outcome.summary()),
        _ => Ok(()),
    }
}

fn report(outcome: Outcome) -> Result<()> {
    finish(&outcome)?;
    println!("{}", style(outcome.summary()).green());
    Ok(())
}

fn print_rows(workspace: &ExpenseWorkspace) {
    let range = workspace.session().range();
    println!(
        "{} {}",
        style(format!("Expenses {}", workspace.session().business().bud)).bold(),
        style(range.label()).dim()
    );
    println!(
        "{:<2} {:>6} {:<10} {:<24} {:>14} {:<8} {:<16} {}",
        "", "EXPID", "Date", "Account Rule", "Amount", "RA", "Rentable", "Comment"
    );
    for row in workspace.grid().rows() {
        let line = format_row(&row);
        if row.reversed {
            println!("{}", style(line).dim());
        } else {
            println!("{line}");
        }
    }
    println!(
        "{}",
        style(format!(
            "{} of {} shown",
            workspace.grid().len(),
            workspace.grid().total()
        ))
        .dim()
    );
}

fn format_row(row: &GridRow) -> String {
    format!(
        "{:<2} {:>6} {:<10} {:<24} {:>14} {:<8} {:<16} {}",
        row.marker,
        row.expid,
        row.date,
        row.account_rule,
        row.amount,
        row.rental_agreement,
        row.rentable,
        row.comment
    )
}

fn print_form(workspace: &ExpenseWorkspace) {
    let Some(view) = workspace.form().view() else {
        return;
    };
    print_view(&view);
}

fn print_view(view: &FormView) {
    println!("{}  {}", style(&view.header).bold(), style(view.state).cyan());
    for input in &view.inputs {
        let label = format!("{:>18}:", input.field.label());
        println!("{} {}", style(label).dim(), input.value);
    }
    if view.show_info {
        for line in &view.flag_report {
            println!("{}", style(line).dim());
        }
    }
    let actions: Vec<&str> = view.visible_buttons().map(|button| button.label()).collect();
    if !actions.is_empty() {
        println!("{} {}", style("Actions:").dim(), actions.join(", "));
    }
}
