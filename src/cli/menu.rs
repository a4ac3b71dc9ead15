//! Interactive numbered menu, the default mode of operation.
//!
//! The menu owns all reading from standard input. Answers are trimmed and
//! blank answers abort the current command with a message; the store layer
//! only ever receives validated text. Every failure returns the session to
//! the menu rather than exiting the process.

use chrono::NaiveDate;
use dialoguer::Input;

use crate::cli::{commands, output, LoadTestArgs};
use crate::db::DbPool;
use crate::error::{Error, Result};

/// Run the menu loop until the operator quits.
pub fn run(pool: &DbPool) -> Result<()> {
    output::note("Welcome to parceltrack. List of available commands:");
    print_menu();

    loop {
        let answer: String = Input::new()
            .with_prompt("command")
            .allow_empty(true)
            .interact_text()?;

        match answer.trim() {
            "q" => {
                output::note("Thank you for using parceltrack.");
                return Ok(());
            }
            "1" => finish(commands::init(pool)),
            "2" => finish(add_location(pool)),
            "3" => finish(add_customer(pool)),
            "4" => finish(add_package(pool)),
            "5" => finish(add_event(pool)),
            "6" => finish(events_for_package(pool)),
            "7" => finish(packages_for_customer(pool)),
            "8" => finish(events_for_location_on_day(pool)),
            "9" => finish(load_test(pool)),
            _ => output::warn("unknown command; enter a number between 1 and 9, or q to quit"),
        }

        print_menu();
    }
}

fn print_menu() {
    output::section("Commands");
    output::note("1. Create the tracking tables");
    output::note("2. Add a new location");
    output::note("3. Add a new customer");
    output::note("4. Add a new package");
    output::note("5. Add a new event");
    output::note("6. List all events for a package");
    output::note("7. List a customer's packages with event counts");
    output::note("8. List events at a location on a given day");
    output::note("9. Run the load test");
    output::note("q. Exit");
}

/// Report a command outcome without leaving the menu.
///
/// A missing entity is expected and reportable; anything else is a store
/// or input failure. Neither aborts the session.
fn finish(result: Result<()>) {
    match result {
        Ok(()) => {}
        Err(err @ Error::NotFound { .. }) => output::warn(&err.to_string()),
        Err(err) => output::error(&err.to_string()),
    }
}

/// Prompt for one answer; `None` means the operator left it blank.
fn prompt(label: &str) -> Result<Option<String>> {
    let answer: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?;

    let answer = answer.trim().to_string();
    if answer.is_empty() {
        output::warn("given answer is empty; returning to menu");
        return Ok(None);
    }
    Ok(Some(answer))
}

fn add_location(pool: &DbPool) -> Result<()> {
    let Some(description) = prompt("name of the location to add")? else {
        return Ok(());
    };
    commands::add_location(pool, &description)
}

fn add_customer(pool: &DbPool) -> Result<()> {
    let Some(name) = prompt("name of the customer to add")? else {
        return Ok(());
    };
    commands::add_customer(pool, &name)
}

fn add_package(pool: &DbPool) -> Result<()> {
    let Some(customer) = prompt("name of the customer the package is for")? else {
        return Ok(());
    };
    let Some(tracking_code) = prompt("tracking code for the package")? else {
        return Ok(());
    };
    commands::add_package(pool, &tracking_code, &customer)
}

fn add_event(pool: &DbPool) -> Result<()> {
    let Some(location) = prompt("location of the event")? else {
        return Ok(());
    };
    let Some(tracking_code) = prompt("tracking code for the package")? else {
        return Ok(());
    };
    let Some(description) = prompt("description of the event")? else {
        return Ok(());
    };
    commands::add_event(pool, &location, &tracking_code, &description)
}

fn events_for_package(pool: &DbPool) -> Result<()> {
    let Some(tracking_code) = prompt("code of the package to track")? else {
        return Ok(());
    };
    commands::events_for_package(pool, &tracking_code)
}

fn packages_for_customer(pool: &DbPool) -> Result<()> {
    let Some(customer) = prompt("name of the customer whose packages to track")? else {
        return Ok(());
    };
    commands::packages_for_customer(pool, &customer)
}

fn events_for_location_on_day(pool: &DbPool) -> Result<()> {
    let Some(location) = prompt("location to list")? else {
        return Ok(());
    };
    let Some(date) = prompt("date (YYYY-MM-DD)")? else {
        return Ok(());
    };

    let date: NaiveDate = match date.parse() {
        Ok(date) => date,
        Err(_) => {
            output::warn("dates must be in YYYY-MM-DD form; returning to menu");
            return Ok(());
        }
    };
    commands::events_for_location_on_day(pool, &location, date)
}

fn load_test(pool: &DbPool) -> Result<()> {
    commands::load_test(
        pool,
        &LoadTestArgs {
            rows: 1000,
            batches: 1000,
            batch_size: 1000,
            queries: 1000,
        },
    )
}
