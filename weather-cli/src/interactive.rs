//! Prompt-driven dashboard loop.

use std::fmt;

use anyhow::Result;
use chrono::Local;
use inquire::{InquireError, Select, Text};
use weather_core::{Dashboard, Notification, WeatherProvider, WeatherRecord, notification::Action};

use crate::{progress::with_spinner, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    AddCity,
    SwitchTab,
    RemoveCity,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuChoice::AddCity => "Add city",
            MenuChoice::SwitchTab => "Switch tab",
            MenuChoice::RemoveCity => "Remove city",
            MenuChoice::Quit => "Quit",
        })
    }
}

/// Menu entries that make sense for the current number of cities.
fn menu_choices(city_count: usize) -> Vec<MenuChoice> {
    let mut choices = vec![MenuChoice::AddCity];
    if city_count > 1 {
        choices.push(MenuChoice::SwitchTab);
    }
    if city_count > 0 {
        choices.push(MenuChoice::RemoveCity);
    }
    choices.push(MenuChoice::Quit);
    choices
}

/// A city as offered in a selection prompt.
#[derive(Debug, Clone)]
struct TabOption {
    id: u64,
    name: String,
}

impl fmt::Display for TabOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn tab_options(records: &[WeatherRecord]) -> Vec<TabOption> {
    records
        .iter()
        .map(|r| TabOption {
            id: r.id,
            name: r.name.clone(),
        })
        .collect()
}

/// Outcome of a single prompt.
#[derive(Debug, PartialEq, Eq)]
enum Answer<T> {
    Value(T),
    /// Escape on a skippable prompt: back to the menu.
    Skipped,
    /// Ctrl-C anywhere, or Escape on the top menu: leave the dashboard.
    Quit,
}

fn answer<T>(result: Result<Option<T>, InquireError>) -> Result<Answer<T>> {
    match result {
        Ok(Some(value)) => Ok(Answer::Value(value)),
        Ok(None) => Ok(Answer::Skipped),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(Answer::Quit)
        }
        Err(e) => Err(e.into()),
    }
}

/// Ask the user to pick a tab, starting on the selected one.
fn pick_tab<P: WeatherProvider>(dashboard: &Dashboard<P>, prompt: &str) -> Result<Answer<u64>> {
    let options = tab_options(dashboard.records());
    let cursor = dashboard
        .selected()
        .and_then(|sel| options.iter().position(|o| o.id == sel.id))
        .unwrap_or(0);

    let picked = Select::new(prompt, options)
        .with_starting_cursor(cursor)
        .prompt_skippable()
        .map(|o| o.map(|o| o.id));
    answer(picked)
}

fn notify(notification: Option<Notification>) {
    match notification {
        Some(n) if n.is_error() => eprintln!("{n}"),
        Some(n) => println!("{n}"),
        None => {}
    }
}

fn print_dashboard<P: WeatherProvider>(dashboard: &Dashboard<P>) {
    println!();
    match dashboard.selected() {
        Some(selected) => {
            println!(
                "{}",
                render::tabs_line(dashboard.records(), Some(selected.id))
            );
            println!("{}", render::card(selected, Local::now().date_naive()));
        }
        None => println!("{}", render::empty_dashboard()),
    }
}

/// Seed the dashboard, then loop on the menu until the user quits.
pub async fn run<P: WeatherProvider>(mut dashboard: Dashboard<P>) -> Result<()> {
    let seeded = with_spinner(
        dashboard.subscribe_busy(),
        "Loading...",
        dashboard.initialize(),
    )
    .await;
    notify(Notification::for_result(Action::Seed, &seeded));

    loop {
        print_dashboard(&dashboard);

        let menu = Select::new("What next?", menu_choices(dashboard.len())).prompt();
        let choice = match answer(menu.map(Some))? {
            Answer::Value(choice) => choice,
            Answer::Skipped => continue,
            Answer::Quit => break,
        };

        match choice {
            MenuChoice::AddCity => {
                let name = match answer(Text::new("City name:").prompt_skippable())? {
                    Answer::Value(name) => name,
                    Answer::Skipped => continue,
                    Answer::Quit => break,
                };
                let message = format!("Fetching {}...", name.trim());
                let result =
                    with_spinner(dashboard.subscribe_busy(), &message, dashboard.add_city(&name))
                        .await;
                notify(Notification::for_result(Action::AddCity, &result));
            }
            MenuChoice::SwitchTab => match pick_tab(&dashboard, "Show city:")? {
                Answer::Value(id) => {
                    dashboard.select(id)?;
                }
                Answer::Skipped => {}
                Answer::Quit => break,
            },
            MenuChoice::RemoveCity => match pick_tab(&dashboard, "Remove city:")? {
                Answer::Value(id) => {
                    let result = dashboard.remove_city(id);
                    notify(Notification::for_result(Action::RemoveCity, &result));
                }
                Answer::Skipped => {}
                Answer::Quit => break,
            },
            MenuChoice::Quit => break,
        }
    }

    Ok(())
}
