//! Prompt command handler

use anyhow::Result;
use colored::*;
use std::path::Path;

use super::form;

/// Print the prompt the form would send
pub fn print_prompt(path: &Path) -> Result<()> {
    let (form, session) = form::load(path)?;

    println!(
        "{}",
        format!("Prompt for {} / {}:", form.client_name, form.use_case_name).bold()
    );
    println!("{}", "─".repeat(80).dimmed());
    println!("{}", session.prompt());
    println!("{}", "─".repeat(80).dimmed());

    Ok(())
}
