use anyhow::{Context, Result};
use dialoguer::{Input, Select};

// Select an item from a list
pub fn select_from_list(items: &[String], prompt: &str) -> Result<usize> {
    let selection = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .context("Failed to select from list")?;

    Ok(selection)
}

// Ask for a line of text
pub fn prompt_input(prompt: &str) -> Result<String> {
    let input = Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .context("Failed to read input")?;

    Ok(input)
}
