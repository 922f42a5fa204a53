//! Terminal presentation: rendering session contents and reading choices.
//!
//! Rendering functions write to stdout. Prompts read one line from stdin and
//! return `None` at end of input so callers can stop cleanly.

use crate::error::LinkcraftError;
use crate::models::{DateRange, INDUSTRIES};
use crate::slides::SlideRecord;
use crate::utils::upcase;
use colored::Colorize;
use std::io::{self, BufRead, Write};

pub fn print_banner() {
    println!("{}", "LinkCraft".bold());
    println!("{}", "AI-Powered LinkedIn Content Composer".bold().blue());
    println!(
        "Select an industry, choose a trending headline, and get a LinkedIn post \
         tailored to professionals in that field, plus a slide outline."
    );
    println!();
}

pub fn print_industries() {
    println!("{}", "News segments".bold());
    for (i, industry) in INDUSTRIES.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, upcase(industry));
    }
}

pub fn print_headlines(headlines: &[String], selected: Option<&str>) {
    println!("\n{}", "Top headlines".bold());
    for (i, headline) in headlines.iter().enumerate() {
        let marker = if selected == Some(headline.as_str()) {
            "●".green().to_string()
        } else {
            "○".to_string()
        };
        println!("  {marker} {:>2}. {headline}", i + 1);
    }
}

pub fn print_post(post: &str) {
    println!("\n{}", "Generated LinkedIn Post".bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{post}");
    println!("{}", "─".repeat(60).dimmed());
}

pub fn print_slides(slides: &[SlideRecord]) {
    for (i, slide) in slides.iter().enumerate() {
        let title = if slide.title.is_empty() {
            "(untitled)"
        } else {
            slide.title.as_str()
        };
        println!("\n{} {}", format!("Slide {}:", i + 1).bold().cyan(), title.bold());
        for point in &slide.points {
            println!("  • {point}");
        }
        println!("  {} {}", "Image prompt:".italic().dimmed(), slide.image_prompt);
    }
}

pub fn print_warning(message: &str) {
    println!("{} {message}", "warning:".yellow().bold());
}

pub fn print_error(error: &LinkcraftError) {
    eprintln!("{} {error}", "error:".red().bold());
}

pub fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

/// Print `label` and read one trimmed line. `None` means stdin is closed.
pub fn prompt_line(label: &str) -> io::Result<Option<String>> {
    print!("{} ", label.bold());
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Resolve a menu answer: a 1-based number from the industry list, or any
/// non-empty free-form keyword.
pub fn industry_from_answer(answer: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=INDUSTRIES.len()).contains(&n) => Some(INDUSTRIES[n - 1].to_string()),
        Ok(_) => None,
        Err(_) => Some(answer.to_string()),
    }
}

/// Parse a 1-based headline number into a zero-based index.
pub fn headline_index_from_answer(answer: &str) -> Option<usize> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .map(|n| n - 1)
}

pub fn print_range(range: &DateRange) {
    print_info(&format!("Date range: {range}"));
}

/// Actions offered by the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    FetchHeadlines,
    SelectHeadline,
    GeneratePost,
    GenerateSlides,
    ChangeFilters,
    Show,
    Quit,
}

pub fn print_menu() {
    println!(
        "\n[{}] Fetch headlines  [{}] Select headline  [{}] Generate LinkedIn post  \
         [{}] Generate slides  [{}] Change industry/dates  [{}] Show session  [{}] Quit",
        "1".bold(),
        "2".bold(),
        "3".bold(),
        "4".bold(),
        "5".bold(),
        "6".bold(),
        "q".bold()
    );
}

pub fn menu_choice_from_answer(answer: &str) -> Option<MenuChoice> {
    match answer.trim().to_lowercase().as_str() {
        "1" | "f" | "fetch" => Some(MenuChoice::FetchHeadlines),
        "2" | "s" | "select" => Some(MenuChoice::SelectHeadline),
        "3" | "p" | "post" => Some(MenuChoice::GeneratePost),
        "4" | "slides" => Some(MenuChoice::GenerateSlides),
        "5" | "c" | "change" => Some(MenuChoice::ChangeFilters),
        "6" | "show" => Some(MenuChoice::Show),
        "q" | "quit" | "exit" => Some(MenuChoice::Quit),
        _ => None,
    }
}
