//! Runners for each CLI command.
//!
//! Every runner works on a fresh [`Session`]; the interactive runner keeps
//! one session alive for the whole loop and reports handler errors without
//! leaving it.

use crate::api::OpenAiChat;
use crate::cli::{HeadlineArgs, ParseArgs, PostArgs, SlidesArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::models::{parse_date, DateRange, HeadlineQuery};
use crate::news::NewsApiClient;
use crate::session::{Outcome, Session};
use crate::slides::{format_slides, parse_slides, SlideRecord};
use crate::ui::{self, MenuChoice};
use reqwest::Client;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument};

/// The two external services a session talks to.
#[derive(Debug)]
pub struct Clients {
    pub news: NewsApiClient,
    pub llm: OpenAiChat,
}

impl Clients {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("linkcraft/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            news: NewsApiClient::new(
                http.clone(),
                settings.news_api_key.clone(),
                &settings.news_api_url,
            )?,
            llm: OpenAiChat::new(http, settings)?,
        })
    }
}

fn range_from_args(from: Option<&str>, to: Option<&str>) -> Result<DateRange> {
    let start = from.map(parse_date).transpose()?;
    let end = to.map(parse_date).transpose()?;
    DateRange::from_inputs(start, end)
}

fn print_slides_as(slides: &[SlideRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(slides)?);
    } else if slides.is_empty() {
        ui::print_warning("No slides could be parsed from the generated text.");
    } else {
        ui::print_slides(slides);
    }
    Ok(())
}

#[instrument(level = "info", skip_all, fields(industry = %args.industry))]
pub async fn run_headlines(clients: &Clients, args: &HeadlineArgs) -> Result<()> {
    let range = range_from_args(args.from.as_deref(), args.to.as_deref())?;
    let mut session = Session::new();
    match session
        .fetch_headlines(&clients.news, HeadlineQuery::new(&args.industry, range))
        .await?
    {
        Outcome::Empty => {
            ui::print_warning("No headlines found for the selected industry and date range.")
        }
        Outcome::Done => ui::print_headlines(session.headlines(), None),
    }
    Ok(())
}

pub async fn run_post(clients: &Clients, args: &PostArgs) -> Result<()> {
    let mut session = Session::with_headline(&args.industry, &args.headline);
    let post = session.generate_post(&clients.llm).await?;
    ui::print_post(post);
    Ok(())
}

pub async fn run_slides(clients: &Clients, args: &SlidesArgs) -> Result<()> {
    let mut session = Session::with_headline(&args.post.industry, &args.post.headline);
    session.generate_post(&clients.llm).await?;
    if !args.json {
        ui::print_post(session.post().unwrap_or_default());
    }
    session.generate_slides(&clients.llm).await?;
    print_slides_as(session.slides(), args.json)
}

/// Parse a saved slide outline. Needs no credentials.
pub async fn run_parse(args: &ParseArgs) -> Result<()> {
    let text = if args.input == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        text
    } else {
        tokio::fs::read_to_string(&args.input).await?
    };

    let slides = parse_slides(&text);
    info!(count = slides.len(), "Parsed slide outline");
    if args.normalize {
        println!("{}", format_slides(&slides));
        return Ok(());
    }
    print_slides_as(&slides, args.json)
}

/// Industry and date range the interactive session fetches with.
struct Filters {
    industry: String,
    range: DateRange,
}

/// Ask for industry and dates. `None` when stdin closes.
fn choose_filters() -> Result<Option<Filters>> {
    ui::print_industries();
    let industry = loop {
        let Some(answer) = ui::prompt_line("Select a news segment (number or keyword):")? else {
            return Ok(None);
        };
        match ui::industry_from_answer(&answer) {
            Some(industry) => break industry,
            None => ui::print_warning("Pick a number from the list or type a keyword."),
        }
    };

    let range = loop {
        let Some(from) = ui::prompt_line("Start date (YYYY-MM-DD, blank for a week ago):")? else {
            return Ok(None);
        };
        let Some(to) = ui::prompt_line("End date (YYYY-MM-DD, blank for today):")? else {
            return Ok(None);
        };
        let from = Some(from.as_str()).filter(|s| !s.is_empty());
        let to = Some(to.as_str()).filter(|s| !s.is_empty());
        match range_from_args(from, to) {
            Ok(range) => break range,
            Err(e) => ui::print_error(&e),
        }
    };

    ui::print_range(&range);
    Ok(Some(Filters { industry, range }))
}

/// Run the menu-driven session until the user quits or stdin closes.
pub async fn run_interactive(clients: &Clients) -> Result<()> {
    ui::print_banner();
    let Some(mut filters) = choose_filters()? else {
        return Ok(());
    };
    let mut session = Session::new();

    loop {
        ui::print_menu();
        let Some(answer) = ui::prompt_line(">")? else {
            break;
        };
        let Some(choice) = ui::menu_choice_from_answer(&answer) else {
            ui::print_warning("Unknown choice.");
            continue;
        };
        debug!(?choice, "Menu choice");

        match choice {
            MenuChoice::FetchHeadlines => {
                let query = HeadlineQuery::new(filters.industry.clone(), filters.range);
                match session.fetch_headlines(&clients.news, query).await {
                    Ok(Outcome::Empty) => ui::print_warning(
                        "No headlines found for the selected industry and date range.",
                    ),
                    Ok(Outcome::Done) => ui::print_headlines(session.headlines(), None),
                    Err(e) => ui::print_error(&e),
                }
            }
            MenuChoice::SelectHeadline => {
                if session.headlines().is_empty() {
                    ui::print_warning("Fetch headlines first.");
                    continue;
                }
                ui::print_headlines(session.headlines(), session.selected());
                let Some(answer) = ui::prompt_line("Select a news headline (number):")? else {
                    break;
                };
                match ui::headline_index_from_answer(&answer) {
                    Some(index) => match session.select_headline(index) {
                        Ok(headline) => ui::print_info(&format!("Selected: {headline}")),
                        Err(e) => ui::print_error(&e),
                    },
                    None => ui::print_warning("Enter the headline's number."),
                }
            }
            MenuChoice::GeneratePost => {
                ui::print_info("Generating LinkedIn post…");
                match session.generate_post(&clients.llm).await {
                    Ok(post) => ui::print_post(post),
                    Err(e) => ui::print_error(&e),
                }
            }
            MenuChoice::GenerateSlides => {
                ui::print_info("Generating slides…");
                match session.generate_slides(&clients.llm).await {
                    Ok(Outcome::Empty) => {
                        ui::print_warning("No slides could be parsed from the generated text.")
                    }
                    Ok(Outcome::Done) => ui::print_slides(session.slides()),
                    Err(e) => ui::print_error(&e),
                }
            }
            MenuChoice::ChangeFilters => match choose_filters()? {
                Some(new_filters) => filters = new_filters,
                None => break,
            },
            MenuChoice::Show => show_session(&session, &filters),
            MenuChoice::Quit => break,
        }
    }

    info!("Interactive session ended");
    Ok(())
}

fn show_session(session: &Session, filters: &Filters) {
    ui::print_info(&format!(
        "Industry: {} | Date range: {}",
        filters.industry, filters.range
    ));
    match session.industry() {
        Some(industry) if !session.headlines().is_empty() => {
            ui::print_info(&format!("Headlines fetched for: {industry}"));
            ui::print_headlines(session.headlines(), session.selected());
        }
        _ => ui::print_info("No headlines fetched yet."),
    }
    if let Some(post) = session.post() {
        ui::print_post(post);
    }
    if !session.slides().is_empty() {
        ui::print_slides(session.slides());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkcraftError;

    #[test]
    fn test_range_from_args_explicit() {
        let range = range_from_args(Some("2025-01-01"), Some("2025-01-07")).unwrap();
        assert_eq!(range.to_string(), "2025-01-01 → 2025-01-07");
    }

    #[test]
    fn test_range_from_args_reversed() {
        let err = range_from_args(Some("2025-01-07"), Some("2025-01-01")).unwrap_err();
        assert!(matches!(err, LinkcraftError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_range_from_args_bad_date() {
        let err = range_from_args(Some("yesterday"), None).unwrap_err();
        assert!(matches!(err, LinkcraftError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn test_run_parse_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outline.txt");
        tokio::fs::write(&path, "Intro\n\nTitle\nPoint\nImage Prompt: picture")
            .await
            .unwrap();
        let args = ParseArgs {
            input: path,
            json: true,
            normalize: false,
        };
        run_parse(&args).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_parse_missing_file() {
        let args = ParseArgs {
            input: "/definitely/not/here.txt".into(),
            json: false,
            normalize: false,
        };
        assert!(matches!(run_parse(&args).await, Err(LinkcraftError::Io(_))));
    }
}
