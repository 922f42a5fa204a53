//! Interactive session state and the handlers that drive it.
//!
//! A [`Session`] holds everything one user works on: the fetched headlines,
//! the chosen one, the generated post and the parsed slides. Each handler
//! takes the session mutably and changes it only when its external call
//! succeeds, so a failed fetch or generation leaves the previous results in
//! place for the user to retry.

use crate::api::{ask_logged, AskAsync};
use crate::error::{LinkcraftError, Result};
use crate::models::HeadlineQuery;
use crate::news::HeadlineSource;
use crate::prompts;
use crate::slides::{parse_slides_with_stats, SlideRecord};
use tracing::{info, instrument, warn};

/// How a successful handler ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Results were produced and stored.
    Done,
    /// The call worked but produced nothing; a warning, not an error.
    Empty,
}

impl Outcome {
    fn of<T>(items: &[T]) -> Self {
        if items.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Done
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    industry: Option<String>,
    headlines: Vec<String>,
    selected: Option<String>,
    post: Option<String>,
    slides: Vec<SlideRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a headline chosen outside the session, e.g. on the
    /// command line.
    pub fn with_headline(industry: impl Into<String>, headline: impl Into<String>) -> Self {
        let headline = headline.into();
        Self {
            industry: Some(industry.into()),
            headlines: vec![headline.clone()],
            selected: Some(headline),
            ..Self::default()
        }
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    pub fn headlines(&self) -> &[String] {
        &self.headlines
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn post(&self) -> Option<&str> {
        self.post.as_deref()
    }

    pub fn slides(&self) -> &[SlideRecord] {
        &self.slides
    }

    /// Fetch headlines for `query`, replacing the current list and clearing
    /// everything derived from the old one.
    #[instrument(level = "info", skip_all, fields(industry = %query.industry))]
    pub async fn fetch_headlines<S: HeadlineSource>(
        &mut self,
        source: &S,
        query: HeadlineQuery,
    ) -> Result<Outcome> {
        let headlines = source.headlines(&query).await?;
        let outcome = Outcome::of(&headlines);
        if outcome == Outcome::Empty {
            warn!("No headlines found for the selected industry and date range");
        }

        self.industry = Some(query.industry);
        self.headlines = headlines;
        self.selected = None;
        self.post = None;
        self.slides.clear();
        Ok(outcome)
    }

    /// Select the headline at zero-based `index`.
    pub fn select_headline(&mut self, index: usize) -> Result<&str> {
        let headline = self
            .headlines
            .get(index)
            .cloned()
            .ok_or(LinkcraftError::NoSuchHeadline(index + 1))?;

        if self.selected.as_deref() != Some(headline.as_str()) {
            self.post = None;
            self.slides.clear();
        }
        info!(index, %headline, "Selected headline");
        Ok(self.selected.insert(headline).as_str())
    }

    /// Generate a LinkedIn post for the selected headline.
    #[instrument(level = "info", skip_all)]
    pub async fn generate_post<A: AskAsync>(&mut self, llm: &A) -> Result<&str> {
        let headline = self.selected.as_deref().ok_or(LinkcraftError::NothingSelected)?;
        let industry = self.industry.as_deref().unwrap_or_default();
        let prompt = prompts::linkedin_post(headline, industry);

        let post = ask_logged(llm, "post", &prompt).await?;
        self.slides.clear();
        Ok(self.post.insert(post).as_str())
    }

    /// Break the current post into slides.
    #[instrument(level = "info", skip_all)]
    pub async fn generate_slides<A: AskAsync>(&mut self, llm: &A) -> Result<Outcome> {
        let post = self.post.as_deref().ok_or(LinkcraftError::NoPost)?;
        let prompt = prompts::slide_breakdown(post);

        let raw = ask_logged(llm, "slides", &prompt).await?;
        let parsed = parse_slides_with_stats(&raw);
        if parsed.skipped > 0 {
            warn!(
                skipped = parsed.skipped,
                "Dropped paragraphs without an image prompt marker"
            );
        }

        let outcome = Outcome::of(&parsed.slides);
        if outcome == Outcome::Empty {
            warn!("No slides could be parsed from the generated text");
        }
        info!(count = parsed.slides.len(), "Parsed slides");
        self.slides = parsed.slides;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateRange;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    struct FakeSource(Option<Vec<&'static str>>);

    impl HeadlineSource for FakeSource {
        async fn headlines(&self, _query: &HeadlineQuery) -> Result<Vec<String>> {
            match &self.0 {
                Some(titles) => Ok(titles.iter().map(|t| t.to_string()).collect()),
                None => Err(LinkcraftError::ExternalService {
                    service: "NewsAPI",
                    message: "rateLimited".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct FakeLlm {
        reply: Option<&'static str>,
        prompts: RefCell<Vec<String>>,
    }

    impl FakeLlm {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                ..Self::default()
            }
        }
    }

    impl AskAsync for FakeLlm {
        async fn ask(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            self.reply
                .map(str::to_string)
                .ok_or(LinkcraftError::ExternalService {
                    service: "OpenAI",
                    message: "quota".to_string(),
                })
        }
    }

    fn query(industry: &str) -> HeadlineQuery {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        HeadlineQuery::new(industry, DateRange::ending_on(today))
    }

    #[tokio::test]
    async fn test_fetch_stores_headlines() {
        let mut session = Session::new();
        let outcome = session
            .fetch_headlines(&FakeSource(Some(vec!["A", "B"])), query("finance"))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(session.headlines(), ["A", "B"]);
        assert_eq!(session.industry(), Some("finance"));
        assert_eq!(session.selected(), None);
    }

    #[tokio::test]
    async fn test_fetch_empty_is_warning() {
        let mut session = Session::new();
        let outcome = session
            .fetch_headlines(&FakeSource(Some(vec![])), query("fashion"))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Empty);
        assert!(session.headlines().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_state() {
        let mut session = Session::new();
        session
            .fetch_headlines(&FakeSource(Some(vec!["A", "B"])), query("finance"))
            .await
            .unwrap();
        session.select_headline(1).unwrap();

        let err = session
            .fetch_headlines(&FakeSource(None), query("sports"))
            .await
            .unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(session.headlines(), ["A", "B"]);
        assert_eq!(session.selected(), Some("B"));
        assert_eq!(session.industry(), Some("finance"));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut session = Session::with_headline("travel", "Only one");
        let err = session.select_headline(3).unwrap_err();
        assert!(matches!(err, LinkcraftError::NoSuchHeadline(4)));
        assert_eq!(session.selected(), Some("Only one"));
    }

    #[tokio::test]
    async fn test_generate_post_uses_headline_and_industry() {
        let mut session = Session::with_headline("healthcare", "AI reads X-rays");
        let llm = FakeLlm::replying("Generated post");
        let post = session.generate_post(&llm).await.unwrap();
        assert_eq!(post, "Generated post");

        let prompts = llm.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"AI reads X-rays\""));
        assert!(prompts[0].contains("healthcare professionals"));
    }

    #[tokio::test]
    async fn test_generate_post_requires_selection() {
        let mut session = Session::new();
        let err = session.generate_post(&FakeLlm::replying("x")).await.unwrap_err();
        assert!(matches!(err, LinkcraftError::NothingSelected));
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_previous_post() {
        let mut session = Session::with_headline("finance", "Rates hold");
        session.generate_post(&FakeLlm::replying("First post")).await.unwrap();

        let err = session.generate_post(&FakeLlm::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI error: quota");
        assert_eq!(session.post(), Some("First post"));
    }

    #[tokio::test]
    async fn test_generate_slides_parses_reply() {
        let mut session = Session::with_headline("technology", "Chips get faster");
        session.generate_post(&FakeLlm::replying("A post")).await.unwrap();

        let llm = FakeLlm::replying(
            "Sure! Here are your slides:\n\nThe Hook\nChips doubled in speed\nImage Prompt: A glowing microchip\n\nWhy it matters\nImage Prompt: Engineers at work",
        );
        let outcome = session.generate_slides(&llm).await.unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(session.slides().len(), 2);
        assert_eq!(session.slides()[0].title, "The Hook");
        assert_eq!(session.slides()[0].points, vec!["Chips doubled in speed"]);
        assert!(session.slides()[1].points.is_empty());
        assert!(llm.prompts.borrow()[0].ends_with("A post"));
    }

    #[tokio::test]
    async fn test_generate_slides_empty_is_warning() {
        let mut session = Session::with_headline("travel", "Flights resume");
        session.generate_post(&FakeLlm::replying("A post")).await.unwrap();
        let outcome = session
            .generate_slides(&FakeLlm::replying("I cannot do that."))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Empty);
        assert!(session.slides().is_empty());
    }

    #[tokio::test]
    async fn test_generate_slides_requires_post() {
        let mut session = Session::with_headline("travel", "Flights resume");
        let err = session.generate_slides(&FakeLlm::replying("x")).await.unwrap_err();
        assert!(matches!(err, LinkcraftError::NoPost));
    }

    #[tokio::test]
    async fn test_new_selection_clears_post_and_slides() {
        let mut session = Session::new();
        session
            .fetch_headlines(&FakeSource(Some(vec!["A", "B"])), query("finance"))
            .await
            .unwrap();
        session.select_headline(0).unwrap();
        session.generate_post(&FakeLlm::replying("Post")).await.unwrap();
        session
            .generate_slides(&FakeLlm::replying("T\nImage Prompt: p"))
            .await
            .unwrap();

        session.select_headline(0).unwrap();
        assert_eq!(session.post(), Some("Post"));
        assert_eq!(session.slides().len(), 1);

        session.select_headline(1).unwrap();
        assert_eq!(session.post(), None);
        assert!(session.slides().is_empty());
    }
}
