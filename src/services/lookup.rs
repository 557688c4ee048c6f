//! External catalog lookup against the Open Library books API.
//!
//! `GET https://openlibrary.org/isbn/{isbn}.json` describes an edition; the
//! author entries there only carry keys, so each name costs one more request.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

const OPEN_LIBRARY_URL: &str = "https://openlibrary.org";

/// Book data as found in the external catalog
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookData {
    pub title: String,
    pub publish_date: Option<String>,
    pub covers: Vec<i64>,
    pub authors: Option<Vec<Author>>,
    pub number_of_pages: Option<i64>,
    pub isbn13: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct EditionResponse {
    title: String,
    publish_date: Option<String>,
    #[serde(default)]
    covers: Vec<i64>,
    #[serde(default)]
    authors: Vec<AuthorRef>,
    number_of_pages: Option<i64>,
    #[serde(default)]
    isbn_13: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    name: String,
}

#[derive(Clone)]
pub struct LookupService {
    client: reqwest::Client,
    base_url: String,
}

impl LookupService {
    pub fn new() -> Self {
        Self::with_base_url(OPEN_LIBRARY_URL.to_string())
    }

    /// Base URL injection point for tests
    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build the catalog HTTP client");
        Self { client, base_url }
    }

    /// Look up a book by ISBN. Returns None when the catalog does not know
    /// the ISBN; network and decode failures surface as Lookup errors.
    pub async fn lookup_book(&self, isbn: &str) -> AppResult<Option<BookData>> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::Lookup(format!(
                "Open Library returned status {}",
                response.status()
            )));
        }

        let edition: EditionResponse = response.json().await?;

        let mut authors = Vec::new();
        for author_ref in &edition.authors {
            if let Some(name) = self.author_name(&author_ref.key).await? {
                authors.push(Author { name });
            }
        }

        Ok(Some(BookData {
            title: edition.title,
            publish_date: edition.publish_date,
            covers: edition.covers,
            authors: if authors.is_empty() { None } else { Some(authors) },
            number_of_pages: edition.number_of_pages,
            isbn13: edition.isbn_13,
        }))
    }

    /// Resolve one author key ("/authors/OL...A") to a display name.
    /// A missing author record is skipped, not fatal.
    async fn author_name(&self, key: &str) -> AppResult<Option<String>> {
        let url = format!("{}{}.json", self.base_url, key);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let author: AuthorResponse = response.json().await?;
        Ok(Some(author.name))
    }
}

impl Default for LookupService {
    fn default() -> Self {
        Self::new()
    }
}
