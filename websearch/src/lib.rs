//! Collaborators of the feedback loop that talk to the web: the search API
//! client and the page scraper. Both keep on-disk caches so repeated sessions
//! do not hit the network (or the API quota) again.

pub mod google;
pub mod scrape;

pub use google::{SearchClient, SearchItem};
pub use scrape::{extract_text, PageScraper};
