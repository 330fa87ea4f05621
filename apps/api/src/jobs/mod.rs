pub mod handlers;
pub mod recommend;
pub mod scraper;
