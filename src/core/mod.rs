pub mod advisory;
pub mod catalog;
pub mod crop_scoring;
pub mod disease;
pub mod fertilizer;
pub mod forecast;
pub mod news;
pub mod registration;
