//! Scrapes data tables from wiki pages into XML record files, downloads the
//! images they reference and collects translatable names into Android
//! string resources.

pub mod cli;
pub mod config;
pub mod error;
pub mod localization;
pub mod models;
pub mod parsers;
pub mod runner;
pub mod scrapers;
pub mod storage;
pub mod utils;

pub use error::{Result, ScrapeError};
