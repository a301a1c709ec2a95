pub(crate) mod cron;
pub(crate) mod jobs;
pub(crate) mod scrape;
pub(crate) mod serve;
