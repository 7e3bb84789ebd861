pub mod contacts;
pub mod outreach;
