pub mod address_lookup;
pub mod clients;
pub mod equipment;
pub mod inspection;
pub mod orders;
pub mod reports;
pub mod summarizer;
