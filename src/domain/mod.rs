pub mod budget;
pub mod checklist;
pub mod inspection;
pub mod readable_id;
pub mod workflow;
