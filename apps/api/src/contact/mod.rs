pub mod handlers;
pub mod journal;
pub mod payload;
pub mod pipeline;
