pub mod clients;
pub mod pipeline;
pub mod protocol;
