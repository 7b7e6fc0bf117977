pub mod error;
pub mod issue;
pub mod repo;
pub mod token;
