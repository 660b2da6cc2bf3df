pub mod decision;
pub mod domain;
pub mod evaluation;
pub mod facts;
pub mod judgment;
pub mod record;
pub mod retry;
