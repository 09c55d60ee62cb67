//! Request and response bodies

pub mod accounts;
