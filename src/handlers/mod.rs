pub mod auth;
pub mod disbursement;
pub mod employee;
pub mod health;
pub mod webhook;
