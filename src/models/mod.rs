pub mod disbursement;
pub mod employee;
pub mod user;

pub use disbursement::{status, Disbursement, Payment, PaymentDestination, PaymentParty};
pub use employee::{Employee, EmployeeView};
pub use user::{User, UserView};
