pub mod account;
pub mod customer;
pub mod student;
pub mod user;
