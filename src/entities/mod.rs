pub mod prelude;

pub mod customers;
pub mod student_details;
pub mod students;
pub mod user_info;
pub mod users;
