pub use super::customers::Entity as Customers;
pub use super::student_details::Entity as StudentDetails;
pub use super::students::Entity as Students;
pub use super::user_info::Entity as UserInfo;
pub use super::users::Entity as Users;
