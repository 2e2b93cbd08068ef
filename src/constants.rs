/// Session key holding the authenticated login identifier.
pub const SESSION_USER_KEY: &str = "user";

pub mod metrics {

    pub const LOGIN_TOTAL: &str = "auth_login_total";

    pub const REGISTRATIONS_TOTAL: &str = "auth_registrations_total";
}
