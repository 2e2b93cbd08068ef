mod init;
mod register;
mod whois;

pub use init::cmd_init;
pub use register::cmd_register;
pub use whois::cmd_whois;
