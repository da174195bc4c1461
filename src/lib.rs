pub mod kerberos;
pub mod realm;
pub mod flow;
pub mod time;
pub mod result;
pub mod common;
