//! Small helpers shared by services and controllers.

pub mod certificate;
pub mod parse;
pub mod password;
