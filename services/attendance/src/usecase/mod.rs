pub mod attendance;
pub mod login;
pub mod otp;
pub mod roster;
