pub mod projection;
pub mod sensitivity;
