pub mod ask;
pub mod doctor;
pub mod onboard;
