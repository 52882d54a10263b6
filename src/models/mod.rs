pub mod suggestion;
pub mod trip;
