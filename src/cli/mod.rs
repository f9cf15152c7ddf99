pub mod convert;
pub mod currencies;
pub mod pairs;
pub mod setup;
pub mod ui;
