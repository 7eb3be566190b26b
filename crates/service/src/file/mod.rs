pub mod holiday_store;
