pub mod manager;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
