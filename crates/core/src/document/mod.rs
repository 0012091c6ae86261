pub mod model;
pub mod validate;
pub mod view;
