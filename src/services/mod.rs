pub mod feed;
pub mod probe;
pub mod profiles;
