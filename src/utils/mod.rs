pub mod text;
pub mod threads;
pub mod timing;
