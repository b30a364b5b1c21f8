pub mod auth;
pub mod authors;
pub mod books;
pub mod error;
pub mod images;
pub mod pagination;
pub mod repos;
pub mod users;
