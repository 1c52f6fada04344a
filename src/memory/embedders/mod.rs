pub mod hashed;
