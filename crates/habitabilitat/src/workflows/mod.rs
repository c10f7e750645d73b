pub mod habitability;
