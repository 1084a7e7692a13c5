pub mod employee;
pub mod pages;
