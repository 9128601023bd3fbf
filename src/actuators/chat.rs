pub mod back;
pub mod dto;
