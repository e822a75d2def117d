//! Core domain types shared by every module

pub mod code;
pub mod error;
pub mod string;
