//! Reviewbot Core
//!
//! Core types shared by the review notifier crates.
//!
//! This crate contains:
//! - Domain types: review attempts, the poll cursor, the recipient chat
//! - DTOs: wire shapes of the review API and the Telegram Bot API
//! - Message text: rendering of verdict and greeting notifications

pub mod domain;
pub mod dto;
pub mod message;
