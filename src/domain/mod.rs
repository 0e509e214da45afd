//! Links, owners, tokens and clicks, plus the click pipeline.
//!
//! A redirect never writes to the database itself. The handler turns the
//! request into a [`click_event::ClickEvent`] and offers it to a bounded
//! channel; [`click_worker::run_click_worker`] drains that channel, bumps
//! the link's counter and appends a row to `link_clicks`. When the channel
//! is full the event is dropped and the redirect still succeeds.

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
