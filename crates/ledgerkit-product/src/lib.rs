//! Ledgerkit — Product bounded context.
//!
//! Write side: `AddProduct`, `UpdatePrice`, `IncrementStock` and
//! `DecrementStock` commands handled by [`application::command_handlers::ProductService`].
//! Read side: [`application::projections::ProductReadModel`].

pub mod application;
pub mod domain;
